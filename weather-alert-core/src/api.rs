use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use std::{fmt::Debug, time::Duration};
use tracing::{debug, instrument, warn};

use crate::{
    Config,
    error::LookupError,
    model::{ForecastReport, LookupKind, WeatherSnapshot},
};

/// The backend weather service.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// `GET /api/weather?city=…`
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, LookupError>;

    /// `GET /api/forecast?city=…`
    async fn forecast(&self, city: &str) -> Result<ForecastReport, LookupError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherApi {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpWeatherApi {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: normalize_base(base_url), http: Client::new() }
    }

    /// Like [`HttpWeatherApi::new`], with an overall per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { base_url: normalize_base(base_url), http })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.request_timeout() {
            Some(timeout) => Self::with_timeout(&config.api_base_url, timeout),
            None => Ok(Self::new(&config.api_base_url)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, kind: LookupKind, city: &str) -> Result<Response, LookupError> {
        let url = format!("{}/api/{}", self.base_url, kind.as_str());

        let res = self.http.get(&url).query(&[("city", city)]).send().await.map_err(|err| {
            warn!(%url, error = %err, "weather request failed without a response");
            LookupError::Network(err.to_string())
        })?;

        debug!(%url, status = %res.status(), "weather API responded");
        Ok(res)
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    #[instrument(skip(self), level = "info")]
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, LookupError> {
        let res = self.get(LookupKind::Current, city).await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| {
                    format!("Failed to fetch weather data (status: {})", status.as_u16())
                });

            debug!(status = status.as_u16(), body = %truncate_body(&body), "weather lookup rejected");
            return Err(LookupError::Http { status: status.as_u16(), message });
        }

        parse_body(res).await
    }

    #[instrument(skip(self), level = "info")]
    async fn forecast(&self, city: &str) -> Result<ForecastReport, LookupError> {
        let res = self.get(LookupKind::Forecast, city).await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.map_err(LookupError::from)?;
            let parsed: ErrorBody = serde_json::from_str(&body).map_err(|err| {
                debug!(status = status.as_u16(), body = %truncate_body(&body), "unparseable error body");
                LookupError::Parse(err.to_string())
            })?;

            let message =
                parsed.error.unwrap_or_else(|| "Failed to fetch forecast data".to_string());
            return Err(LookupError::Http { status: status.as_u16(), message });
        }

        parse_body(res).await
    }
}

async fn parse_body<T: DeserializeOwned>(res: Response) -> Result<T, LookupError> {
    let body = res.text().await.map_err(LookupError::from)?;
    serde_json::from_str(&body).map_err(|err| {
        warn!(error = %err, body = %truncate_body(&body), "unexpected weather API payload");
        LookupError::Parse(err.to_string())
    })
}

fn normalize_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slashes_are_dropped() {
        let api = HttpWeatherApi::new("http://localhost:5000//");
        assert_eq!(api.base_url(), "http://localhost:5000");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn from_config_honours_timeout() {
        let cfg = Config {
            api_base_url: "http://example.test/".into(),
            request_timeout_secs: Some(3),
            ..Config::default()
        };

        let api = HttpWeatherApi::from_config(&cfg).unwrap();
        assert_eq!(api.base_url(), "http://example.test");
    }

    #[test]
    fn from_config_without_timeout_uses_default_client() {
        let api = HttpWeatherApi::from_config(&Config::default()).unwrap();
        assert_eq!(api.base_url(), crate::config::DEFAULT_API_BASE_URL);
    }
}
