use serde::{Deserialize, Serialize};

/// One entry of the suggestion catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
}

impl City {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self { name: name.into(), country: country.into() }
    }
}

/// Which endpoint a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// `GET /api/weather`
    Current,
    /// `GET /api/forecast`, current conditions plus the daily forecast.
    Forecast,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Current => "weather",
            LookupKind::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current conditions for one city, as returned by `/api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    /// ISO-8601 timestamp, usually without an offset (UTC).
    pub timestamp: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub pressure: u32,
    /// Short condition, e.g. "Clouds".
    pub condition: String,
    /// Long condition, e.g. "broken clouds".
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub alert: Option<String>,
}

/// One day of the multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub day_name: String,
    pub condition: String,
    pub icon: String,
    pub max_temp: f64,
    pub min_temp: f64,
}

/// Body of a successful `/api/forecast` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,

    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
