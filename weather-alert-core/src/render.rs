//! Display strings for snapshots, forecasts, and errors.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::model::{ForecastDay, WeatherSnapshot};

const ICON_BASE: &str = "https://openweathermap.org/img/wn";

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE}/{icon}@2x.png")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    High,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertBanner {
    pub text: String,
    pub level: AlertLevel,
}

impl AlertBanner {
    /// `None` when there is no alert to show.
    pub fn from_alert(alert: Option<&str>) -> Option<Self> {
        let alert = alert.filter(|a| !a.is_empty())?;
        let level = if alert.contains("High") { AlertLevel::High } else { AlertLevel::Low };
        Some(Self { text: format!("⚠️ {alert}"), level })
    }
}

/// Current conditions, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub location: String,
    pub updated: String,
    pub temperature: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub description: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub alert: Option<AlertBanner>,
}

impl From<&WeatherSnapshot> for WeatherView {
    fn from(s: &WeatherSnapshot) -> Self {
        Self {
            location: format!("{}, {}", s.city, s.country),
            updated: format!("Updated: {}", format_timestamp(&s.timestamp)),
            temperature: format!("{}°C", s.temperature),
            icon_url: icon_url(&s.icon),
            icon_alt: s.condition.clone(),
            description: s.description.clone(),
            feels_like: format!("{}°C", s.feels_like),
            humidity: format!("{}%", s.humidity),
            wind_speed: format!("{} m/s", s.wind_speed),
            pressure: format!("{} hPa", s.pressure),
            alert: AlertBanner::from_alert(s.alert.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
    pub day_name: String,
    pub date: String,
    pub icon_url: String,
    pub condition: String,
    pub max_temp: String,
    pub min_temp: String,
}

impl From<&ForecastDay> for ForecastCard {
    fn from(d: &ForecastDay) -> Self {
        Self {
            day_name: d.day_name.clone(),
            date: format_date(&d.date),
            icon_url: icon_url(&d.icon),
            condition: d.condition.clone(),
            max_temp: format!("↑ {}°", d.max_temp),
            min_temp: format!("↓ {}°", d.min_temp),
        }
    }
}

/// The forecast grid. Each render replaces every card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastPanel {
    cards: Vec<ForecastCard>,
}

impl ForecastPanel {
    pub fn render(&mut self, days: &[ForecastDay]) {
        self.cards = days.iter().map(ForecastCard::from).collect();
    }

    pub fn cards(&self) -> &[ForecastCard] {
        &self.cards
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

pub fn error_banner(message: &str) -> String {
    format!("❌ {message}")
}

/// Render an ISO-8601 timestamp in local time. Offset-less values are UTC.
/// Anything unparseable is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(OUT).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.and_utc().with_timezone(&Local).format(OUT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `2026-10-16` → `Oct 16`.
pub fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d").to_string(),
        Err(_) => raw.to_string(),
    }
}
