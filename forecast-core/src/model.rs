use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ICON_URL_TEMPLATE: &str = "https://openweathermap.org/img/wn/{icon}.png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// ISO 3166 country code as reported by the provider.
    pub country: String,
}

/// Daily temperatures in whatever unit system the forecast was requested in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: Option<f64>,
    pub eve: Option<f64>,
    pub morn: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon_id: String,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        icon_url(&self.icon_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    /// Seconds since the Unix epoch; identifies the day.
    pub timestamp: i64,
    pub temperature: Temperature,
    pub humidity: u8,
    /// hPa
    pub pressure: u32,
    pub wind_speed: f64,
    pub condition: Condition,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

impl DayForecast {
    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0)
    }

    pub fn icon_url(&self) -> String {
        self.condition.icon_url()
    }
}

/// Result of one successful fetch. `days` is never empty and keeps the provider's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: City,
    pub days: Vec<DayForecast>,
}

impl Forecast {
    /// The first (current) day of the forecast.
    pub fn today(&self) -> Option<&DayForecast> {
        self.days.first()
    }
}

/// A city saved by the user, keyed by `city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Favorite {
    pub city: String,
    pub country: String,
}

impl Favorite {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

impl From<&City> for Favorite {
    fn from(city: &City) -> Self {
        Favorite::new(city.name.clone(), city.country.clone())
    }
}

pub fn icon_url(icon_id: &str) -> String {
    ICON_URL_TEMPLATE.replace("{icon}", icon_id)
}

/// `"Mon, Jan 5"`, in UTC.
pub fn format_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%a, %b %-d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `"06:12 AM"`, in UTC.
pub fn format_time(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_decimal(value: f64) -> String {
    format!("{value:.0}")
}
