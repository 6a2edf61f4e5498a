use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    FetchError, TemperatureUnit,
    model::{City, Condition, DayForecast, Forecast, Temperature},
    provider::validate_city,
};

use super::WeatherFetcher;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const DAILY_FORECAST_PATH: &str = "/data/2.5/forecast/daily";

#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherFetcher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the fetcher at another host, e.g. a local stub server.
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, DAILY_FORECAST_PATH)
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwTemp {
    day: f64,
    min: f64,
    max: f64,
    night: Option<f64>,
    eve: Option<f64>,
    morn: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwDailyEntry {
    dt: i64,
    sunrise: Option<i64>,
    sunset: Option<i64>,
    temp: OwTemp,
    pressure: u32,
    humidity: u8,
    weather: Vec<OwWeather>,
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwDailyResponse {
    city: OwCity,
    list: Vec<OwDailyEntry>,
}

impl OwDailyResponse {
    fn into_forecast(self) -> Result<Forecast, FetchError> {
        if self.list.is_empty() {
            return Err(FetchError::EmptyForecast);
        }

        let days = self
            .list
            .into_iter()
            .map(OwDailyEntry::into_day)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast {
            city: City {
                name: self.city.name,
                country: self.city.country,
            },
            days,
        })
    }
}

impl OwDailyEntry {
    fn into_day(self) -> Result<DayForecast, FetchError> {
        let weather = self.weather.into_iter().next().ok_or_else(|| {
            FetchError::MalformedResponse(serde::de::Error::custom(format!(
                "forecast entry {} has no weather condition",
                self.dt
            )))
        })?;

        Ok(DayForecast {
            timestamp: self.dt,
            temperature: Temperature {
                day: self.temp.day,
                min: self.temp.min,
                max: self.temp.max,
                night: self.temp.night,
                eve: self.temp.eve,
                morn: self.temp.morn,
            },
            humidity: self.humidity,
            pressure: self.pressure,
            wind_speed: self.speed,
            condition: Condition {
                main: weather.main,
                description: weather.description,
                icon_id: weather.icon,
            },
            sunrise: self.sunrise,
            sunset: self.sunset,
        })
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn fetch(&self, city: &str, units: TemperatureUnit) -> Result<Forecast, FetchError> {
        validate_city(city)?;

        debug!(city, units = units.as_str(), "requesting daily forecast");

        let res = self
            .http
            .get(self.endpoint())
            .query(&[
                ("q", city),
                ("units", units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(city, error = %e, "forecast request failed");
                FetchError::Network(e)
            })?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Network)?;

        if !status.is_success() {
            warn!(city, status = status.as_u16(), "provider rejected forecast request");
            return Err(FetchError::Provider {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwDailyResponse =
            serde_json::from_str(&body).map_err(FetchError::MalformedResponse)?;

        let forecast = parsed.into_forecast()?;
        debug!(city, days = forecast.days.len(), "forecast received");

        Ok(forecast)
    }
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
    use crate::FetchErrorKind;

    const BODY: &str = r#"{
        "city": {"id": 2267057, "name": "Lisbon", "country": "PT", "timezone": 0},
        "cod": "200",
        "cnt": 1,
        "list": [{
            "dt": 1717243200,
            "sunrise": 1717218000,
            "sunset": 1717271000,
            "temp": {"day": 24.1, "min": 16.2, "max": 26.0, "night": 17.0, "eve": 22.5, "morn": 16.9},
            "feels_like": {"day": 24.0},
            "pressure": 1016,
            "humidity": 55,
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "speed": 4.3,
            "deg": 330,
            "pop": 0
        }]
    }"#;

    #[test]
    fn parses_daily_response() {
        let parsed: OwDailyResponse = serde_json::from_str(BODY).unwrap();
        let forecast = parsed.into_forecast().unwrap();

        assert_eq!(forecast.city.name, "Lisbon");
        assert_eq!(forecast.city.country, "PT");
        assert_eq!(forecast.days.len(), 1);

        let day = &forecast.days[0];
        assert_eq!(day.timestamp, 1_717_243_200);
        assert_eq!(day.humidity, 55);
        assert_eq!(day.pressure, 1016);
        assert_eq!(day.condition.icon_id, "01d");
        assert_eq!(day.sunrise, Some(1_717_218_000));
        assert_eq!(day.temperature.night, Some(17.0));
    }

    #[test]
    fn empty_list_is_empty_forecast() {
        let parsed: OwDailyResponse =
            serde_json::from_str(r#"{"city": {"name": "X", "country": "Y"}, "list": []}"#).unwrap();
        let err = parsed.into_forecast().unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::EmptyForecast);
    }

    #[test]
    fn entry_without_weather_is_malformed() {
        let body = BODY.replace(
            r#"[{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}]"#,
            "[]",
        );
        let parsed: OwDailyResponse = serde_json::from_str(&body).unwrap();
        let err = parsed.into_forecast().unwrap_err();
        assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let fetcher = OpenWeatherFetcher::with_base_url("KEY", "http://localhost:8080/");
        assert_eq!(
            fetcher.endpoint(),
            "http://localhost:8080/data/2.5/forecast/daily"
        );
    }
}
