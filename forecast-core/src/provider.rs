use crate::{Config, FetchError, Forecast, TemperatureUnit, provider::openweather::OpenWeatherFetcher};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// One network call to a weather provider, producing a forecast or a typed failure.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, city: &str, units: TemperatureUnit) -> Result<Forecast, FetchError>;
}

/// Rejects empty, whitespace-only and untrimmed city names before any request is built.
pub fn validate_city(city: &str) -> Result<(), FetchError> {
    if city.trim().is_empty() {
        return Err(FetchError::InvalidInput(
            "city name must not be empty".to_string(),
        ));
    }
    if city.trim() != city {
        return Err(FetchError::InvalidInput(format!(
            "city name '{city}' has leading or trailing whitespace"
        )));
    }
    Ok(())
}

/// Construct the fetcher described by `config`.
pub fn fetcher_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherFetcher>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for the weather provider.\n\
             Hint: run `forecast configure` or set FORECAST_API_KEY."
        )
    })?;

    let fetcher = match config.base_url.as_deref() {
        Some(base) => OpenWeatherFetcher::with_base_url(api_key, base),
        None => OpenWeatherFetcher::new(api_key),
    };

    Ok(Arc::new(fetcher))
}
