//! Core library for the `forecast` client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather fetcher and its typed failures
//! - Durable favorites and settings stores
//! - View-state controllers the presentation layer renders from
//!
//! It is used by `forecast-cli`, but can also back other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod model;
mod persist;
pub mod provider;
pub mod settings;
pub mod units;

pub use config::Config;
pub use controller::{FavoritesController, FetchState, ForecastController};
pub use error::{FetchError, FetchErrorKind, StoreError};
pub use favorites::FavoritesStore;
pub use model::{City, Condition, DayForecast, Favorite, Forecast, Temperature};
pub use provider::{WeatherFetcher, fetcher_from_config, openweather::OpenWeatherFetcher};
pub use settings::SettingsStore;
pub use units::TemperatureUnit;
