//! View-state controllers consumed by the presentation layer.

pub mod favorites;
pub mod forecast;

pub use favorites::FavoritesController;
pub use forecast::{FetchState, ForecastController};
