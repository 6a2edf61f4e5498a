//! Typed failures surfaced by the fetcher and the local stores.

use std::path::PathBuf;
use thiserror::Error;

/// Why a forecast fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid city: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Weather provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Weather provider returned an empty forecast")]
    EmptyForecast,
}

/// Cloneable discriminant of [`FetchError`], kept in the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    InvalidInput,
    Network,
    Provider(u16),
    MalformedResponse,
    EmptyForecast,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidInput(_) => FetchErrorKind::InvalidInput,
            Self::Network(_) => FetchErrorKind::Network,
            Self::Provider { status, .. } => FetchErrorKind::Provider(*status),
            Self::MalformedResponse(_) => FetchErrorKind::MalformedResponse,
            Self::EmptyForecast => FetchErrorKind::EmptyForecast,
        }
    }

    /// User-friendly error message for display next to a retry action.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(_) => "Please enter a city name.".to_string(),
            Self::Network(_) => {
                "Could not reach the weather service. Check your connection and try again."
                    .to_string()
            }
            Self::Provider { status: 404, .. } => {
                "City not found. Check the spelling and try again.".to_string()
            }
            Self::Provider { status: 401, .. } => {
                "The weather service rejected the API key.".to_string()
            }
            Self::Provider { status, .. } => {
                format!("The weather service is unavailable right now (status {status}).")
            }
            Self::MalformedResponse(_) => {
                "The weather service sent data we could not read.".to_string()
            }
            Self::EmptyForecast => "No forecast is available for this city.".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl FetchErrorKind {
    /// Whether a manual retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network => true,
            Self::Provider(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Failures of the favorites and settings stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Favorite not found: {0}")]
    NotFound(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store contents: {0}")]
    Serialize(String),

    #[error("Failed to parse {}: {message}", path.display())]
    Deserialize { path: PathBuf, message: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(status: u16) -> FetchError {
        FetchError::Provider {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn kind_carries_status() {
        assert_eq!(provider(404).kind(), FetchErrorKind::Provider(404));
        assert_eq!(FetchError::EmptyForecast.kind(), FetchErrorKind::EmptyForecast);
        assert_eq!(
            FetchError::InvalidInput("".into()).kind(),
            FetchErrorKind::InvalidInput
        );
    }

    #[test]
    fn provider_messages_are_distinguishable() {
        let not_found = provider(404).user_message();
        assert!(not_found.contains("City not found"));

        let err = serde_json::from_str::<u8>("x").unwrap_err();
        let malformed = FetchError::MalformedResponse(err).user_message();
        assert_ne!(not_found, malformed);
        assert!(provider(503).user_message().contains("503"));
    }

    #[test]
    fn retryable_errors() {
        assert!(provider(503).is_retryable());
        assert!(provider(429).is_retryable());
        assert!(!provider(404).is_retryable());
        assert!(!FetchError::EmptyForecast.is_retryable());
        assert!(!FetchError::InvalidInput("  ".into()).is_retryable());
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::NotFound("Paris".into());
        assert_eq!(err.to_string(), "Favorite not found: Paris");
    }
}
