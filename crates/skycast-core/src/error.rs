//! Centralized error types for SkyCast.
//!
//! This module provides a typed error hierarchy that:
//! - Separates the weather lookup failures the user must be able to tell apart
//! - Provides user-facing messages suitable for the presentation layer
//! - Preserves the underlying diagnostic for logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a message suitable for display.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Returns a message suitable for display to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Storage(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Local key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage open failed: {0}")]
    OpenFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::OpenFailed(_) => {
                "Unable to open the search history. Try restarting the app."
            }
            StorageError::QueryFailed(_) => "Saving the search history failed.",
            StorageError::Corruption(_) => {
                "Search history may be corrupted. Consider deleting the history file."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => {
                "A required setting is missing. Set weather.api_key or OPENWEATHER_API_KEY."
            }
        }
    }
}

/// Weather lookup errors.
///
/// `CityNotFound` and `ProviderUnavailable` abort a lookup.
/// `ForecastUnavailable` and `UvIndexUnavailable` only affect their own
/// part of the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Forecast unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("UV index unavailable: {0}")]
    UvIndexUnavailable(String),
}

impl WeatherError {
    /// Message for the presentation layer. Only provider failures carry the
    /// diagnostic text through to the user.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::CityNotFound(_) => "No results found for this city!".to_string(),
            WeatherError::ProviderUnavailable(diagnostic) => {
                format!("Unable to retrieve weather data! {}", diagnostic)
            }
            WeatherError::ForecastUnavailable(_) => "Unable to retrieve forecast data!".to_string(),
            WeatherError::UvIndexUnavailable(_) => "N/A".to_string(),
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_storage_error(self) -> StorageError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_storage_error(self) -> StorageError {
        match &self {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                StorageError::Corruption(self.to_string())
            }
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                StorageError::OpenFailed(self.to_string())
            }
            _ => StorageError::QueryFailed(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_not_found_message_hides_diagnostic() {
        let err = WeatherError::CityNotFound("Atlantis".into());
        assert_eq!(err.user_message(), "No results found for this city!");
    }

    #[test]
    fn test_provider_unavailable_keeps_diagnostic() {
        let err = WeatherError::ProviderUnavailable("502 Bad Gateway".into());
        let msg = err.user_message();
        assert!(msg.starts_with("Unable to retrieve weather data!"));
        assert!(msg.contains("502 Bad Gateway"));
    }

    #[test]
    fn test_dependent_fetch_messages() {
        assert_eq!(
            WeatherError::ForecastUnavailable("500".into()).user_message(),
            "Unable to retrieve forecast data!"
        );
        assert_eq!(WeatherError::UvIndexUnavailable("500".into()).user_message(), "N/A");
    }

    #[test]
    fn test_app_error_conversion() {
        let err: AppError = WeatherError::CityNotFound("x".into()).into();
        assert!(matches!(err, AppError::Weather(WeatherError::CityNotFound(_))));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Config(ConfigError::MissingSetting("weather.api_key".into()));
        assert!(app_err.user_message().contains("OPENWEATHER_API_KEY"));

        let app_err = AppError::Storage(StorageError::QueryFailed("locked".into()));
        assert_eq!(app_err.user_message(), "Saving the search history failed.");
    }

    #[test]
    fn test_network_error_display_carries_status() {
        let err = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "Server error: 503 - down");
        assert_eq!(NetworkError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn test_rusqlite_error_maps_to_query_failed() {
        let err = rusqlite::Error::InvalidQuery.into_storage_error();
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }
}
