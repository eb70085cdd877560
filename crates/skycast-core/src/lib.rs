pub mod config;
pub mod error;

pub use config::{Config, HistoryConfig, Units, WeatherConfig};
pub use error::{
    AppError, ConfigError, NetworkError, ReqwestErrorExt, RusqliteErrorExt, StorageError,
    WeatherError,
};

use anyhow::Result;

/// Filter used when `RUST_LOG` is unset or invalid
fn default_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)
}

const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("SkyCast core initialized");
    Ok(())
}
