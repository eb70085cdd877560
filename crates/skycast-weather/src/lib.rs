//! Weather lookup for SkyCast
//!
//! Fetches current conditions, UV index and a five-day forecast from
//! OpenWeatherMap and keeps a persistent, bounded search history.

pub mod display;
pub mod forecast;
pub mod history;
pub mod orchestrator;
pub mod provider;
pub mod storage;
pub mod types;
pub mod uv;

pub use forecast::select_daily;
pub use history::{HistoryStore, HISTORY_CAPACITY, HISTORY_KEY};
pub use orchestrator::{LookupOrchestrator, LookupOutcome, Presenter};
pub use provider::WeatherProvider;
pub use storage::{KeyValueStore, SqliteKeyValueStore};
pub use types::*;
pub use uv::UvSeverity;
