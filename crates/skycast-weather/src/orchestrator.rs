//! Lookup flow: current weather first, then UV index and forecast side by
//! side, with the search history updated in between.

use parking_lot::Mutex;
use skycast_core::WeatherError;

use crate::display::format_date;
use crate::history::HistoryStore;
use crate::provider::WeatherProvider;
use crate::storage::KeyValueStore;
use crate::types::{
    CurrentConditions, ForecastDay, ForecastEntry, UvReading, WeatherSnapshot,
};

/// Receives everything a lookup has to show.
///
/// Called from within the lookup future; the UV and forecast callbacks may
/// arrive in either order.
pub trait Presenter: Sync {
    fn show_current(&self, current: &CurrentConditions);

    /// Full history plus the city the current result belongs to
    fn show_history(&self, cities: &[String], active: &str);

    fn show_uv_index(&self, uv: &UvReading);

    fn show_forecast(&self, days: &[ForecastDay]);

    fn show_forecast_error(&self, message: &str);

    /// Lookup aborted; nothing else will be shown for it
    fn show_error(&self, message: &str);
}

/// Everything one successful lookup produced
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    /// `"<Name>, <CountryCode>"` as resolved by the provider
    pub city: String,
    pub snapshot: WeatherSnapshot,
    pub uv: UvReading,
    pub forecast: Result<Vec<ForecastEntry>, WeatherError>,
    /// Whether the city was new to the history
    pub added_to_history: bool,
}

pub struct LookupOrchestrator<S: KeyValueStore> {
    provider: WeatherProvider,
    history: Mutex<HistoryStore<S>>,
}

impl<S: KeyValueStore> LookupOrchestrator<S> {
    pub fn new(provider: WeatherProvider, history: HistoryStore<S>) -> Self {
        Self {
            provider,
            history: Mutex::new(history),
        }
    }

    /// Snapshot of the search history, most recent first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().list().to_vec()
    }

    /// Look up weather for `city_name` and report it to `presenter`.
    ///
    /// # Errors
    /// `CityNotFound` or `ProviderUnavailable` when the current-weather fetch
    /// fails; nothing else is fetched and the history is left alone. UV and
    /// forecast failures are reported to the presenter and carried in the
    /// outcome instead.
    pub async fn lookup<P: Presenter + ?Sized>(
        &self,
        city_name: &str,
        presenter: &P,
    ) -> Result<LookupOutcome, WeatherError> {
        let snapshot = match self.provider.fetch_current_weather(city_name).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Weather lookup for '{}' failed: {}", city_name, e);
                presenter.show_error(&e.user_message());
                return Err(e);
            }
        };

        let city = snapshot.city_record();
        tracing::info!("Fetched current weather for {}", city);
        presenter.show_current(&self.current_conditions(&city, &snapshot));

        let (added_to_history, cities) = {
            let mut history = self.history.lock();
            let added = history.add(city.as_str());
            (added, history.list().to_vec())
        };
        presenter.show_history(&cities, &city);

        let uv_task = async {
            let uv = match self.provider.fetch_uv_index(snapshot.coord).await {
                Ok(value) => UvReading::from_value(value),
                Err(e) => {
                    tracing::warn!("{}", e);
                    UvReading::Unavailable
                }
            };
            presenter.show_uv_index(&uv);
            uv
        };

        let forecast_task = async {
            match self.provider.fetch_five_day_forecast(&city).await {
                Ok(series) => {
                    let days = series.daily();
                    presenter.show_forecast(&self.forecast_days(&days));
                    Ok(days)
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    presenter.show_forecast_error(&e.user_message());
                    Err(e)
                }
            }
        };

        let (uv, forecast) = tokio::join!(uv_task, forecast_task);

        Ok(LookupOutcome {
            city,
            snapshot,
            uv,
            forecast,
            added_to_history,
        })
    }

    /// Look up the most recently searched city, if there is one.
    ///
    /// # Errors
    /// Same as [`lookup`](Self::lookup).
    pub async fn lookup_most_recent<P: Presenter + ?Sized>(
        &self,
        presenter: &P,
    ) -> Option<Result<LookupOutcome, WeatherError>> {
        let city = self.history.lock().most_recent().map(str::to_string)?;
        tracing::debug!("Resuming with most recent city {}", city);
        Some(self.lookup(&city, presenter).await)
    }

    fn current_conditions(&self, city: &str, snapshot: &WeatherSnapshot) -> CurrentConditions {
        CurrentConditions {
            city: city.to_string(),
            date: format_date(snapshot.timestamp),
            icon_url: snapshot.icon.as_deref().map(|i| self.provider.icon_url(i)),
            temperature: snapshot.temperature,
            humidity: snapshot.humidity,
            wind_speed: snapshot.wind_speed,
        }
    }

    fn forecast_days(&self, entries: &[ForecastEntry]) -> Vec<ForecastDay> {
        entries
            .iter()
            .map(|entry| ForecastDay {
                date: format_date(entry.timestamp),
                icon_url: entry.icon.as_deref().map(|i| self.provider.icon_url(i)),
                temperature: entry.temperature,
                humidity: entry.humidity,
            })
            .collect()
    }
}
