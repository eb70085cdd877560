//! OpenWeatherMap client for the three endpoints a lookup needs.

use anyhow::Context;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use skycast_core::{ConfigError, ReqwestErrorExt, Units, WeatherConfig, WeatherError};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::display;
use crate::types::{
    Coordinate, CurrentWeatherResponse, ForecastResponse, ForecastSeries, UvIndexResponse,
    WeatherSnapshot,
};

const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

/// Why a request produced no usable body
enum FetchFailure {
    NotFound,
    Other(String),
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    units: Units,
    icon_url_template: String,
}

impl WeatherProvider {
    /// Build a provider from configuration.
    ///
    /// # Errors
    /// Fails when no API key is configured or the HTTP client can't be built.
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| ConfigError::MissingSetting("weather.api_key".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            units: config.units,
            icon_url_template: config.icon_url_template.clone(),
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Icon image URL for a provider icon code
    pub fn icon_url(&self, icon: &str) -> String {
        display::icon_url(&self.icon_url_template, icon)
    }

    /// Current conditions for `city_name`.
    ///
    /// # Errors
    /// `CityNotFound` on HTTP 404, `ProviderUnavailable` on anything else.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_current_weather(
        &self,
        city_name: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let query = [
            ("q", city_name),
            ("units", self.units.as_query()),
            ("appid", self.api_key.as_str()),
        ];

        match self.get_json::<CurrentWeatherResponse>("weather", &query).await {
            Ok(body) => Ok(body.into()),
            Err(FetchFailure::NotFound) => Err(WeatherError::CityNotFound(city_name.to_string())),
            Err(FetchFailure::Other(diagnostic)) => {
                Err(WeatherError::ProviderUnavailable(diagnostic))
            }
        }
    }

    /// UV index at `coord`.
    ///
    /// # Errors
    /// `UvIndexUnavailable` on any failure.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_uv_index(&self, coord: Coordinate) -> Result<f64, WeatherError> {
        let lat = coord.lat.to_string();
        let lon = coord.lon.to_string();
        let query = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
        ];

        match self.get_json::<UvIndexResponse>("uvi", &query).await {
            Ok(body) => Ok(body.value),
            Err(FetchFailure::NotFound) => {
                Err(WeatherError::UvIndexUnavailable("404 Not Found".to_string()))
            }
            Err(FetchFailure::Other(diagnostic)) => {
                Err(WeatherError::UvIndexUnavailable(diagnostic))
            }
        }
    }

    /// Three-hourly forecast for `city_name` plus today's sunrise and sunset.
    ///
    /// # Errors
    /// `ForecastUnavailable` on any failure.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_five_day_forecast(
        &self,
        city_name: &str,
    ) -> Result<ForecastSeries, WeatherError> {
        let query = [
            ("q", city_name),
            ("units", self.units.as_query()),
            ("appid", self.api_key.as_str()),
        ];

        match self.get_json::<ForecastResponse>("forecast", &query).await {
            Ok(body) => Ok(body.into()),
            Err(FetchFailure::NotFound) => {
                Err(WeatherError::ForecastUnavailable("404 Not Found".to_string()))
            }
            Err(FetchFailure::Other(diagnostic)) => {
                Err(WeatherError::ForecastUnavailable(diagnostic))
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchFailure> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                // Strip the URL so the API key never reaches logs or the user
                let e = e.without_url();
                tracing::debug!("Request to {} failed: {}", endpoint, e);
                FetchFailure::Other(e.into_network_error().to_string())
            })?;

        Self::handle_response(endpoint, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        endpoint: &str,
        response: Response,
    ) -> Result<T, FetchFailure> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                tracing::debug!("Malformed {} response: {}", endpoint, e);
                FetchFailure::Other(e.without_url().into_network_error().to_string())
            })
        } else if status == StatusCode::NOT_FOUND {
            tracing::debug!("{} returned 404", endpoint);
            Err(FetchFailure::NotFound)
        } else {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!("{} returned status {}", endpoint, status);
            Err(FetchFailure::Other(format!("{}: {}", status, text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> WeatherConfig {
        WeatherConfig {
            api_key: key.map(str::to_string),
            api_base_url: "https://api.example.test/data/2.5/".to_string(),
            ..WeatherConfig::default()
        }
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = WeatherProvider::new(&config_with_key(Some("k"))).unwrap();
        assert_eq!(provider.base_url, "https://api.example.test/data/2.5");
    }

    #[test]
    fn test_icon_url_uses_configured_template() {
        let provider = WeatherProvider::new(&config_with_key(Some("k"))).unwrap();
        assert_eq!(
            provider.icon_url("10d"),
            "https://openweathermap.org/img/w/10d.png"
        );
    }

    #[test]
    fn test_units_come_from_config() {
        let mut config = config_with_key(Some("k"));
        config.units = Units::Metric;
        let provider = WeatherProvider::new(&config).unwrap();
        assert_eq!(provider.units(), Units::Metric);
    }
}
