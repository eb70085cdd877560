use serde::{Deserialize, Serialize};

use crate::uv::UvSeverity;

/// Geographic coordinate as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one city, as returned by the weather endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub country: String,
    /// Observation time, unix seconds
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon: Option<String>,
    pub coord: Coordinate,
}

impl WeatherSnapshot {
    /// History identifier in `"<Name>, <CountryCode>"` form
    pub fn city_record(&self) -> String {
        format!("{}, {}", self.city_name, self.country)
    }
}

/// One timestamped sample of a forecast series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Sample time, unix seconds
    pub timestamp: i64,
    pub temperature: f64,
    pub humidity: u8,
    pub icon: Option<String>,
}

/// Forecast samples plus the location's sunrise and sunset for today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub sunrise: i64,
    pub sunset: i64,
    pub entries: Vec<ForecastEntry>,
}

/// Outcome of the best-effort UV index fetch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UvReading {
    Available { value: f64, severity: UvSeverity },
    Unavailable,
}

impl UvReading {
    pub fn from_value(value: f64) -> Self {
        Self::Available {
            value,
            severity: UvSeverity::from_index(value),
        }
    }

    /// Text shown in place of the value
    pub fn label(&self) -> String {
        match self {
            Self::Available { value, .. } => format!("{}", value),
            Self::Unavailable => "N/A".to_string(),
        }
    }

    /// Background color for the value
    pub fn color(&self) -> &'static str {
        match self {
            Self::Available { severity, .. } => severity.color(),
            Self::Unavailable => "grey",
        }
    }
}

/// Current conditions ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub city: String,
    /// `M/D/YYYY`, local time
    pub date: String,
    pub icon_url: Option<String>,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// One forecast card ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: String,
    pub icon_url: Option<String>,
    pub temperature: f64,
    pub humidity: u8,
}

// Wire formats of the OpenWeatherMap 2.5 endpoints.

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSys {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiWind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherResponse {
    pub name: String,
    pub sys: ApiSys,
    pub dt: i64,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    pub main: ApiMain,
    pub wind: ApiWind,
    pub coord: Coordinate,
}

impl From<CurrentWeatherResponse> for WeatherSnapshot {
    fn from(r: CurrentWeatherResponse) -> Self {
        Self {
            city_name: r.name,
            country: r.sys.country,
            timestamp: r.dt,
            temperature: r.main.temp,
            humidity: r.main.humidity,
            wind_speed: r.wind.speed,
            icon: first_icon(r.weather),
            coord: r.coord,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UvIndexResponse {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCity {
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastItem {
    pub dt: i64,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    pub main: ApiMain,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub city: ApiCity,
    #[serde(default)]
    pub list: Vec<ApiForecastItem>,
}

impl From<ForecastResponse> for ForecastSeries {
    fn from(r: ForecastResponse) -> Self {
        Self {
            sunrise: r.city.sunrise,
            sunset: r.city.sunset,
            entries: r
                .list
                .into_iter()
                .map(|item| ForecastEntry {
                    timestamp: item.dt,
                    temperature: item.main.temp,
                    humidity: item.main.humidity,
                    icon: first_icon(item.weather),
                })
                .collect(),
        }
    }
}

fn first_icon(conditions: Vec<ApiCondition>) -> Option<String> {
    conditions.into_iter().next().and_then(|c| c.icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_weather_response_maps_to_snapshot() {
        let body = serde_json::json!({
            "coord": {"lon": -97.74, "lat": 30.27},
            "weather": [{"id": 800, "main": "Clear", "icon": "01d"}],
            "main": {"temp": 88.52, "humidity": 40, "pressure": 1012},
            "wind": {"speed": 9.17, "deg": 160},
            "dt": 1_600_000_000,
            "sys": {"country": "US", "sunrise": 1, "sunset": 2},
            "name": "Austin"
        });

        let response: CurrentWeatherResponse = serde_json::from_value(body).unwrap();
        let snapshot = WeatherSnapshot::from(response);

        assert_eq!(snapshot.city_record(), "Austin, US");
        assert_eq!(snapshot.icon.as_deref(), Some("01d"));
        assert_eq!(snapshot.humidity, 40);
        assert_eq!(snapshot.coord, Coordinate { lat: 30.27, lon: -97.74 });
    }

    #[test]
    fn test_missing_weather_array_gives_no_icon() {
        let body = serde_json::json!({
            "coord": {"lon": 0.0, "lat": 0.0},
            "main": {"temp": 50.0, "humidity": 10},
            "wind": {"speed": 1.0},
            "dt": 0,
            "sys": {"country": "GB"},
            "name": "London"
        });

        let response: CurrentWeatherResponse = serde_json::from_value(body).unwrap();
        assert!(WeatherSnapshot::from(response).icon.is_none());
    }

    #[test]
    fn test_forecast_response_keeps_order() {
        let body = serde_json::json!({
            "city": {"sunrise": 100, "sunset": 200},
            "list": [
                {"dt": 10, "main": {"temp": 1.0, "humidity": 1}, "weather": [{"icon": "02n"}]},
                {"dt": 20, "main": {"temp": 2.0, "humidity": 2}, "weather": []}
            ]
        });

        let response: ForecastResponse = serde_json::from_value(body).unwrap();
        let series = ForecastSeries::from(response);

        assert_eq!(series.sunrise, 100);
        assert_eq!(series.sunset, 200);
        assert_eq!(series.entries.len(), 2);
        assert_eq!(series.entries[0].icon.as_deref(), Some("02n"));
        assert_eq!(series.entries[1].timestamp, 20);
        assert!(series.entries[1].icon.is_none());
    }

    #[test]
    fn test_uv_reading_unavailable_presentation() {
        assert_eq!(UvReading::Unavailable.label(), "N/A");
        assert_eq!(UvReading::Unavailable.color(), "grey");
    }

    #[test]
    fn test_uv_reading_available_presentation() {
        let reading = UvReading::from_value(7.5);
        assert_eq!(reading.label(), "7.5");
        assert_eq!(reading.color(), "orange");
    }
}
