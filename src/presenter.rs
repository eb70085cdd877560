//! Terminal rendering of lookup results.

use std::io::Write;

use parking_lot::Mutex;
use skycast_core::Units;
use skycast_weather::display::one_decimal;
use skycast_weather::{CurrentConditions, ForecastDay, Presenter, UvReading};

/// Writes lookup results as plain text to stdout.
pub struct TerminalPresenter {
    units: Units,
    // Serializes writes so UV and forecast output never interleave
    out: Mutex<std::io::Stdout>,
}

impl TerminalPresenter {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            out: Mutex::new(std::io::stdout()),
        }
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", text) {
            tracing::debug!("Failed to write to stdout: {}", e);
        }
    }

    /// Print the search history as a numbered list
    pub fn print_history(&self, cities: &[String]) {
        self.emit(&format_history(cities, None));
    }
}

/// Numbered history list, most recent first. The active city is marked with `*`.
fn format_history(cities: &[String], active: Option<&str>) -> String {
    if cities.is_empty() {
        return "No cities searched yet.".to_string();
    }
    cities
        .iter()
        .enumerate()
        .map(|(i, city)| {
            let marker = if Some(city.as_str()) == active { '*' } else { ' ' };
            format!("{} {:>2}. {}", marker, i + 1, city)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl Presenter for TerminalPresenter {
    fn show_current(&self, current: &CurrentConditions) {
        let mut text = format!("{} ({})\n", current.city, current.date);
        if let Some(icon) = &current.icon_url {
            text.push_str(&format!("  Icon:        {}\n", icon));
        }
        text.push_str(&format!(
            "  Temperature: {} {}\n  Humidity:    {} %\n  Wind Speed:  {} {}",
            one_decimal(current.temperature),
            self.units.temperature_suffix(),
            current.humidity,
            one_decimal(current.wind_speed),
            self.units.speed_suffix(),
        ));
        self.emit(&text);
    }

    fn show_history(&self, cities: &[String], active: &str) {
        self.emit(&format!(
            "\nSearch history:\n{}",
            format_history(cities, Some(active))
        ));
    }

    fn show_uv_index(&self, uv: &UvReading) {
        let text = match uv {
            UvReading::Available { severity, .. } => {
                format!("  UV Index:    {} ({})", uv.label(), severity)
            }
            UvReading::Unavailable => format!("  UV Index:    {}", uv.label()),
        };
        self.emit(&text);
    }

    fn show_forecast(&self, days: &[ForecastDay]) {
        let mut text = String::from("\n5-Day Forecast:");
        for day in days {
            text.push_str(&format!(
                "\n  {:<10}  Temp: {} {}  Humidity: {} %",
                day.date,
                one_decimal(day.temperature),
                self.units.temperature_suffix(),
                day.humidity,
            ));
            if let Some(icon) = &day.icon_url {
                text.push_str(&format!("  {}", icon));
            }
        }
        self.emit(&text);
    }

    fn show_forecast_error(&self, message: &str) {
        self.emit(&format!("\n{}", message));
    }

    fn show_error(&self, message: &str) {
        let mut err = std::io::stderr();
        if let Err(e) = writeln!(err, "{}", message) {
            tracing::debug!("Failed to write to stderr: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Vec<String> {
        vec!["Paris, FR".to_string(), "Austin, US".to_string()]
    }

    #[test]
    fn test_history_marks_active_city() {
        let text = format_history(&cities(), Some("Austin, US"));
        assert_eq!(text, "   1. Paris, FR\n*  2. Austin, US");
    }

    #[test]
    fn test_history_without_active_city() {
        let text = format_history(&cities(), None);
        assert!(!text.contains('*'));
        assert!(text.contains(" 1. Paris, FR"));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(format_history(&[], Some("Austin, US")), "No cities searched yet.");
    }
}
