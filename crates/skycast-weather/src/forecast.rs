//! Picks one representative sample per day out of the provider's
//! three-hourly forecast series.

use crate::types::{ForecastEntry, ForecastSeries};

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Number of days shown in the forecast
pub const FORECAST_DAYS: usize = 5;

/// Select up to five daily samples.
///
/// Today's midday is halfway between `sunrise` and `sunset`. Starting one day
/// later, the first sample strictly after each successive midday is taken.
/// When the series runs out with exactly four days picked, its last sample
/// stands in for the fifth; with fewer than four nothing is added.
pub fn select_daily(entries: &[ForecastEntry], sunrise: i64, sunset: i64) -> Vec<ForecastEntry> {
    let midday = sunrise + (sunset - sunrise).div_euclid(2);
    let mut next_midday = midday + SECONDS_PER_DAY;
    let mut days = Vec::with_capacity(FORECAST_DAYS);

    for entry in entries {
        if days.len() == FORECAST_DAYS {
            break;
        }
        if entry.timestamp > next_midday {
            days.push(entry.clone());
            next_midday += SECONDS_PER_DAY;
        }
    }

    if days.len() == FORECAST_DAYS - 1 {
        if let Some(last) = entries.last() {
            tracing::debug!(
                "Forecast ends before day {}, using last sample at {}",
                FORECAST_DAYS,
                last.timestamp
            );
            days.push(last.clone());
        }
    }

    days
}

impl ForecastSeries {
    /// Daily representatives of this series
    pub fn daily(&self) -> Vec<ForecastEntry> {
        select_daily(&self.entries, self.sunrise, self.sunset)
    }
}
