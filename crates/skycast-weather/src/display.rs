//! Formatting helpers shared by everything that hands data to a presenter.

use chrono::{DateTime, Local, TimeZone};
use skycast_core::config::ICON_PLACEHOLDER;

/// Substitute `icon` for the first `icon_name` placeholder in `template`
pub fn icon_url(template: &str, icon: &str) -> String {
    template.replacen(ICON_PLACEHOLDER, icon, 1)
}

/// Format unix seconds as `M/D/YYYY` in local time
pub fn format_date(timestamp: i64) -> String {
    format_date_in(timestamp, &Local)
}

/// Format unix seconds as `M/D/YYYY` in `tz`. Out-of-range timestamps
/// format as an empty string.
pub fn format_date_in<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(tz).format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

/// One decimal place, as temperatures and wind speeds are shown
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_icon_url_replaces_placeholder() {
        assert_eq!(
            icon_url("https://openweathermap.org/img/w/icon_name.png", "04d"),
            "https://openweathermap.org/img/w/04d.png"
        );
    }

    #[test]
    fn test_icon_url_replaces_first_occurrence_only() {
        assert_eq!(icon_url("icon_name/icon_name", "01n"), "01n/icon_name");
    }

    #[test]
    fn test_icon_url_without_placeholder_is_unchanged() {
        assert_eq!(icon_url("https://x/static.png", "01n"), "https://x/static.png");
    }

    #[test]
    fn test_format_date_has_no_padding() {
        // 2020-09-03T12:00:00Z
        assert_eq!(format_date_in(1_599_134_400, &Utc), "9/3/2020");
    }

    #[test]
    fn test_format_date_two_digit_fields() {
        // 2021-12-25T00:00:00Z
        assert_eq!(format_date_in(1_640_390_400, &Utc), "12/25/2021");
    }

    #[test]
    fn test_one_decimal_rounds() {
        assert_eq!(one_decimal(88.52), "88.5");
        assert_eq!(one_decimal(9.0), "9.0");
        assert_eq!(one_decimal(-3.46), "-3.5");
    }
}
