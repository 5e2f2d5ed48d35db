//! FILENAME: core/engine/src/date.rs
//! PURPOSE: Date parsing and the fixed en-US date display used by list views.
//! CONTEXT: List dates arrive either as ISO-8601 strings (from the data source)
//! or as US short dates (from configuration). Everything is kept as a naive
//! UTC timestamp; offsets are folded into UTC when present.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats accepted for naive timestamps, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Formats accepted for plain dates, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parses a date string into a naive UTC timestamp.
/// Returns None when no known format matches.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Formats a timestamp as an en-US short date, e.g. `3/5/2024`.
pub fn format_us_date(value: &NaiveDateTime) -> String {
    value.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_iso_with_offset_folds_to_utc() {
        let parsed = parse_date("2024-03-05T23:30:00-02:00").unwrap();
        assert_eq!(format_us_date(&parsed), "3/6/2024");
    }

    #[test]
    fn test_parse_plain_and_us_dates() {
        assert_eq!(parse_date("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("3/5/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("12/31/2023"), Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn test_parse_naive_timestamp() {
        let parsed = parse_date("2024-01-02T08:15:00").unwrap();
        assert_eq!(format_us_date(&parsed), "1/2/2024");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }

    #[test]
    fn test_format_has_no_padding() {
        assert_eq!(format_us_date(&ymd(2024, 1, 9)), "1/9/2024");
        assert_eq!(format_us_date(&ymd(2024, 11, 23)), "11/23/2024");
    }
}
