//! Calendar parsing shared by the detector, the converters and the dialect formatter

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

/// Parse a string as a calendar date or instant.
///
/// Zone-less inputs are read as UTC; date-only inputs resolve to midnight.
pub fn parse_calendar(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Full ISO-8601 instant with millisecond precision and a `Z` suffix
pub fn to_iso_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// ISO date and time with a space separator, no fraction and no zone
pub fn to_space_separated(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = parse_calendar("2024-01-01").unwrap();
        assert_eq!(to_iso_instant(&dt), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_calendar("2024-03-05T10:15:30+02:00").unwrap();
        assert_eq!(to_space_separated(&dt), "2024-03-05 08:15:30");
    }

    #[test]
    fn test_parse_us_format() {
        assert!(parse_calendar("12/31/2023").is_some());
        assert!(parse_calendar("2023/12/31 23:59:59").is_some());
    }

    #[test]
    fn test_rejects_non_dates() {
        assert!(parse_calendar("42").is_none());
        assert!(parse_calendar("hello").is_none());
        assert!(parse_calendar("").is_none());
        assert!(parse_calendar("2024-13-45").is_none());
    }
}
