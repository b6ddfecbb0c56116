//! Date parsing for hinted columns and lookup validity dates.
//!
//! Partner extracts arrive with a mix of ISO dates, US-style dates, and
//! spreadsheet datetime exports. Everything funnels through one parser so
//! a date means the same thing in every stage; unparseable values become
//! null rather than failing the load.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d-%b-%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse a date from any of the supported formats, discarding any time
/// component.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Canonical ISO form used for date columns inside frames.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("2024-03-05"), Some(expected));
        assert_eq!(parse_date("3/5/2024"), Some(expected));
        assert_eq!(parse_date("3/5/24"), Some(expected));
        assert_eq!(parse_date("05-Mar-2024"), Some(expected));
        assert_eq!(parse_date("2024-03-05 00:00:00"), Some(expected));
        assert_eq!(parse_date("3/5/2024 0:00"), Some(expected));
    }

    #[test]
    fn rejects_junk() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }

    #[test]
    fn iso_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(parse_date(&format_iso_date(date)), Some(date));
    }
}
