//! Date parsing for claim date columns.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 13] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
    "%m/%d/%Y %H:%M:%S", // US
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S", // European
    "%d/%m/%Y %H:%M",
];

// Month-first wins for ambiguous slashed dates.
const DATE_FORMATS: [&str; 14] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",  // US: 01/15/2024
    "%d/%m/%Y",  // European: 15/01/2024
    "%d-%b-%Y",  // 15-Jan-2024
    "%d-%B-%Y",  // 15-January-2024
    "%d.%m.%Y",  // 15.01.2024
    "%Y%m%d",    // 20240115
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%d %b %Y",  // 15 Jan 2024
    "%d %B %Y",  // 15 January 2024
    "%Y-%b-%d",  // 2024-Jan-15
    "%d-%m-%Y",  // 15-01-2024
];

/// Parse a date or date-time string, keeping only the date part.
///
/// Date-times with a `Z` or offset suffix keep their local date.
///
/// Returns `None` for empty or unrecognised input.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
