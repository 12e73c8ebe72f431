//! Command-line time parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses a window bound given on the command line.
///
/// Accepts RFC 3339 (`2024-01-31T12:00:00Z`, any offset), a naive
/// `YYYY-MM-DDTHH:MM:SS` taken as UTC, or a bare `YYYY-MM-DD` meaning
/// midnight UTC.
pub fn parse_time(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(format!(
        "invalid time '{}': expected RFC 3339 (2024-01-31T00:00:00Z) or YYYY-MM-DD",
        input
    ))
}
