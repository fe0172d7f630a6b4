//! ISO-8601 dates and lenient integer parsing for release timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses an ISO-8601 date or date-time into seconds since the epoch.
///
/// Accepts RFC 3339 (`2020-01-01T00:00:00Z`, `…+02:00`), a date-time without
/// offset (taken as UTC) and a bare date (midnight UTC). Returns `None` for
/// anything else, including dates before 1970.
pub fn iso8601_to_timestamp(value: &str) -> Option<u64> {
    let value = value.trim();

    let seconds = if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        dt.timestamp()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        naive.and_utc().timestamp()
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0)?.and_utc().timestamp()
    } else {
        return None;
    };

    u64::try_from(seconds).ok()
}

/// Formats seconds since the epoch as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn timestamp_to_iso8601(timestamp: u64) -> Option<String> {
    let seconds = i64::try_from(timestamp).ok()?;
    let dt = DateTime::<Utc>::from_timestamp(seconds, 0)?;
    Some(dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Reads leading decimal digits the way `strtoull` does; no digits yields 0.
///
/// Values that overflow saturate at `u64::MAX`.
pub fn parse_leading_u64(value: &str) -> u64 {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    value
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
        })
}
