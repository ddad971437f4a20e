//! Time utility functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a decimal nanosecond timestamp string (surrounding whitespace allowed).
///
/// Parsed as `i128` so values past the `i64` nanosecond range (year 2262) and
/// zero-padded strings still yield exact differences.
pub fn parse_nanos(nanos: &str) -> Option<i128> {
    nanos.trim().parse().ok()
}

/// Convert a decimal nanosecond timestamp string to DateTime<Utc>.
///
/// Precision is truncated to milliseconds. Unparseable input, or an instant
/// outside the range chrono can represent, maps to the epoch.
pub fn nanos_str_to_datetime(nanos: &str) -> DateTime<Utc> {
    parse_nanos(nanos)
        .and_then(|n| i64::try_from(n / 1_000_000).ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(|| {
            tracing::warn!(nanos, "Invalid nanosecond timestamp, using epoch");
            DateTime::UNIX_EPOCH
        })
}

/// Parse an ISO 8601 timestamp.
///
/// Accepts RFC 3339, a naive date-time (read as UTC), or a bare date (midnight UTC).
pub fn parse_iso_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an optional ISO 8601 timestamp, falling back to the epoch.
pub fn iso_to_datetime(ts: Option<&str>) -> DateTime<Utc> {
    ts.and_then(parse_iso_timestamp).unwrap_or_else(|| {
        tracing::warn!(ts, "Invalid ISO timestamp, using epoch");
        DateTime::UNIX_EPOCH
    })
}
