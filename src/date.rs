//! Target date parsing
//!
//! Accepts the values browser date pickers produce, with the same
//! interpretation `new Date(value)` gives them:
//! - `YYYY-MM-DD` is midnight UTC
//! - `YYYY-MM-DDTHH:MM[:SS]` is local wall-clock time
//! - RFC 3339 strings carry their own offset

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date value to epoch milliseconds. `None` if unparseable.
pub fn parse_target_ms(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).timestamp_millis());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }

    LOCAL_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(value, fmt).ok()?;
        // Skipped local times (DST gaps) have no instant
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp_millis())
    })
}
