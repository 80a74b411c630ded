//! Timestamp utilities

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Convert epoch milliseconds to a UTC datetime
///
/// Returns None when the value is outside chrono's representable range.
pub fn from_epoch_ms(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Calendar month (1-12) of an epoch-millisecond timestamp seen at `offset`
pub fn month_of_year(millis: i64, offset: FixedOffset) -> Option<u32> {
    from_epoch_ms(millis).map(|utc| utc.with_timezone(&offset).month())
}

/// Build a fixed offset from minutes east of UTC, falling back to UTC
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(utc_offset)
}

/// The zero offset
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}
