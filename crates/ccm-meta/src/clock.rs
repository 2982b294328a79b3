//! Wall-clock helpers pinned to UTC+8
//!
//! Snapshot identifiers and creation times use a fixed +08:00 offset so
//! they sort the same way for every user regardless of local timezone.

use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};

const UTC8_SECONDS: i32 = 8 * 60 * 60;

/// Width of a snapshot timestamp (`yyyyMMddHHmmssSSS`).
pub const TIMESTAMP_LEN: usize = 17;

/// The fixed +08:00 offset.
pub fn utc8() -> FixedOffset {
    match FixedOffset::east_opt(UTC8_SECONDS) {
        Some(offset) => offset,
        None => Utc.fix(),
    }
}

/// Current time in UTC+8.
pub fn now_utc8() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&utc8())
}

/// ISO-8601 with millisecond precision and an explicit `+08:00` offset.
pub fn iso_utc8(at: DateTime<FixedOffset>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// 17-digit sortable snapshot timestamp.
pub fn compact_timestamp(at: DateTime<FixedOffset>) -> String {
    at.format("%Y%m%d%H%M%S%3f").to_string()
}

/// Whether `value` has the shape of a snapshot timestamp.
pub fn is_compact_timestamp(value: &str) -> bool {
    value.len() == TIMESTAMP_LEN && value.bytes().all(|b| b.is_ascii_digit())
}
