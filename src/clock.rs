use chrono::{DateTime, TimeDelta, Utc};

/// Records are stamped in Korea Standard Time without a zone suffix.
pub const RECORD_UTC_OFFSET_HOURS: i64 = 9;

pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format `now` as a record timestamp, `YYYY-MM-DD HH:MM:SS` at UTC+9.
pub fn record_timestamp(now: DateTime<Utc>) -> String {
    (now.naive_utc() + TimeDelta::hours(RECORD_UTC_OFFSET_HOURS))
        .format(RECORD_TIMESTAMP_FORMAT)
        .to_string()
}
