//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time as stored in the database (RFC 3339, millisecond precision)
///
/// Fixed-width, so text ordering matches chronological ordering.
pub fn now_db_string() -> String {
    to_db_string(&now())
}

/// Format a timestamp the way the database stores it
pub fn to_db_string(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current Unix epoch time in milliseconds
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}
