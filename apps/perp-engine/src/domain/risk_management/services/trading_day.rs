//! Trading day keys.

use chrono::{DateTime, Duration, Utc};

/// Trading date key (`YYYY-MM-DD`) for a timestamp.
///
/// A trading day starts at `reset_hour` UTC. Hours outside `0..=23` fall back
/// to midnight; ledgers reject them at construction.
#[must_use]
pub fn trading_day(timestamp: DateTime<Utc>, reset_hour: u32) -> String {
    let hour = if reset_hour > 23 { 0 } else { reset_hour };
    let shifted = timestamp - Duration::hours(i64::from(hour));
    shifted.date_naive().format("%Y-%m-%d").to_string()
}
