//! Timestamp utilities

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Midnight (UTC) of the day `days` days before today
///
/// `days_ago(0)` is the start of today.
pub fn days_ago(days: u32) -> DateTime<Utc> {
    let today = now().date_naive();
    let day = today - Duration::days(i64::from(days));
    day.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_days_ago_zero_is_start_of_today() {
        let start = days_ago(0);
        assert!(start <= now());
        assert_eq!(start.date_naive(), now().date_naive());
        assert_eq!(start.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_days_ago_steps_back_whole_days() {
        let week = days_ago(7);
        assert_eq!((days_ago(0) - week).num_days(), 7);
    }
}
