//! Transaction velocity checks over an account's time series.

use crate::types::TimePoint;
use chrono::Duration;

/// True if some `count` consecutive transactions (in time order) fall within
/// `window` of each other.
///
/// The series is sorted on a copy; the input keeps arrival order. Fewer than
/// `count` points, or `count == 0`, never match.
pub fn has_burst(series: &[TimePoint], count: usize, window: Duration) -> bool {
    if count == 0 || series.len() < count {
        return false;
    }

    let mut sorted: Vec<_> = series.iter().map(|p| p.at).collect();
    sorted.sort();

    sorted
        .windows(count)
        .any(|w| w[count - 1] - w[0] <= window)
}

/// A window of `hours`, saturating at the largest representable duration.
pub fn window_hours(hours: u64) -> Duration {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn series(hours: &[i64]) -> Vec<TimePoint> {
        let base = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        hours
            .iter()
            .map(|&h| TimePoint {
                at: base + Duration::hours(h),
                amount: 1.0,
            })
            .collect()
    }

    #[test]
    fn test_too_few_points() {
        assert!(!has_burst(&series(&[0, 1, 2, 3]), 5, Duration::hours(24)));
        assert!(!has_burst(&[], 1, Duration::hours(24)));
        assert!(!has_burst(&series(&[0]), 0, Duration::hours(24)));
    }

    #[test]
    fn test_window_is_inclusive() {
        assert!(has_burst(&series(&[0, 6, 12, 18, 24]), 5, Duration::hours(24)));
        assert!(!has_burst(&series(&[0, 6, 12, 18, 25]), 5, Duration::hours(24)));
    }

    #[test]
    fn test_unsorted_input() {
        // Arrival order differs from time order; the dense run is 40..44.
        let points = series(&[44, 0, 42, 100, 41, 43, 40]);
        assert!(has_burst(&points, 5, Duration::hours(4)));
        assert!(!has_burst(&points, 5, Duration::hours(3)));
    }

    #[test]
    fn test_window_hours_saturates() {
        assert_eq!(window_hours(72), Duration::hours(72));
        assert_eq!(window_hours(u64::MAX), Duration::MAX);
    }

    #[test]
    fn test_sliding_window_finds_late_run() {
        let hours: Vec<i64> = (0..10).map(|i| i * 100).chain(1000..1010).collect();
        assert!(has_burst(&series(&hours), 10, Duration::hours(72)));
        assert!(!has_burst(&series(&hours[..10]), 10, Duration::hours(72)));
    }
}
