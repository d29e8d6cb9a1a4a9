//! Freshness policy for cached analyses.

use chrono::{DateTime, Duration, Utc};

/// Whether a stored analysis generated at `generated_at` is still fresh at
/// `now` for a window of `freshness_days`.
///
/// Strictly less-than: a row aged exactly the window is stale and eligible
/// for regeneration.
#[must_use]
pub fn is_fresh(generated_at: DateTime<Utc>, now: DateTime<Utc>, freshness_days: i64) -> bool {
    now - generated_at < Duration::days(freshness_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_three_days_old_is_fresh() {
        let now = Utc::now();
        assert!(is_fresh(now - Duration::days(3), now, 7));
    }

    #[test]
    fn row_just_under_the_window_is_fresh() {
        let now = Utc::now();
        let generated = now - (Duration::days(7) - Duration::seconds(1));
        assert!(is_fresh(generated, now, 7));
    }

    #[test]
    fn row_exactly_at_the_window_is_stale() {
        let now = Utc::now();
        assert!(!is_fresh(now - Duration::hours(7 * 24), now, 7));
    }

    #[test]
    fn row_older_than_the_window_is_stale() {
        let now = Utc::now();
        assert!(!is_fresh(now - Duration::days(30), now, 7));
    }

    #[test]
    fn window_is_configurable() {
        let now = Utc::now();
        let generated = now - Duration::days(10);
        assert!(!is_fresh(generated, now, 7));
        assert!(is_fresh(generated, now, 14));
    }
}
