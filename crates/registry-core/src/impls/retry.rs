//! Retry policy for storage reads: decides attempts and backoff delays.

use std::time::Duration;

/// Retry policy for transient read failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Backoff multiplier for exponential backoff.
    pub multiplier: f64,
}

/// Upper bound of a single backoff delay.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier: sanitize_multiplier(multiplier),
        }
    }

    /// A single attempt, no retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    /// Delay before the retry that follows attempt number `attempts` (1-indexed).
    ///
    /// delay = base_delay * multiplier^(attempts - 1), capped at [`MAX_DELAY`].
    pub fn next_delay(&self, attempts: u32) -> Duration {
        let base_secs = self.base_delay.as_secs_f64();
        let exponent = i32::try_from(attempts.saturating_sub(1)).unwrap_or(i32::MAX);
        let delay_secs = base_secs * sanitize_multiplier(self.multiplier).powi(exponent);
        Duration::try_from_secs_f64(delay_secs)
            .unwrap_or(Duration::MAX)
            .min(MAX_DELAY)
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn should_retry(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

// fields are public, so next_delay re-applies this too
fn sanitize_multiplier(multiplier: f64) -> f64 {
    if multiplier.is_finite() {
        multiplier.max(1.0)
    } else {
        1.0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(10), 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_has_reasonable_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(10));
        assert_eq!(policy.multiplier, 2.0);
    }

    #[test]
    fn exponential_backoff_increases() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2), 2.0);

        assert_eq!(policy.next_delay(1), Duration::from_secs(2));
        assert_eq!(policy.next_delay(2), Duration::from_secs(4));
        assert_eq!(policy.next_delay(3), Duration::from_secs(8));
        // attempts=0 は base_delay 扱い
        assert_eq!(policy.next_delay(0), Duration::from_secs(2));
    }

    #[test]
    fn retries_stop_at_max_attempts() {
        let policy = RetryPolicy::new(3, Duration::ZERO, 1.0);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn invalid_multipliers_fall_back_to_constant_backoff() {
        for multiplier in [-1.0, f64::NAN, f64::INFINITY, 0.5] {
            let policy = RetryPolicy::new(3, Duration::from_millis(10), multiplier);
            assert_eq!(policy.multiplier, 1.0);
            assert_eq!(policy.next_delay(2), Duration::from_millis(10));
        }
    }

    #[test]
    fn public_fields_cannot_make_next_delay_panic() {
        let mut policy = RetryPolicy::default();
        policy.multiplier = f64::NAN;
        assert_eq!(policy.next_delay(5), policy.base_delay);
        policy.multiplier = -3.0;
        assert_eq!(policy.next_delay(2), policy.base_delay);
    }

    #[test]
    fn long_retry_chains_are_capped() {
        let policy = RetryPolicy::new(100, Duration::from_millis(10), 2.0);
        assert_eq!(policy.next_delay(80), MAX_DELAY);
        assert_eq!(policy.next_delay(u32::MAX), MAX_DELAY);
        assert!(policy.next_delay(5) < MAX_DELAY);
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO, 1.0);
        assert_eq!(policy.max_attempts, 1);
        assert!(!RetryPolicy::no_retry().should_retry(1));
    }
}
