//! Retry policy implementation

use std::time::Duration;

/// Delay between the first attempt and its single retry
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Bounded retry with a fixed delay
///
/// There is no backoff: a growing delay would leak into the latency numbers
/// the benchmark is trying to measure.
///
/// # Example
///
/// ```
/// use netbench_core::RetryPolicy;
///
/// let policy = RetryPolicy::from_enable_retry(true);
/// assert_eq!(policy.max_attempts, 2);
/// assert!(policy.has_attempts_remaining(1));
/// assert!(!policy.has_attempts_remaining(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including initial)
    pub max_attempts: u32,

    /// Delay before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryPolicy {
    /// Create a policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Create a policy with a fixed interval (at least one attempt)
    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Policy for the `enableRetry` flag: two attempts 500 ms apart, or one
    pub fn from_enable_retry(enable_retry: bool) -> Self {
        if enable_retry {
            Self::fixed(RETRY_DELAY, 2)
        } else {
            Self::no_retry()
        }
    }

    /// Delay to wait before the given attempt (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.delay
        }
    }

    /// Check if there are remaining attempts
    pub fn has_attempts_remaining(&self, current_attempt: u32) -> bool {
        current_attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_retry() {
        let policy = RetryPolicy::no_retry();
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.has_attempts_remaining(1));
    }

    #[test]
    fn test_enable_retry_allows_exactly_two_attempts() {
        let policy = RetryPolicy::from_enable_retry(true);
        assert_eq!(policy.max_attempts, 2);
        assert!(policy.has_attempts_remaining(1));
        assert!(!policy.has_attempts_remaining(2));

        assert_eq!(RetryPolicy::from_enable_retry(false), RetryPolicy::no_retry());
    }

    #[test]
    fn test_fixed_interval() {
        let policy = RetryPolicy::fixed(Duration::from_millis(500), 3);

        assert_eq!(policy.delay_for_attempt(1), Duration::ZERO);
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(500));
    }

    #[test]
    fn test_fixed_never_below_one_attempt() {
        assert_eq!(RetryPolicy::fixed(Duration::ZERO, 0).max_attempts, 1);
    }
}
