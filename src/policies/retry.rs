//! # Retry policy: bounded attempts with a delay schedule.
//!
//! [`RetryPolicy`] bundles the attempt budget with a [`BackoffPolicy`]
//! that computes the delay between attempts. A policy is stateless per
//! invocation: each call to a wrapped factory gets its own fresh attempt
//! counter.
//!
//! ## Quick wiring
//! ```text
//! RetryPolicy { max_attempts, backoff }
//!      ├─► exec::retry_with(&policy, factory)        standalone wrapper
//!      └─► TaskSpec { retry: Some(policy), .. }      queue-managed retries
//! ```

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Bounded-attempt retry policy.
///
/// `max_attempts` counts **all** attempts including the first; a value of
/// 1 disables retry. Values below 1 are clamped to 1 at construction.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskgate::RetryPolicy;
///
/// // Three attempts, fixed 100ms pause between them.
/// let policy = RetryPolicy::fixed(3, Duration::from_millis(100));
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.delay_for(0), Duration::from_millis(100));
/// assert_eq!(policy.delay_for(1), Duration::from_millis(100));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffPolicy,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and backoff.
    ///
    /// `max_attempts` is clamped to a minimum of 1.
    pub fn new(max_attempts: u32, backoff: BackoffPolicy) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Creates a policy with a fixed delay between attempts.
    ///
    /// This matches the most common shape: retry N times, pause a
    /// constant duration after each failure.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::new(max_attempts, BackoffPolicy::fixed(delay))
    }

    /// A single attempt: retry disabled.
    pub fn once() -> Self {
        Self::new(1, BackoffPolicy::default())
    }

    /// Returns a new policy with the given backoff.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total attempt budget (≥ 1, includes the first attempt).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to sleep after the given failed attempt (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay_for(attempt)
    }
}

impl Default for RetryPolicy {
    /// Three attempts with the default (fixed 100ms) backoff.
    fn default() -> Self {
        Self::new(3, BackoffPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::JitterPolicy;

    #[test]
    fn zero_attempts_clamps_to_one() {
        let policy = RetryPolicy::new(0, BackoffPolicy::default());
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn once_disables_retry() {
        assert_eq!(RetryPolicy::once().max_attempts(), 1);
    }

    #[test]
    fn with_backoff_replaces_schedule() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(10)).with_backoff(BackoffPolicy {
            first: Duration::from_millis(50),
            max: Duration::from_secs(1),
            factor: 2.0,
            jitter: JitterPolicy::None,
        });
        assert_eq!(policy.delay_for(0), Duration::from_millis(50));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
    }
}
