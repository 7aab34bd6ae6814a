//! # Backoff policy for retry delays.
//!
//! [`BackoffPolicy`] controls how retry delays evolve after repeated
//! failures. It is parameterized by:
//! - [`BackoffPolicy::first`] the initial delay;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay after attempt `n` (0-indexed) is `first × factor^n`, clamped
//! to `max`, then jitter is applied. The base delay is derived purely from
//! the attempt number, so jitter output never feeds back into subsequent
//! calculations.
//!
//! The default is a **fixed** delay (`factor = 1.0`); exponential growth
//! is opt-in by raising the factor.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskgate::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! // After attempt 0 — uses `first` (100ms)
//! assert_eq!(backoff.delay_for(0), Duration::from_millis(100));
//!
//! // After attempt 1 — first × factor^1 = 200ms
//! assert_eq!(backoff.delay_for(1), Duration::from_millis(200));
//!
//! // After attempt 10 — 100ms × 2^10 = 102_400ms → capped at max=10s
//! assert_eq!(backoff.delay_for(10), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry backoff policy.
///
/// Encapsulates the parameters that determine how retry delays grow:
/// - [`BackoffPolicy::first`] — the initial delay;
/// - [`BackoffPolicy::factor`] — multiplicative growth factor;
/// - [`BackoffPolicy::max`] — the maximum delay cap.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Initial delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap for retries.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy to prevent thundering herd.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `first = 100ms`;
    /// - `factor = 1.0` (constant delay);
    /// - `max = 30s`;
    /// - no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// A fixed delay between attempts, no growth, no jitter.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay after the given attempt number (0-indexed).
    ///
    /// The base delay is `first × factor^attempt`, clamped to
    /// [`BackoffPolicy::max`]. Jitter is applied to the clamped base, and
    /// the result is **never** fed back into subsequent calculations —
    /// each attempt derives its base independently.
    ///
    /// # Notes
    /// - If `factor` equals 1.0, the delay remains constant at `first`
    ///   (up to `max`).
    /// - If `factor` is greater than 1.0, delays grow exponentially up to
    ///   `max`.
    /// - Overflowing or non-finite intermediate values clamp to `max`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let raw_secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !raw_secs.is_finite() || raw_secs < 0.0 || raw_secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(raw_secs)
        };

        self.jitter.apply(base)
    }
}
