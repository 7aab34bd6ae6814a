//! # Queue configuration.
//!
//! Provides [`QueueConfig`], centralized settings for a
//! [`TaskQueue`](crate::TaskQueue).
//!
//! Config is used in two ways:
//! 1. **Queue creation**: `TaskQueue::with_config(config, subscribers)`
//! 2. **TaskSpec defaults**: `TaskSpec::with_defaults(&config)`
//!
//! ## Sentinel values
//! - `timeout = 0s` → no per-attempt deadline (treated as `None` by
//!   `TaskSpec::with_defaults`)
//! - `capacity` and `bus_capacity` below 1 are clamped to 1

use std::time::Duration;

use crate::policies::RetryPolicy;

/// Configuration for a task queue.
///
/// ## Field semantics
/// - `capacity`: max simultaneously running tasks (min 1; clamped)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
/// - `timeout`: default per-attempt deadline (`0s` = no deadline)
/// - `retry`: default retry policy for spec-based submissions
///   (`None` = single attempt)
///
/// All fields are public for flexibility. Prefer the helper accessors to
/// avoid sprinkling sentinel checks across call sites.
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Maximum number of tasks to run concurrently.
    ///
    /// There is no "unlimited" sentinel: a queue always has a bound, and
    /// values below 1 are clamped up to 1.
    pub capacity: usize,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events
    /// observe `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Default per-attempt deadline for spec-based submissions.
    ///
    /// - `Duration::ZERO` = no deadline (attempt runs until it settles)
    /// - `> 0` = deadline applied to each attempt
    ///
    /// Used by `TaskSpec::with_defaults()`. Can be overridden per spec.
    pub timeout: Duration,

    /// Default retry policy for spec-based submissions.
    ///
    /// Used by `TaskSpec::with_defaults()`. Can be overridden per spec.
    pub retry: Option<RetryPolicy>,
}

impl QueueConfig {
    /// Returns the concurrency capacity clamped to a minimum of 1.
    #[inline]
    pub fn capacity_clamped(&self) -> usize {
        self.capacity.max(1)
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the default per-attempt deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → deadline applied per attempt
    #[inline]
    pub fn default_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }
}

impl Default for QueueConfig {
    /// Default configuration:
    ///
    /// - `capacity = 1` (strictly sequential, the conservative baseline)
    /// - `bus_capacity = 1024` (good baseline)
    /// - `timeout = 0s` (no deadline)
    /// - `retry = None` (single attempt)
    fn default() -> Self {
        Self {
            capacity: 1,
            bus_capacity: 1024,
            timeout: Duration::ZERO,
            retry: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_clamps_to_one() {
        let cfg = QueueConfig {
            capacity: 0,
            ..QueueConfig::default()
        };
        assert_eq!(cfg.capacity_clamped(), 1);
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg = QueueConfig::default();
        assert!(cfg.default_timeout().is_none());

        let cfg = QueueConfig {
            timeout: Duration::from_secs(5),
            ..QueueConfig::default()
        };
        assert_eq!(cfg.default_timeout(), Some(Duration::from_secs(5)));
    }
}
