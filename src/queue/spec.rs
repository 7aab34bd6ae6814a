//! # Per-submission specification.
//!
//! [`TaskSpec`] bundles the knobs one submission can carry: an optional
//! label for events, an optional [`RetryPolicy`], and an optional
//! per-attempt deadline.
//!
//! A spec can be created:
//! - **Explicitly** with [`TaskSpec::named`] / builder methods
//! - **From config** with [`TaskSpec::with_defaults`] (inherit defaults)
//!
//! ## Composition order
//! When both retry and deadline are set, the queue's runner applies the
//! deadline **per attempt** — each retry gets a fresh deadline. To bound
//! the whole sequence with a single deadline instead, compose at the call
//! site: `abandon_after(retry_with(policy, f), d)`.

use std::sync::Arc;
use std::time::Duration;

use crate::policies::RetryPolicy;
use crate::queue::config::QueueConfig;

/// Specification for one queue submission.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskgate::{QueueConfig, RetryPolicy, TaskSpec};
///
/// // Explicit configuration:
/// let spec = TaskSpec::named("sync-user")
///     .with_retry(RetryPolicy::fixed(3, Duration::from_millis(100)))
///     .with_deadline(Duration::from_secs(2));
/// assert_eq!(spec.name(), Some("sync-user"));
/// assert_eq!(spec.deadline(), Some(Duration::from_secs(2)));
///
/// // Inherit from queue config (`timeout = 0s` is treated as `None`):
/// let spec2 = TaskSpec::with_defaults(&QueueConfig::default());
/// assert!(spec2.deadline().is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TaskSpec {
    name: Option<Arc<str>>,
    retry: Option<RetryPolicy>,
    deadline: Option<Duration>,
}

impl TaskSpec {
    /// Creates an empty spec: unnamed, single attempt, no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a spec with a label used in lifecycle events.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a spec inheriting retry/deadline defaults from config.
    ///
    /// Uses `QueueConfig::default_timeout()` so that `0s` in config is
    /// treated as `None`.
    pub fn with_defaults(cfg: &QueueConfig) -> Self {
        Self {
            name: None,
            retry: cfg.retry,
            deadline: cfg.default_timeout(),
        }
    }

    /// Returns a new spec with the given label.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns a new spec with the given retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Returns a new spec with the given per-attempt deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The label, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn name_arc(&self) -> Option<Arc<str>> {
        self.name.clone()
    }

    /// The retry policy, if one was set.
    pub fn retry(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// The per-attempt deadline, if one was set.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_inherit_from_config() {
        let cfg = QueueConfig {
            timeout: Duration::from_millis(250),
            retry: Some(RetryPolicy::fixed(4, Duration::from_millis(10))),
            ..QueueConfig::default()
        };
        let spec = TaskSpec::with_defaults(&cfg);
        assert!(spec.name().is_none());
        assert_eq!(spec.deadline(), Some(Duration::from_millis(250)));
        assert_eq!(spec.retry().map(|r| r.max_attempts()), Some(4));
    }

    #[test]
    fn builder_overrides() {
        let spec = TaskSpec::new()
            .with_name("job")
            .with_deadline(Duration::from_secs(1));
        assert_eq!(spec.name(), Some("job"));
        assert_eq!(spec.deadline(), Some(Duration::from_secs(1)));
        assert!(spec.retry().is_none());
    }
}
