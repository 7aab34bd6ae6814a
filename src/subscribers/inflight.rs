//! # InFlightTracker — track currently running task labels
//!
//! Maintains an in-memory set of **running** task labels by listening to
//! [`EventKind::TaskStarting`] and the terminal events
//! ([`EventKind::TaskStopped`], [`EventKind::TaskFailed`]).
//!
//! ## Why?
//! Callers can check which submissions are still executing (dashboards,
//! test assertions about drain completeness, stuck-task reporting).
//!
//! ## Behavior
//! - Repeated **start** for the same label (retry attempts) is an
//!   idempotent insert.
//! - The label is removed on the submission's single terminal event, so
//!   intermediate attempt failures keep it in the set.
//!
//! ## Internal scheme
//! ```text
//! on_event(ev):
//!   ├─ TaskStarting            && ev.task => insert(label)
//!   ├─ TaskStopped|TaskFailed  && ev.task => remove(label)
//!   └─ otherwise: ignore
//!
//! snapshot() -> Vec<String>  (sorted copy of the current set)
//! ```

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Tracks the set of currently running task labels.
pub struct InFlightTracker {
    inner: RwLock<HashSet<String>>,
    capacity: usize,
}

impl InFlightTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashSet::new()),
            capacity: 2048,
        }
    }

    /// Configure the event queue capacity for this subscriber.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Returns a snapshot (sorted) of currently running task labels.
    ///
    /// Synchronous; takes the read lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        let guard = self.inner.read().unwrap();
        let mut labels: Vec<String> = guard.iter().cloned().collect();
        labels.sort_unstable();
        labels
    }

    /// True if no tracked task is currently running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

#[async_trait]
impl Subscribe for InFlightTracker {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::TaskStarting => {
                if let Some(label) = ev.task.as_deref() {
                    // Retry attempts re-insert the same label (idempotent).
                    self.inner.write().unwrap().insert(label.to_owned());
                }
            }
            EventKind::TaskStopped | EventKind::TaskFailed => {
                if let Some(label) = ev.task.as_deref() {
                    self.inner.write().unwrap().remove(label);
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "InFlightTracker"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InFlightTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_start_and_terminal_events() {
        let tracker = InFlightTracker::new();

        tracker
            .on_event(&Event::now(EventKind::TaskStarting).with_task("a"))
            .await;
        tracker
            .on_event(&Event::now(EventKind::TaskStarting).with_task("b"))
            .await;
        assert_eq!(tracker.snapshot(), vec!["a".to_string(), "b".to_string()]);

        tracker
            .on_event(&Event::now(EventKind::TaskStopped).with_task("a"))
            .await;
        tracker
            .on_event(&Event::now(EventKind::TaskFailed).with_task("b").with_error("boom"))
            .await;
        assert!(tracker.is_idle());
    }

    #[tokio::test]
    async fn attempt_failures_keep_the_label() {
        let tracker = InFlightTracker::new();

        tracker
            .on_event(&Event::now(EventKind::TaskStarting).with_task("flaky"))
            .await;
        tracker
            .on_event(&Event::now(EventKind::AttemptFailed).with_task("flaky"))
            .await;
        tracker
            .on_event(&Event::now(EventKind::TaskStarting).with_task("flaky"))
            .await;
        assert_eq!(tracker.snapshot(), vec!["flaky".to_string()]);

        tracker
            .on_event(&Event::now(EventKind::TaskStopped).with_task("flaky"))
            .await;
        assert!(tracker.is_idle());
    }
}
