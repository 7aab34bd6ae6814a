//! # Runtime events emitted by the queue and its runner.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: one submission's execution flow (submitted,
//!   starting, attempt failed, timeout, retry scheduled, stopped, failed)
//! - **Queue events**: whole-queue state changes (drained)
//! - **Fan-out events**: subscriber self-reporting (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! task labels, error messages, and backoff delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Terminal events
//! Each submission produces exactly one terminal event:
//! [`EventKind::TaskStopped`] on success or [`EventKind::TaskFailed`] on
//! final failure. [`EventKind::AttemptFailed`] and
//! [`EventKind::TimeoutHit`] are non-terminal; a retry may follow.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskgate::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::TaskFailed)
//!     .with_task("demo-task")
//!     .with_error("boom")
//!     .with_attempt(3);
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("demo-task"));
//! assert_eq!(ev.error.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Submission lifecycle ===
    /// A submission was accepted into the queue.
    ///
    /// Sets:
    /// - `task`: task label
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskSubmitted,

    /// A task is starting an attempt (dispatched from the pending queue).
    ///
    /// Sets:
    /// - `task`: task label
    /// - `attempt`: attempt number (1-based, per submission)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStarting,

    /// One attempt failed; non-terminal, a retry may follow.
    ///
    /// Sets:
    /// - `task`: task label
    /// - `attempt`: attempt number
    /// - `error`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AttemptFailed,

    /// An attempt's deadline elapsed; non-terminal, a retry may follow.
    ///
    /// Always followed by [`EventKind::AttemptFailed`] for the same
    /// attempt.
    ///
    /// Sets:
    /// - `task`: task label
    /// - `attempt`: attempt number
    /// - `timeout`: the configured attempt deadline
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimeoutHit,

    /// Next attempt scheduled after a failure.
    ///
    /// Sets:
    /// - `task`: task label
    /// - `attempt`: previous attempt number
    /// - `delay`: delay before the next attempt
    /// - `error`: last failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RetryScheduled,

    /// Terminal success: the submission settled with a value.
    ///
    /// Sets:
    /// - `task`: task label
    /// - `attempt`: successful attempt number
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskStopped,

    /// Terminal failure: the submission settled with an error.
    ///
    /// Sets:
    /// - `task`: task label
    /// - `attempt`: last attempt number
    /// - `error`: final failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFailed,

    // === Queue events ===
    /// The queue became idle: no tasks in flight, none pending.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    QueueDrained,

    // === Fan-out events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `error`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `error`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Label of the task (or subscriber name for fan-out events).
    pub task: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Attempt deadline, for [`EventKind::TimeoutHit`].
    pub timeout: Option<Duration>,
    /// Backoff delay before the next attempt.
    pub delay: Option<Duration>,
    /// Human-readable error message.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp
    /// and the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            attempt: None,
            timeout: None,
            delay: None,
            error: None,
        }
    }

    /// Attaches a task label.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches the attempt deadline.
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout = Some(d);
        self
    }

    /// Attaches a backoff delay.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches a human-readable error message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// True if this submission will produce no further events.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::TaskStopped | EventKind::TaskFailed)
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub(crate) fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_error(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub(crate) fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_error(info)
    }
}
