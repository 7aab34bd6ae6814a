//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [submitted] task="fetch-user"
//! [starting] task="fetch-user" attempt=1
//! [attempt-failed] task="fetch-user" err="connection refused" attempt=1
//! [retry] task="fetch-user" delay=100ms after_attempt=1
//! [timeout] task="fetch-user" deadline=2s
//! [stopped] task="fetch-user"
//! [drained]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskSubmitted => {
                println!("[submitted] task={:?}", e.task);
            }
            EventKind::TaskStarting => {
                println!("[starting] task={:?} attempt={:?}", e.task, e.attempt);
            }
            EventKind::AttemptFailed => {
                println!(
                    "[attempt-failed] task={:?} err={:?} attempt={:?}",
                    e.task, e.error, e.attempt
                );
            }
            EventKind::TimeoutHit => {
                println!(
                    "[timeout] task={:?} deadline={:?} attempt={:?}",
                    e.task, e.timeout, e.attempt
                );
            }
            EventKind::RetryScheduled => {
                println!(
                    "[retry] task={:?} delay={:?} after_attempt={:?} err={:?}",
                    e.task, e.delay, e.attempt, e.error
                );
            }
            EventKind::TaskStopped => {
                println!("[stopped] task={:?} attempt={:?}", e.task, e.attempt);
            }
            EventKind::TaskFailed => {
                println!(
                    "[failed] task={:?} err={:?} attempt={:?}",
                    e.task, e.error, e.attempt
                );
            }
            EventKind::QueueDrained => {
                println!("[drained]");
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.task, e.error
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.task.as_deref().unwrap_or("unknown"),
                    e.error.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
