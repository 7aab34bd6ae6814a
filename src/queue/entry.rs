//! Internal record for one queued submission.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::TaskError;
use crate::queue::spec::TaskSpec;

/// Boxed future produced by one task attempt.
pub(crate) type TaskFuture<T> = Pin<Box<dyn Future<Output = Result<T, TaskError>> + Send>>;

/// The deferred work carried by an entry.
///
/// `Once` jobs run a single attempt; `Factory` jobs can produce a fresh
/// future per attempt, which is what retry needs.
pub(crate) enum Job<T> {
    Once(Box<dyn FnOnce() -> TaskFuture<T> + Send>),
    Factory(Box<dyn FnMut() -> TaskFuture<T> + Send>),
}

/// One pending submission: the job, its reply slot, and its spec.
///
/// FIFO position is implicit (position in the pending deque). Owned
/// exclusively by the queue until dispatch; the reply slot fires exactly
/// once, when the runner settles the outcome.
pub(crate) struct QueueEntry<T> {
    /// Label used in lifecycle events.
    pub label: Arc<str>,
    /// Retry/deadline policies for this submission.
    pub spec: TaskSpec,
    /// The work itself.
    pub job: Job<T>,
    /// Success/failure delivery back to the caller's handle.
    pub reply: oneshot::Sender<Result<T, TaskError>>,
}
