//! Caller-facing handle for a submitted task's eventual outcome.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::TaskError;

/// The eventual outcome of one queue submission.
///
/// Settles exactly once with the task's success value or failure,
/// independent of any other submitted task. Await it directly:
///
/// ```
/// use taskgate::{TaskError, TaskQueue};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let queue = TaskQueue::new(2);
///     let handle = queue.submit(|| async { Ok::<_, TaskError>(21 * 2) });
///     assert_eq!(handle.await.unwrap(), 42);
/// }
/// ```
///
/// Dropping the handle does not affect the task: the queue runs it to
/// completion either way and simply discards the undeliverable outcome.
/// If the reply slot is dropped before the task settles (e.g., the
/// runtime shut down underneath the queue), the handle resolves to
/// [`TaskError::Abandoned`].
#[must_use = "a task handle settles with the task's outcome and should be awaited"]
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(rx: oneshot::Receiver<Result<T, TaskError>>) -> Self {
        Self { rx }
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| match res {
            Ok(outcome) => outcome,
            Err(_closed) => Err(TaskError::Abandoned),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_with_sent_outcome() {
        let (tx, rx) = oneshot::channel();
        let handle = TaskHandle::new(rx);
        tx.send(Ok::<_, TaskError>(5)).ok();
        assert_eq!(handle.await.unwrap(), 5);
    }

    #[tokio::test]
    async fn dropped_sender_means_abandoned() {
        let (tx, rx) = oneshot::channel::<Result<u8, TaskError>>();
        let handle = TaskHandle::new(rx);
        drop(tx);
        assert!(matches!(handle.await, Err(TaskError::Abandoned)));
    }
}
