//! # Deadline wrapper: bound the wait, not the work.
//!
//! [`abandon_after`] races a task against a deadline. If the deadline
//! elapses first, the caller gets [`TaskError::Timeout`] — and the task
//! itself **keeps running** as a detached tokio task. There is no
//! preemption primitive here; the wrapper only stops *waiting*. The name
//! says what actually happens: abandonment, not cancellation.
//!
//! ## State machine
//! ```text
//! Pending ──► Succeeded   (inner task settled with Ok first)
//!         ──► Failed      (inner task settled with Err first)
//!         ──► TimedOut    (deadline elapsed first; work continues detached)
//! ```
//! All three outcomes are terminal.
//!
//! ## Composition with retry
//! - `abandon_after(retry_with(policy, f), d)` bounds the **whole** retry
//!   sequence by one deadline.
//! - `retry_with(policy, || abandon_after(f(), d))` gives each attempt its
//!   own fresh deadline.
//!
//! Both are legitimate; they give materially different latency bounds
//! under failure. The queue's own runner uses the per-attempt form — see
//! [`TaskSpec`](crate::TaskSpec).

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinError;
use tokio::time;

use crate::error::TaskError;

/// Waits for `fut` at most `deadline`; abandons it afterwards.
///
/// The future is spawned onto the runtime, so on expiry it continues to
/// completion in the background — only the caller stops waiting and
/// receives [`TaskError::Timeout`]. A panic inside the task surfaces as
/// [`TaskError::Fail`] carrying the panic message.
///
/// ### Constraints
/// - `deadline` must be positive to be meaningful; `Duration::ZERO` times
///   out immediately.
/// - Because the future is spawned, it must be `Send + 'static`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskgate::{abandon_after, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let fast = abandon_after(
///         async { Ok::<_, TaskError>(7) },
///         Duration::from_millis(100),
///     )
///     .await;
///     assert_eq!(fast.unwrap(), 7);
/// }
/// ```
pub async fn abandon_after<T, F>(fut: F, deadline: Duration) -> Result<T, TaskError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, TaskError>> + Send + 'static,
{
    let handle = tokio::spawn(fut);
    match time::timeout(deadline, handle).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => Err(join_error_to_task_error(join_err)),
        // Dropping the JoinHandle detaches the task; it runs on.
        Err(_elapsed) => Err(TaskError::Timeout { deadline }),
    }
}

/// Maps a join failure (task panic) onto the error taxonomy.
fn join_error_to_task_error(err: JoinError) -> TaskError {
    match err.try_into_panic() {
        Ok(panic) => {
            let info = if let Some(msg) = panic.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = panic.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            TaskError::Fail {
                error: format!("task panicked: {info}"),
            }
        }
        Err(_) => TaskError::Abandoned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn deadline_fires_before_slow_task() {
        let start = Instant::now();
        let res = abandon_after(
            async {
                time::sleep(Duration::from_millis(500)).await;
                Ok::<_, TaskError>("late")
            },
            Duration::from_millis(100),
        )
        .await;

        assert!(matches!(res, Err(TaskError::Timeout { deadline }) if deadline == Duration::from_millis(100)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_task_beats_deadline() {
        let start = Instant::now();
        let res = abandon_after(
            async {
                time::sleep(Duration::from_millis(50)).await;
                Ok::<_, TaskError>(42)
            },
            Duration::from_millis(100),
        )
        .await;

        assert_eq!(res.unwrap(), 42);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_work_runs_to_completion() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);

        let res = abandon_after(
            async move {
                time::sleep(Duration::from_millis(300)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, TaskError>(())
            },
            Duration::from_millis(50),
        )
        .await;
        assert!(matches!(res, Err(TaskError::Timeout { .. })));
        assert!(!finished.load(Ordering::SeqCst));

        // The spawned task was not stopped; give it time to finish.
        time::sleep(Duration::from_millis(400)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn inner_failure_passes_through() {
        let res = abandon_after(
            async { Err::<(), _>(TaskError::fail("boom")) },
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(res, Err(TaskError::Fail { error }) if error == "boom"));
    }

    #[tokio::test]
    async fn panic_surfaces_as_failure() {
        let res: Result<(), TaskError> =
            abandon_after(async { panic!("kaboom") }, Duration::from_secs(1)).await;
        assert!(matches!(res, Err(TaskError::Fail { error }) if error.contains("kaboom")));
    }
}
