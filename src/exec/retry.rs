//! # Retry wrapper: bounded re-attempts over a task factory.
//!
//! [`retry_with`] invokes a factory up to `max_attempts` times, sleeping
//! the policy's delay between attempts. The factory produces a **fresh**
//! future per attempt — an in-flight future is never reused.
//!
//! ## Flow
//! ```text
//! attempt 1 ──► Ok(v)  ───────────────────────► Ok(v)
//!           └─► Err(e) retryable, budget left ─► sleep(delay) ─► attempt 2 ...
//!           └─► Err(e) fatal ─────────────────► Err(e)
//!           └─► Err(e) budget spent ──────────► Err(Exhausted{attempts, last: e})
//! ```
//!
//! Intermediate failures are swallowed; only the final one is surfaced.
//! Reporting them is the caller's business — submit through a
//! [`TaskQueue`](crate::TaskQueue) with a retry spec if you want
//! `RetryScheduled` events instead.

use std::future::Future;

use tokio::time;

use crate::error::TaskError;
use crate::policies::RetryPolicy;

/// Runs `factory` until it succeeds or the attempt budget is spent.
///
/// ### Semantics
/// - `factory` is called fresh on each attempt.
/// - A non-retryable error ([`TaskError::is_retryable`] is false) stops
///   the loop immediately and is returned as-is.
/// - With `max_attempts == 1` the wrapper is transparent: the single
///   attempt's error comes back unwrapped.
/// - With a larger budget, exhaustion returns
///   [`TaskError::Exhausted`] wrapping the **last** attempt's error, not
///   the first.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use taskgate::{retry_with, RetryPolicy, TaskError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let calls = AtomicU32::new(0);
///     let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
///
///     let out = retry_with(&policy, || async {
///         if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///             Err(TaskError::fail("not yet"))
///         } else {
///             Ok("third time lucky")
///         }
///     })
///     .await;
///
///     assert_eq!(out.unwrap(), "third time lucky");
///     assert_eq!(calls.load(Ordering::SeqCst), 3);
/// }
/// ```
pub async fn retry_with<T, F, Fut>(policy: &RetryPolicy, mut factory: F) -> Result<T, TaskError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TaskError>>,
{
    let max = policy.max_attempts();
    let mut attempt: u32 = 0;

    loop {
        match factory().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if !err.is_retryable() {
                    return Err(err);
                }
                if attempt >= max {
                    if max == 1 {
                        return Err(err);
                    }
                    return Err(TaskError::Exhausted {
                        attempts: max,
                        last: Box::new(err),
                    });
                }
                time::sleep(policy.delay_for(attempt - 1)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn counting_factory<'a>(
        calls: &'a AtomicU32,
        fail_first: u32,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, TaskError>> + 'a>> {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move {
                if n <= fail_first {
                    Err(TaskError::fail(format!("boom #{n}")))
                } else {
                    Ok(n)
                }
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_factory_runs_exactly_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_millis(10));

        let res = retry_with(&policy, counting_factory(&calls, u32::MAX)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match res {
            Err(TaskError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                // The surfaced error is the 3rd attempt's, not the 1st.
                assert!(matches!(*last, TaskError::Fail { ref error } if error == "boom #3"));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_millis(10));

        let res = retry_with(&policy, counting_factory(&calls, 2)).await;

        assert_eq!(res.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn single_attempt_is_transparent() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::once();

        let res = retry_with(&policy, counting_factory(&calls, u32::MAX)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(res, Err(TaskError::Fail { error }) if error == "boom #1"));
    }

    #[tokio::test]
    async fn fatal_error_short_circuits() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(5, Duration::from_millis(1));

        let res = retry_with(&policy, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(TaskError::fatal("unrecoverable")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(res, Err(TaskError::Fatal { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_between_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::fixed(3, Duration::from_millis(100));
        let start = Instant::now();

        let _ = retry_with(&policy, counting_factory(&calls, u32::MAX)).await;

        // Two sleeps between three attempts.
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
