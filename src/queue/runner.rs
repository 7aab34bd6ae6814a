//! # Run one submission to settlement.
//!
//! Executes a [`QueueEntry`]'s job attempt by attempt, applies the spec's
//! per-attempt deadline and retry policy, and publishes lifecycle events
//! to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! Success:
//!   attempt → Ok(v) → publish TaskStopped
//!
//! Failure without retry budget:
//!   attempt → Err(e) → publish AttemptFailed → publish TaskFailed
//!
//! Failure with retry budget:
//!   attempt → Err(e) → publish AttemptFailed
//!                    → publish RetryScheduled{delay} → sleep(delay)
//!                    → next attempt
//!
//! Deadline expiry:
//!   deadline elapsed → publish TimeoutHit → treated as a failed attempt
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event per submission:
//!   `TaskStopped` or `TaskFailed`.
//! - A panicking attempt is converted to a failed attempt (panic message
//!   preserved); it never tears down the runner.
//! - Unlike [`abandon_after`](crate::abandon_after), the per-attempt
//!   deadline here **drops** the attempt future on expiry. The queue
//!   accounts for capacity, so it must not leave invisible work running
//!   past its slot.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::RetryPolicy;
use crate::queue::entry::{Job, TaskFuture};
use crate::queue::spec::TaskSpec;

/// Runs one entry's job until terminal, publishing lifecycle events.
pub(crate) async fn run_entry<T>(
    label: Arc<str>,
    spec: TaskSpec,
    job: Job<T>,
    bus: &Bus,
) -> Result<T, TaskError> {
    let deadline = spec.deadline();

    match job {
        Job::Once(f) => {
            let res = run_attempt(f(), deadline, &label, 1, bus).await;
            finish(res, 1, &label, bus)
        }
        Job::Factory(mut f) => {
            let policy = spec.retry().copied().unwrap_or_else(RetryPolicy::once);
            let max = policy.max_attempts();
            let mut attempt: u32 = 0;

            loop {
                attempt += 1;
                match run_attempt(f(), deadline, &label, attempt, bus).await {
                    Ok(value) => return finish(Ok(value), attempt, &label, bus),
                    Err(err) => {
                        if !err.is_retryable() {
                            return finish(Err(err), attempt, &label, bus);
                        }
                        if attempt >= max {
                            let final_err = if max > 1 {
                                TaskError::Exhausted {
                                    attempts: max,
                                    last: Box::new(err),
                                }
                            } else {
                                err
                            };
                            return finish(Err(final_err), attempt, &label, bus);
                        }

                        let delay = policy.delay_for(attempt - 1);
                        bus.publish(
                            Event::now(EventKind::RetryScheduled)
                                .with_task(Arc::clone(&label))
                                .with_attempt(attempt)
                                .with_delay(delay)
                                .with_error(err.as_message()),
                        );
                        time::sleep(delay).await;
                    }
                }
            }
        }
    }
}

/// Executes a single attempt with an optional deadline.
///
/// Publishes `TaskStarting`, and on failure `TimeoutHit` /
/// `AttemptFailed`. Panics inside the attempt surface as
/// [`TaskError::Fail`] with the panic message.
async fn run_attempt<T>(
    fut: TaskFuture<T>,
    deadline: Option<Duration>,
    label: &Arc<str>,
    attempt: u32,
    bus: &Bus,
) -> Result<T, TaskError> {
    bus.publish(
        Event::now(EventKind::TaskStarting)
            .with_task(Arc::clone(label))
            .with_attempt(attempt),
    );

    let guarded = std::panic::AssertUnwindSafe(fut).catch_unwind();

    let res = match deadline.filter(|d| *d > Duration::ZERO) {
        Some(dur) => match time::timeout(dur, guarded).await {
            Ok(settled) => flatten_panic(settled),
            Err(_elapsed) => {
                bus.publish(
                    Event::now(EventKind::TimeoutHit)
                        .with_task(Arc::clone(label))
                        .with_attempt(attempt)
                        .with_timeout(dur),
                );
                Err(TaskError::Timeout { deadline: dur })
            }
        },
        None => flatten_panic(guarded.await),
    };

    if let Err(ref err) = res {
        bus.publish(
            Event::now(EventKind::AttemptFailed)
                .with_task(Arc::clone(label))
                .with_attempt(attempt)
                .with_error(err.as_message()),
        );
    }
    res
}

/// Publishes the terminal event and passes the outcome through.
fn finish<T>(
    res: Result<T, TaskError>,
    attempt: u32,
    label: &Arc<str>,
    bus: &Bus,
) -> Result<T, TaskError> {
    match &res {
        Ok(_) => bus.publish(
            Event::now(EventKind::TaskStopped)
                .with_task(Arc::clone(label))
                .with_attempt(attempt),
        ),
        Err(err) => bus.publish(
            Event::now(EventKind::TaskFailed)
                .with_task(Arc::clone(label))
                .with_attempt(attempt)
                .with_error(err.as_message()),
        ),
    }
    res
}

/// Maps a caught panic onto the error taxonomy.
fn flatten_panic<T>(
    settled: Result<Result<T, TaskError>, Box<dyn std::any::Any + Send>>,
) -> Result<T, TaskError> {
    match settled {
        Ok(outcome) => outcome,
        Err(panic) => {
            let info = if let Some(msg) = panic.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = panic.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(TaskError::Fail {
                error: format!("task panicked: {info}"),
            })
        }
    }
}
