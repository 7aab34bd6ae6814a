//! # taskgate
//!
//! **Taskgate** is a bounded-concurrency asynchronous task queue for
//! Rust, with retry and deadline policies.
//!
//! It admits at most `capacity` tasks at a time, dispatches pending work
//! in strict submission order, and settles every caller's handle
//! independently. The crate is designed as a building block: no process
//! lifecycle, no persistence, no cancellation surface — just admission
//! control, ordering, and failure recovery.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  submit() / submit_spec()            TaskHandle (per submission)
//!        │                                   ▲
//!        ▼                                   │ success / TaskError
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskQueue                                                        │
//! │  - pending: FIFO deque of entries (job + reply slot)              │
//! │  - in_flight: 0 ..= capacity                                      │
//! │  - drain(): dispatches while a slot is free                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐
//!   │  runner  │       │  runner  │       │  runner  │   (≤ capacity)
//!   │ (attempt │       │ (attempt │       │ (attempt │
//!   │   loop)  │       │   loop)  │       │   loop)  │
//!   └────┬─────┘       └────┬─────┘       └────┬─────┘
//!        │ Publishes        │ Publishes        │ Publishes
//!        │ - TaskStarting   │ - AttemptFailed  │ - TimeoutHit
//!        │ - TaskStopped    │ - RetryScheduled │ - TaskFailed
//!        ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                     Bus (broadcast channel)                       │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                          fan-out listener ──► SubscriberSet
//!                                               ┌────────┼────────┐
//!                                               ▼        ▼        ▼
//!                                            worker1  worker2  workerN
//!                                               ▼        ▼        ▼
//!                                            sub1.on  sub2.on  subN.on
//!                                            _event() _event() _event()
//! ```
//!
//! ### Lifecycle of one submission
//! ```text
//! submit ──► pending (FIFO) ──► drain() when a slot frees
//!
//! runner loop {
//!   ├─► attempt += 1
//!   ├─► publish TaskStarting{ task, attempt }
//!   ├─► run attempt (optional per-attempt deadline)
//!   │       ├─ Ok(v)           ─► publish TaskStopped ─► handle ← Ok(v)
//!   │       ├─ deadline hit    ─► publish TimeoutHit + AttemptFailed
//!   │       └─ Err(e)          ─► publish AttemptFailed
//!   ├─► no retry budget left?  ─► publish TaskFailed ─► handle ← Err
//!   └─► else: publish RetryScheduled{ delay } ─► sleep(delay) ─► continue
//! }
//!
//! completion: in_flight -= 1 ─► drain() ─► next FIFO entry
//!             (queue empty? ─► publish QueueDrained)
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types / functions                    |
//! |----------------|----------------------------------------------------------|------------------------------------------|
//! | **Queue**      | Bounded admission, FIFO dispatch, per-task handles.      | [`TaskQueue`], [`TaskHandle`]            |
//! | **Policies**   | Attempt budgets and delay schedules.                     | [`RetryPolicy`], [`BackoffPolicy`]       |
//! | **Wrappers**   | Standalone retry / deadline composition.                 | [`retry_with`], [`abandon_after`]        |
//! | **Errors**     | One taxonomy for queue, retry, and deadline failures.    | [`TaskError`]                            |
//! | **Events**     | Lifecycle observability over a broadcast bus.            | [`Event`], [`EventKind`], [`Bus`]        |
//! | **Subscribers**| Bounded, panic-isolated fan-out.                         | [`Subscribe`], [`SubscriberSet`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference
//!   only)_.
//!
//! ## What this crate does *not* do
//! Deadlines **abandon** work, they do not cancel it: [`abandon_after`]
//! stops waiting while the spawned task runs on. There is no preemption
//! primitive and the API does not pretend otherwise.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskgate::{RetryPolicy, TaskError, TaskQueue, TaskSpec};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // At most two tasks run at once; the rest wait in FIFO order.
//!     let queue = TaskQueue::new(2);
//!
//!     let fetch = queue.submit_named("fetch", || async {
//!         Ok::<_, TaskError>("payload")
//!     });
//!
//!     // A flaky task: three attempts, 50ms pause between them.
//!     let spec = TaskSpec::named("flaky")
//!         .with_retry(RetryPolicy::fixed(3, Duration::from_millis(50)))
//!         .with_deadline(Duration::from_secs(1));
//!     let flaky = queue.submit_spec(spec, || async {
//!         Ok::<_, TaskError>("eventually")
//!     });
//!
//!     assert_eq!(fetch.await.unwrap(), "payload");
//!     assert_eq!(flaky.await.unwrap(), "eventually");
//!
//!     // Drain completeness: nothing left behind.
//!     queue.join().await;
//!     assert_eq!(queue.in_flight(), 0);
//!     assert_eq!(queue.pending_len(), 0);
//! }
//! ```

mod error;
mod events;
mod exec;
mod policies;
mod queue;
mod subscribers;

// ---- Public re-exports ----

pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use exec::{abandon_after, retry_with};
pub use policies::{BackoffPolicy, JitterPolicy, RetryPolicy};
pub use queue::{QueueConfig, TaskHandle, TaskQueue, TaskSpec};
pub use subscribers::{InFlightTracker, Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
