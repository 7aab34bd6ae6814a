//! # TaskQueue: bounded-concurrency FIFO dispatch.
//!
//! [`TaskQueue`] admits at most `capacity` tasks concurrently, dispatches
//! pending tasks in strict submission order as capacity frees up, and
//! settles each caller's [`TaskHandle`] independently of the others.
//!
//! ## Architecture
//! ```text
//! submit() ──► pending (FIFO) ──► drain() ──► tokio::spawn(run_entry)
//!                 ▲                  │               │
//!                 │                  │               ├─► events ──► Bus
//!                 │    in_flight < capacity?         │
//!                 │                  ▲               └─► reply ──► TaskHandle
//!                 │                  │
//!                 └──────── completion: in_flight -= 1, drain() again
//! ```
//!
//! ## Rules
//! - `in_flight` and `pending` are mutated **only** under the queue's own
//!   mutex, and only by the submit/drain/completion paths.
//! - `drain()` dispatches while `in_flight < capacity` and pending is
//!   non-empty; a completion frees capacity for the next FIFO entry
//!   before any later submission is considered.
//! - A failing (or panicking) task settles only its own handle and
//!   releases its slot; the queue itself has no fatal failure state.
//! - Completion order is **not** guaranteed for `capacity > 1`; dispatch
//!   order is.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;

use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::queue::config::QueueConfig;
use crate::queue::entry::{Job, QueueEntry, TaskFuture};
use crate::queue::handle::TaskHandle;
use crate::queue::runner;
use crate::queue::spec::TaskSpec;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Bounded-concurrency task queue with FIFO dispatch.
///
/// Cheap to clone; clones share the same queue. Submissions dispatch onto
/// the ambient tokio runtime, so the queue must be used from within one.
///
/// # Example
/// ```
/// use taskgate::{TaskError, TaskQueue};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let queue = TaskQueue::new(2);
///
///     let handles: Vec<_> = (1..=5)
///         .map(|i| queue.submit(move || async move { Ok::<_, TaskError>(i * 10) }))
///         .collect();
///
///     for (i, handle) in handles.into_iter().enumerate() {
///         assert_eq!(handle.await.unwrap(), (i as i32 + 1) * 10);
///     }
///     queue.join().await;
///     assert_eq!(queue.in_flight(), 0);
/// }
/// ```
pub struct TaskQueue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T> {
    capacity: usize,
    bus: Bus,
    state: Mutex<QueueState<T>>,
    idle: Notify,
    next_id: AtomicU64,
}

struct QueueState<T> {
    in_flight: usize,
    pending: VecDeque<QueueEntry<T>>,
}

impl<T: Send + 'static> TaskQueue<T> {
    /// Creates a queue with the given concurrency capacity.
    ///
    /// `capacity` is clamped to a minimum of 1. No subscribers are
    /// attached; use [`TaskQueue::with_config`] for full wiring.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(
            QueueConfig {
                capacity,
                ..QueueConfig::default()
            },
            Vec::new(),
        )
    }

    /// Creates a queue from config, attaching the given subscribers.
    ///
    /// When `subscribers` is non-empty a fan-out listener is spawned, so
    /// this form must be called from within a tokio runtime.
    pub fn with_config(cfg: QueueConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());

        if !subscribers.is_empty() {
            let set = SubscriberSet::new(subscribers, bus.clone());
            let mut rx = bus.subscribe();
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    }
                }
                set.shutdown().await;
            });
        }

        Self {
            inner: Arc::new(Inner {
                capacity: cfg.capacity_clamped(),
                bus,
                state: Mutex::new(QueueState {
                    in_flight: 0,
                    pending: VecDeque::new(),
                }),
                idle: Notify::new(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Submits a task for execution; never blocks, never fails.
    ///
    /// If spare capacity exists the task is dispatched immediately;
    /// otherwise it waits in FIFO order. The returned handle settles with
    /// this task's outcome regardless of what other tasks do.
    pub fn submit<F, Fut>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.enqueue(
            TaskSpec::new(),
            Job::Once(Box::new(move || Box::pin(task()) as TaskFuture<T>)),
        )
    }

    /// Like [`TaskQueue::submit`], with a label used in lifecycle events.
    pub fn submit_named<F, Fut>(&self, name: impl Into<Arc<str>>, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.enqueue(
            TaskSpec::named(name),
            Job::Once(Box::new(move || Box::pin(task()) as TaskFuture<T>)),
        )
    }

    /// Submits a task factory governed by a [`TaskSpec`].
    ///
    /// The factory is invoked fresh per attempt. Retry and per-attempt
    /// deadline come from the spec; lifecycle events (`RetryScheduled`,
    /// `TimeoutHit`, ...) are published on the queue's bus.
    pub fn submit_spec<F, Fut>(&self, spec: TaskSpec, mut factory: F) -> TaskHandle<T>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        self.enqueue(
            spec,
            Job::Factory(Box::new(move || Box::pin(factory()) as TaskFuture<T>)),
        )
    }

    /// Submits a burst of tasks, returning their handles in order.
    pub fn submit_all<I, F, Fut>(&self, tasks: I) -> Vec<TaskHandle<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    {
        tasks.into_iter().map(|task| self.submit(task)).collect()
    }

    /// Resolves once no tasks are in flight and none are pending.
    ///
    /// Returns immediately if the queue is already idle. New submissions
    /// after this resolves start a new busy period.
    pub async fn join(&self) {
        loop {
            let mut notified = std::pin::pin!(self.inner.idle.notified());
            notified.as_mut().enable();
            if self.is_idle() {
                return;
            }
            notified.as_mut().await;
        }
    }

    fn enqueue(&self, spec: TaskSpec, job: Job<T>) -> TaskHandle<T> {
        let (reply, rx) = oneshot::channel();
        let label = spec.name_arc().unwrap_or_else(|| {
            let id = self.inner.next_id.fetch_add(1, AtomicOrdering::Relaxed);
            Arc::from(format!("task-{id}"))
        });

        self.inner
            .bus
            .publish(Event::now(EventKind::TaskSubmitted).with_task(Arc::clone(&label)));

        {
            let mut state = self.inner.state.lock().unwrap();
            state.pending.push_back(QueueEntry {
                label,
                spec,
                job,
                reply,
            });
        }
        Inner::drain(&self.inner);

        TaskHandle::new(rx)
    }

    fn is_idle(&self) -> bool {
        let state = self.inner.state.lock().unwrap();
        state.in_flight == 0 && state.pending.is_empty()
    }

    /// The concurrency capacity this queue was built with.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of currently running tasks (`0 ..= capacity`).
    pub fn in_flight(&self) -> usize {
        self.inner.state.lock().unwrap().in_flight
    }

    /// Number of submissions waiting for a free slot.
    pub fn pending_len(&self) -> usize {
        self.inner.state.lock().unwrap().pending.len()
    }

    /// The queue's event bus; subscribe for lifecycle events.
    pub fn bus(&self) -> &Bus {
        &self.inner.bus
    }
}

impl<T: Send + 'static> Inner<T> {
    /// Dispatches pending entries while capacity allows.
    ///
    /// The single mutation point for `in_flight`/`pending`: called on
    /// submit and on each completion, never re-entrantly (each spawned
    /// completion invokes it afresh).
    fn drain(self: &Arc<Self>) {
        loop {
            let entry = {
                let mut state = self.state.lock().unwrap();
                if state.in_flight >= self.capacity {
                    return;
                }
                match state.pending.pop_front() {
                    Some(entry) => {
                        state.in_flight += 1;
                        entry
                    }
                    None => return,
                }
            };

            let inner = Arc::clone(self);
            tokio::spawn(async move {
                let QueueEntry {
                    label,
                    spec,
                    job,
                    reply,
                } = entry;

                let outcome = runner::run_entry(label, spec, job, &inner.bus).await;
                // Handle may already be dropped; the outcome is discarded.
                let _ = reply.send(outcome);

                let became_idle = {
                    let mut state = inner.state.lock().unwrap();
                    state.in_flight -= 1;
                    state.in_flight == 0 && state.pending.is_empty()
                };

                if became_idle {
                    inner.bus.publish(Event::now(EventKind::QueueDrained));
                    inner.idle.notify_waiters();
                } else {
                    inner.drain();
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::RetryPolicy;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::{self, Instant};

    /// Tracks the running-task high-water mark.
    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Gauge {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }
        fn exit(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_never_exceeds_capacity() {
        let queue = TaskQueue::new(3);
        let gauge = Arc::new(Gauge::default());

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let gauge = Arc::clone(&gauge);
                queue.submit(move || async move {
                    gauge.enter();
                    time::sleep(Duration::from_millis(10)).await;
                    gauge.exit();
                    Ok::<_, TaskError>(())
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
        assert!(gauge.peak() <= 3, "peak concurrency {} > 3", gauge.peak());
        assert_eq!(gauge.peak(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_one_dispatches_in_submission_order() {
        let queue = TaskQueue::new(1);
        let order = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (1..=6)
            .map(|i| {
                let order = Arc::clone(&order);
                queue.submit(move || async move {
                    order.lock().unwrap().push(i);
                    time::sleep(Duration::from_millis(5)).await;
                    Ok::<_, TaskError>(i)
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn failures_do_not_disturb_other_tasks() {
        let queue = TaskQueue::new(2);

        let ok1 = queue.submit(|| async { Ok::<_, TaskError>("a") });
        let bad = queue.submit(|| async { Err::<&str, _>(TaskError::fail("broken")) });
        let ok2 = queue.submit(|| async { Ok::<_, TaskError>("b") });

        assert_eq!(ok1.await.unwrap(), "a");
        assert!(matches!(bad.await, Err(TaskError::Fail { .. })));
        assert_eq!(ok2.await.unwrap(), "b");
    }

    #[tokio::test]
    async fn panicking_task_settles_only_its_own_handle() {
        let queue = TaskQueue::new(1);

        let bad = queue.submit(|| async { panic!("boom") });
        let good = queue.submit(|| async { Ok::<_, TaskError>(7) });

        assert!(matches!(bad.await, Err(TaskError::Fail { error }) if error.contains("boom")));
        assert_eq!(good.await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn join_waits_for_drain_completeness() {
        let queue = TaskQueue::new(2);

        let _handles = queue.submit_all((0..5).map(|i| {
            move || async move {
                time::sleep(Duration::from_millis(20)).await;
                Ok::<_, TaskError>(i)
            }
        }));

        assert!(queue.pending_len() > 0 || queue.in_flight() > 0);
        queue.join().await;
        assert_eq!(queue.in_flight(), 0);
        assert_eq!(queue.pending_len(), 0);
    }

    #[tokio::test]
    async fn join_on_idle_queue_returns_immediately() {
        let queue = TaskQueue::<()>::new(4);
        queue.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn five_tasks_on_capacity_two_complete_in_waves() {
        let queue = TaskQueue::new(2);
        let start = Instant::now();

        let handles = queue.submit_all((0..5).map(|i| {
            move || async move {
                time::sleep(Duration::from_millis(100)).await;
                Ok::<_, TaskError>(i)
            }
        }));

        let mut finished_at = Vec::new();
        for handle in handles {
            handle.await.unwrap();
            finished_at.push(start.elapsed());
        }

        // Waves: tasks 1-2 at ~100ms, 3-4 at ~200ms, 5 at ~300ms.
        assert!(finished_at[0] >= Duration::from_millis(100));
        assert!(finished_at[1] < Duration::from_millis(200));
        assert!(finished_at[2] >= Duration::from_millis(200));
        assert!(finished_at[3] < Duration::from_millis(300));
        assert!(finished_at[4] >= Duration::from_millis(300));
        assert!(finished_at[4] < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn spec_submission_retries_and_succeeds() {
        let queue = TaskQueue::new(1);
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let handle = queue.submit_spec(
            TaskSpec::named("flaky").with_retry(RetryPolicy::fixed(3, Duration::from_millis(10))),
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(TaskError::fail("not yet"))
                    } else {
                        Ok(n)
                    }
                }
            },
        );

        assert_eq!(handle.await.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn queue_publishes_submitted_and_drained_events() {
        let queue = TaskQueue::new(1);
        let mut rx = queue.bus().subscribe();

        queue
            .submit_named("only", || async { Ok::<_, TaskError>(()) })
            .await
            .unwrap();
        queue.join().await;

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(kinds.first(), Some(&EventKind::TaskSubmitted));
        assert!(kinds.contains(&EventKind::TaskStopped));
        assert_eq!(kinds.last(), Some(&EventKind::QueueDrained));
    }

    #[tokio::test]
    async fn capacity_is_clamped_to_one() {
        let queue = TaskQueue::new(0);
        assert_eq!(queue.capacity(), 1);
        let handle = queue.submit(|| async { Ok::<_, TaskError>(9) });
        assert_eq!(handle.await.unwrap(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_frees_a_slot_for_the_next_pending_entry() {
        let queue = TaskQueue::new(1);

        let slow = queue.submit(|| async {
            time::sleep(Duration::from_millis(50)).await;
            Ok::<_, TaskError>("slow")
        });
        let queued = queue.submit(|| async { Ok::<_, TaskError>("queued") });

        // Second task must wait for the first slot to free.
        assert_eq!(queue.pending_len(), 1);
        assert_eq!(slow.await.unwrap(), "slow");
        assert_eq!(queued.await.unwrap(), "queued");
        queue.join().await;
    }
}
