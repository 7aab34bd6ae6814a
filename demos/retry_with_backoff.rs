//! # Example: retry_with_backoff
//!
//! A flaky task fails twice before succeeding on the third attempt. The
//! queue applies the spec's retry policy and publishes the backoff
//! schedule between attempts.
//!
//! ## Flow
//! ```text
//! submit_spec(flaky, retry=3×)
//!   ├─► publish(TaskStarting, attempt=1)
//!   ├─► Err("boom #1") ─► publish(AttemptFailed)
//!   ├─► publish(RetryScheduled{delay=100ms}) ─► sleep
//!   ├─► attempt=2 ─► Err("boom #2") ─► publish(RetryScheduled{delay≈200ms})
//!   ├─► attempt=3 ─► Ok("recovered")
//!   └─► publish(TaskStopped)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example retry_with_backoff --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use taskgate::{
    BackoffPolicy, JitterPolicy, LogWriter, RetryPolicy, Subscribe, TaskError, TaskQueue, TaskSpec,
};

static FAIL_COUNT: AtomicU64 = AtomicU64::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Single-slot queue with a LogWriter subscriber
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let queue = TaskQueue::with_config(Default::default(), subs);

    // 2. Exponential backoff with equal jitter
    let backoff = BackoffPolicy {
        first: Duration::from_millis(100),
        max: Duration::from_secs(2),
        factor: 2.0,
        jitter: JitterPolicy::Equal,
    };
    let spec = TaskSpec::named("flaky").with_retry(RetryPolicy::new(3, backoff));

    // 3. A task that fails twice before succeeding
    let handle = queue.submit_spec(spec, || async {
        let attempt = FAIL_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[flaky] attempt {attempt}");
        if attempt <= 2 {
            Err(TaskError::fail(format!("boom #{attempt}")))
        } else {
            Ok("recovered")
        }
    });

    // 4. The handle settles with the third attempt's value
    match handle.await {
        Ok(value) => println!("[main] success: {value}"),
        Err(err) => println!("[main] gave up: {}", err.as_message()),
    }

    queue.join().await;
    println!("[main] done.");
}
