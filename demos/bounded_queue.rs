//! # Example: bounded_queue
//!
//! Five tasks, each sleeping 100ms, pushed through a queue with
//! capacity 2. Completions arrive in waves: tasks 1–2 at ~100ms,
//! tasks 3–4 at ~200ms, task 5 at ~300ms.
//!
//! ## Flow
//! ```text
//! submit ×5 ──► pending FIFO
//!   ├─► slots 1-2 dispatch immediately
//!   ├─► completion frees a slot ─► next FIFO entry dispatches
//!   └─► all settled ─► QueueDrained
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example bounded_queue --features logging
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use taskgate::{LogWriter, QueueConfig, Subscribe, TaskError, TaskQueue};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Queue with two slots, LogWriter printing lifecycle events
    let cfg = QueueConfig {
        capacity: 2,
        ..QueueConfig::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let queue = TaskQueue::with_config(cfg, subs);

    // 2. Submit a burst of five 100ms tasks
    let start = Instant::now();
    let handles = queue.submit_all((1..=5).map(|i| {
        move || async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, TaskError>(i)
        }
    }));

    // 3. Await each handle; completions cluster in waves of two
    for handle in handles {
        let i = handle.await.expect("task settled successfully");
        println!("[main] task {i} done at {:?}", start.elapsed());
    }

    // 4. Drain completeness
    queue.join().await;
    println!(
        "[main] drained: in_flight={} pending={}",
        queue.in_flight(),
        queue.pending_len()
    );
}
