//! # Example: deadline_abandonment
//!
//! Races a slow task against a 100ms deadline. The caller gets a
//! `Timeout` error at ~100ms — and the task keeps running in the
//! background, finishing at ~500ms. Abandonment, not cancellation.
//!
//! ## Run
//! ```bash
//! cargo run --example deadline_abandonment
//! ```

use std::time::{Duration, Instant};

use taskgate::{TaskError, abandon_after};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let start = Instant::now();

    let slow = async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        println!("[slow] finished anyway at {:?}", start.elapsed());
        Ok::<_, TaskError>("late result")
    };

    match abandon_after(slow, Duration::from_millis(100)).await {
        Ok(value) => println!("[main] got {value}"),
        Err(TaskError::Timeout { deadline }) => {
            println!(
                "[main] abandoned after {deadline:?} (elapsed {:?})",
                start.elapsed()
            );
        }
        Err(err) => println!("[main] failed: {}", err.as_message()),
    }

    // Stick around long enough to watch the abandoned task complete.
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("[main] done.");
}
