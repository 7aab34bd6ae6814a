//! Bounded-concurrency task queue.
//!
//! This module contains the queue itself and its supporting types:
//! - [`TaskQueue`] admission control + FIFO dispatch
//! - [`TaskHandle`] the caller's view of one outcome
//! - [`TaskSpec`] per-submission retry/deadline bundle
//! - [`QueueConfig`] construction-time settings
//!
//! Internal modules:
//! - `entry`: the pending-queue record (job + reply slot);
//! - `runner`: executes one submission to settlement, attempt by attempt,
//!   publishing lifecycle events.

mod config;
mod core;
mod entry;
mod handle;
mod runner;
mod spec;

pub use config::QueueConfig;
pub use core::TaskQueue;
pub use handle::TaskHandle;
pub use spec::TaskSpec;
