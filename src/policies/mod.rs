//! Retry and backoff policies.
//!
//! This module groups the knobs that control **how many** attempts a task
//! gets and **how long** to wait between them.
//!
//! ## Contents
//! - [`RetryPolicy`] attempt budget + delay schedule
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max)
//! - [`JitterPolicy`]  randomization strategy to avoid thundering herd
//!
//! ## Defaults
//! - `RetryPolicy::default()` → 3 attempts, fixed 100ms delay.
//! - `BackoffPolicy::default()` → first=100ms, factor=1.0 (constant),
//!   max=30s, jitter=None. Exponential growth is opt-in.

mod backoff;
mod jitter;
mod retry;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use retry::RetryPolicy;
