//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the queue's submit
//! path, the per-submission runner, and the subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TaskQueue` (submitted/drained), the per-submission
//!   runner (starting/failed/timeout/retry/terminal), `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumers**: the queue's fan-out listener (forwards to
//!   `SubscriberSet`) and any receiver obtained via `Bus::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
