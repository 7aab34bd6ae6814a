//! Subscribers: event consumers fed by the queue's fan-out.
//!
//! ## Contents
//! - [`Subscribe`] the subscriber contract
//! - [`SubscriberSet`] bounded, panic-isolated fan-out
//! - [`InFlightTracker`] tracks currently running task labels
//! - `LogWriter` stdout printer (behind the `logging` feature)

mod inflight;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use inflight::InFlightTracker;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
