//! Standalone execution wrappers.
//!
//! These free functions apply one policy to one task, outside any queue:
//! - [`retry_with`] bounded re-attempts over a task factory
//! - [`abandon_after`] deadline on the *wait*, abandonment of the work
//!
//! They compose in either order; see [`abandon_after`] for the trade-off.
//! Inside a [`TaskQueue`](crate::TaskQueue), the same policies are applied
//! by the queue's runner instead, which additionally publishes lifecycle
//! events.

mod deadline;
mod retry;

pub use deadline::abandon_after;
pub use retry::retry_with;
