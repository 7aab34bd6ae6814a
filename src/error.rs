//! Error types produced by queued and wrapped task executions.
//!
//! The crate has a single error enum, [`TaskError`], shared by the queue,
//! the retry wrapper, and the deadline wrapper. Callers can branch on the
//! variant to apply differentiated handling (retry upstream, alerting,
//! and so on), and helper methods (`as_label`, `as_message`) provide
//! stable strings for logs and metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by task execution.
///
/// Every task, whether submitted to a [`TaskQueue`](crate::TaskQueue) or
/// run through [`retry_with`](crate::retry_with) /
/// [`abandon_after`](crate::abandon_after), settles with either its value
/// or one of these variants. Some errors are retryable (`Fail`,
/// `Timeout`), others stop a retry loop immediately.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed but may succeed if retried.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Non-recoverable failure; retry loops stop immediately.
    #[error("fatal error (no retry): {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },

    /// The deadline elapsed before the task settled.
    ///
    /// The task itself was not necessarily stopped — see
    /// [`abandon_after`](crate::abandon_after) for the abandonment
    /// semantics.
    #[error("deadline of {deadline:?} elapsed")]
    Timeout {
        /// The deadline that was exceeded.
        deadline: Duration,
    },

    /// All retry attempts were spent; wraps the final attempt's error.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// Total attempts made (equals the policy's `max_attempts`).
        attempts: u32,
        /// The error produced by the last attempt.
        last: Box<TaskError>,
    },

    /// The reply slot was dropped before the task settled.
    ///
    /// Observed when the owning queue is dropped while the task is still
    /// pending or in flight. Nothing waits on the outcome anymore.
    #[error("task abandoned: outcome will never be delivered")]
    Abandoned,
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Shorthand for [`TaskError::Fatal`].
    pub fn fatal(error: impl Into<String>) -> Self {
        TaskError::Fatal {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use taskgate::TaskError;
    ///
    /// let err = TaskError::Timeout { deadline: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "task_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Fatal { .. } => "task_fatal",
            TaskError::Timeout { .. } => "task_timeout",
            TaskError::Exhausted { .. } => "retry_exhausted",
            TaskError::Abandoned => "task_abandoned",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Fatal { error } => format!("fatal: {error}"),
            TaskError::Timeout { deadline } => format!("timeout: {deadline:?}"),
            TaskError::Exhausted { attempts, last } => {
                format!(
                    "exhausted after {attempts} attempts; last: {}",
                    last.as_message()
                )
            }
            TaskError::Abandoned => "abandoned".to_string(),
        }
    }

    /// Indicates whether the error type is safe to retry.
    ///
    /// Returns `true` for [`TaskError::Fail`] and [`TaskError::Timeout`],
    /// `false` otherwise.
    ///
    /// # Example
    /// ```
    /// use taskgate::TaskError;
    ///
    /// assert!(TaskError::fail("boom").is_retryable());
    /// assert!(!TaskError::fatal("nope").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, TaskError::Fail { .. } | TaskError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let cases = [
            (TaskError::fail("x"), "task_failed"),
            (TaskError::fatal("x"), "task_fatal"),
            (
                TaskError::Timeout {
                    deadline: Duration::from_millis(5),
                },
                "task_timeout",
            ),
            (
                TaskError::Exhausted {
                    attempts: 3,
                    last: Box::new(TaskError::fail("x")),
                },
                "retry_exhausted",
            ),
            (TaskError::Abandoned, "task_abandoned"),
        ];
        for (err, label) in cases {
            assert_eq!(err.as_label(), label);
        }
    }

    #[test]
    fn exhausted_message_includes_last_error() {
        let err = TaskError::Exhausted {
            attempts: 3,
            last: Box::new(TaskError::fail("boom")),
        };
        assert!(err.as_message().contains("3 attempts"));
        assert!(err.as_message().contains("boom"));
    }

    #[test]
    fn retryable_matrix() {
        assert!(TaskError::fail("x").is_retryable());
        assert!(TaskError::Timeout {
            deadline: Duration::from_secs(1)
        }
        .is_retryable());
        assert!(!TaskError::fatal("x").is_retryable());
        assert!(!TaskError::Abandoned.is_retryable());
        assert!(!TaskError::Exhausted {
            attempts: 1,
            last: Box::new(TaskError::fail("x")),
        }
        .is_retryable());
    }
}
