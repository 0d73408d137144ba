//! Error types for workflow domain validation and parsing.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The job type label is blank.
    #[error("job type must not be empty")]
    EmptyJobType,

    /// The ordered quantity is zero.
    #[error("job quantity must be a positive integer")]
    ZeroQuantity,

    /// The delivery deadline is not strictly after the creation time.
    #[error("delivery deadline {deadline} must be after {now}")]
    DeliveryDeadlineNotInFuture {
        /// Requested delivery deadline.
        deadline: DateTime<Utc>,
        /// Creation instant the deadline was checked against.
        now: DateTime<Utc>,
    },

    /// The job number is invalid.
    #[error("invalid job number {0}, expected a positive integer")]
    InvalidJobNumber(u64),

    /// The task sequence number is zero.
    #[error("task sequence numbers start at 1")]
    InvalidTaskSequence,

    /// An employee or department name is blank.
    #[error("name must not be empty")]
    EmptyName,
}

/// Error returned while parsing stages from persistence or user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown production stage: {0}")]
pub struct ParseStageError(pub String);

/// Error returned while parsing job statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing employee roles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown employee role: {0}")]
pub struct ParseEmployeeRoleError(pub String);
