//! Identifier and validated scalar types for the workflow domain.

use super::WorkflowDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a print job.
    JobId
);

uuid_identifier!(
    /// Unique identifier for a production task.
    TaskId
);

uuid_identifier!(
    /// Unique identifier for an employee.
    EmployeeId
);

uuid_identifier!(
    /// Unique identifier for a department.
    DepartmentId
);

/// Monotonically increasing display number assigned to a job at creation.
///
/// Rendered as `JOB-0042` in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobNumber(u64);

impl JobNumber {
    /// Largest job number representable in the current `PostgreSQL` schema.
    const MAX_PERSISTED_VALUE: u64 = i64::MAX as u64;

    /// Creates a validated job number.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidJobNumber`] when the value is zero
    /// or exceeds the schema-backed maximum (`i64::MAX`).
    pub const fn new(value: u64) -> Result<Self, WorkflowDomainError> {
        if value == 0 || value > Self::MAX_PERSISTED_VALUE {
            return Err(WorkflowDomainError::InvalidJobNumber(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the number following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for JobNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JOB-{:04}", self.0)
    }
}

/// One-based position of a task within its job's stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskSequence(u32);

impl TaskSequence {
    /// Creates a validated sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidTaskSequence`] when the value is
    /// zero.
    pub const fn new(value: u32) -> Result<Self, WorkflowDomainError> {
        if value == 0 {
            return Err(WorkflowDomainError::InvalidTaskSequence);
        }
        Ok(Self(value))
    }

    /// Returns the sequence number for a zero-based stage position.
    #[must_use]
    pub fn from_position(index: usize) -> Self {
        let one_based = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        Self(one_based)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaskSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
