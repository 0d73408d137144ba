//! Production task: the per-stage unit of work for one job.

use super::{DepartmentId, EmployeeId, JobId, ParseTaskStatusError, Stage, TaskId, TaskSequence};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Generated but not yet scheduled on the floor.
    Pending,
    /// Waiting for a machine or operator.
    InQueue,
    /// Being worked on.
    InProgress,
    /// Finished.
    Completed,
    /// Held up; usually accompanied by a delay comment.
    Delayed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InQueue => "in_queue",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
        }
    }

    /// Returns `true` when no further work is expected.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_queue" => Ok(Self::InQueue),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "delayed" => Ok(Self::Delayed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values needed to materialise a freshly generated task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBlueprint {
    /// Owning job.
    pub job_id: JobId,
    /// One-based position in the job's stage sequence.
    pub sequence: TaskSequence,
    /// Stage performed by the task.
    pub stage: Stage,
    /// Department performing the stage, when it could be resolved.
    pub department: Option<DepartmentId>,
    /// Target completion time.
    pub deadline: DateTime<Utc>,
}

/// Production task entity. Owned by exactly one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    job_id: JobId,
    sequence: TaskSequence,
    stage: Stage,
    department: Option<DepartmentId>,
    assignee: Option<EmployeeId>,
    deadline: DateTime<Utc>,
    status: TaskStatus,
    remarks: Option<String>,
    delay_comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning job.
    pub job_id: JobId,
    /// Persisted sequence number.
    pub sequence: TaskSequence,
    /// Persisted stage.
    pub stage: Stage,
    /// Persisted department reference.
    pub department: Option<DepartmentId>,
    /// Persisted assignee reference.
    pub assignee: Option<EmployeeId>,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted free-form remarks.
    pub remarks: Option<String>,
    /// Persisted delay explanation.
    pub delay_comment: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending, unassigned task from a blueprint.
    #[must_use]
    pub fn from_blueprint(blueprint: TaskBlueprint, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            job_id: blueprint.job_id,
            sequence: blueprint.sequence,
            stage: blueprint.stage,
            department: blueprint.department,
            assignee: None,
            deadline: blueprint.deadline,
            status: TaskStatus::Pending,
            remarks: None,
            delay_comment: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            job_id: data.job_id,
            sequence: data.sequence,
            stage: data.stage,
            department: data.department,
            assignee: data.assignee,
            deadline: data.deadline,
            status: data.status,
            remarks: data.remarks,
            delay_comment: data.delay_comment,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning job identifier.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the sequence number within the job.
    #[must_use]
    pub const fn sequence(&self) -> TaskSequence {
        self.sequence
    }

    /// Returns the stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the department reference, if resolved.
    #[must_use]
    pub const fn department(&self) -> Option<DepartmentId> {
        self.department
    }

    /// Returns the assigned employee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<EmployeeId> {
        self.assignee
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the remarks, if any.
    #[must_use]
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    /// Returns the delay comment, if any.
    #[must_use]
    pub fn delay_comment(&self) -> Option<&str> {
        self.delay_comment.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sets the status. Any status may follow any other.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Replaces the remarks.
    pub fn set_remarks(&mut self, remarks: Option<String>, clock: &impl Clock) {
        self.remarks = remarks;
        self.touch(clock);
    }

    /// Records why the task is held up.
    pub fn set_delay_comment(&mut self, comment: Option<String>, clock: &impl Clock) {
        self.delay_comment = comment;
        self.touch(clock);
    }

    /// Assigns the task to an employee, or clears the assignment.
    pub fn assign(&mut self, employee: Option<EmployeeId>, clock: &impl Clock) {
        self.assignee = employee;
        self.touch(clock);
    }

    /// Clears the assignment without touching the update timestamp.
    ///
    /// Used by stores when the referenced employee is removed.
    pub(crate) const fn clear_assignee(&mut self) {
        self.assignee = None;
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
