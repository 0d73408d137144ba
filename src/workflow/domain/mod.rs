//! Domain model for print jobs and their production tasks.
//!
//! Covers the stage catalog, deadline allocation and task generation. All
//! persistence concerns stay outside the domain boundary.

mod employee;
mod error;
mod generation;
mod ids;
mod job;
mod schedule;
mod stage;
mod task;

pub use employee::{Department, Employee, EmployeeRole};
pub use error::{
    ParseEmployeeRoleError, ParseJobStatusError, ParseStageError, ParseTaskStatusError,
    WorkflowDomainError,
};
pub use generation::{DepartmentDirectory, generate_tasks, plan_stage_schedule};
pub use ids::{DepartmentId, EmployeeId, JobId, JobNumber, TaskId, TaskSequence};
pub use job::{Job, JobSpecification, JobStatus, JobType, PersistedJobData};
pub use schedule::{ScheduleIssue, StageDeadline, StageSchedule, allocate_stage_deadlines};
pub use stage::{Stage, StagePolicy};
pub use task::{PersistedTaskData, Task, TaskBlueprint, TaskStatus};
