//! Repository ports for jobs, tasks and staff records.
//!
//! These traits describe the persistence collaborator the workflow services
//! rely on. Implementations must guarantee at most one task per
//! `(job, sequence)` pair even under concurrent generation attempts.

use crate::workflow::domain::{
    Department, DepartmentId, Employee, EmployeeId, Job, JobId, JobNumber, Task, TaskId,
    TaskSequence,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow repository operations.
pub type WorkflowRepositoryResult<T> = Result<T, WorkflowRepositoryError>;

/// Job persistence contract.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Reserves the next display number for a new job.
    ///
    /// Numbers are strictly increasing; gaps are allowed.
    async fn next_job_number(&self) -> WorkflowRepositoryResult<JobNumber>;

    /// Stores a new job.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateJob`] when the job ID
    /// already exists.
    async fn store_job(&self, job: &Job) -> WorkflowRepositoryResult<()>;

    /// Persists changes to an existing job.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::JobNotFound`] when the job does not
    /// exist.
    async fn update_job(&self, job: &Job) -> WorkflowRepositoryResult<()>;

    /// Finds a job by identifier.
    async fn find_job(&self, id: JobId) -> WorkflowRepositoryResult<Option<Job>>;

    /// Returns every job ordered by job number.
    async fn list_jobs(&self) -> WorkflowRepositoryResult<Vec<Job>>;

    /// Deletes a job together with all of its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::JobNotFound`] when the job does not
    /// exist.
    async fn delete_job(&self, id: JobId) -> WorkflowRepositoryResult<()>;
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a batch of new tasks atomically.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateTaskSequence`] when any
    /// `(job, sequence)` pair already exists, and
    /// [`WorkflowRepositoryError::JobNotFound`] when a task references an
    /// unknown job. No task is stored on error.
    async fn store_tasks(&self, tasks: &[Task]) -> WorkflowRepositoryResult<()>;

    /// Persists changes to an existing task (status, assignment, remarks).
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::TaskNotFound`] when the task does
    /// not exist.
    async fn update_task(&self, task: &Task) -> WorkflowRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>>;

    /// Returns the tasks of one job ordered by sequence number.
    async fn tasks_for_job(&self, job_id: JobId) -> WorkflowRepositoryResult<Vec<Task>>;

    /// Returns every task ordered by job and sequence number.
    async fn list_tasks(&self) -> WorkflowRepositoryResult<Vec<Task>>;
}

/// Employee and department persistence contract.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Stores a new department.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateDepartment`] when the ID
    /// or name is already taken.
    async fn store_department(&self, department: &Department) -> WorkflowRepositoryResult<()>;

    /// Returns every department ordered by name.
    async fn list_departments(&self) -> WorkflowRepositoryResult<Vec<Department>>;

    /// Stores a new employee.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateEmployee`] when the ID
    /// already exists.
    async fn store_employee(&self, employee: &Employee) -> WorkflowRepositoryResult<()>;

    /// Finds an employee by identifier.
    async fn find_employee(&self, id: EmployeeId) -> WorkflowRepositoryResult<Option<Employee>>;

    /// Returns every employee ordered by name.
    async fn list_employees(&self) -> WorkflowRepositoryResult<Vec<Employee>>;

    /// Deletes an employee and clears every task assignment referencing them.
    ///
    /// Tasks are kept.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::EmployeeNotFound`] when the
    /// employee does not exist.
    async fn delete_employee(&self, id: EmployeeId) -> WorkflowRepositoryResult<()>;
}

/// Errors returned by workflow repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowRepositoryError {
    /// A job with the same identifier already exists.
    #[error("duplicate job identifier: {0}")]
    DuplicateJob(JobId),

    /// A task already occupies the sequence slot within the job.
    #[error("duplicate task sequence {sequence} for job {job_id}")]
    DuplicateTaskSequence {
        /// Owning job.
        job_id: JobId,
        /// Occupied sequence number.
        sequence: TaskSequence,
    },

    /// A department with the same identifier or name already exists.
    #[error("duplicate department: {0}")]
    DuplicateDepartment(DepartmentId),

    /// An employee with the same identifier already exists.
    #[error("duplicate employee identifier: {0}")]
    DuplicateEmployee(EmployeeId),

    /// The job was not found.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The employee was not found.
    #[error("employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// An update tried to move a task to another job or sequence slot.
    #[error("task {0} cannot change its job or sequence")]
    TaskSlotChanged(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowRepositoryError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
