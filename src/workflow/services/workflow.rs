//! Service layer for job creation, task generation and task updates.

use crate::config::SchedulingConfig;
use crate::workflow::{
    domain::{
        Department, DepartmentDirectory, DepartmentId, Employee, EmployeeId, EmployeeRole, Job,
        JobId, JobSpecification, JobStatus, JobType, ParseEmployeeRoleError, ParseJobStatusError,
        ParseTaskStatusError, ScheduleIssue, Stage, Task, TaskId, TaskStatus, WorkflowDomainError,
        generate_tasks, plan_stage_schedule,
    },
    ports::{JobRepository, StaffRepository, TaskRepository, WorkflowRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Request payload for creating a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobRequest {
    job_type: String,
    quantity: u32,
    delivery_deadline: DateTime<Utc>,
    stage_deadlines: Vec<(Stage, DateTime<Utc>)>,
}

impl CreateJobRequest {
    /// Creates a request with the required job fields.
    #[must_use]
    pub fn new(
        job_type: impl Into<String>,
        quantity: u32,
        delivery_deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            job_type: job_type.into(),
            quantity,
            delivery_deadline,
            stage_deadlines: Vec::new(),
        }
    }

    /// Sets an explicit deadline for one stage.
    #[must_use]
    pub fn with_stage_deadline(mut self, stage: Stage, deadline: DateTime<Utc>) -> Self {
        self.stage_deadlines.push((stage, deadline));
        self
    }
}

/// Request payload for a task status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: TaskId,
    status: String,
    remarks: Option<String>,
    delay_comment: Option<String>,
}

impl UpdateTaskStatusRequest {
    /// Creates a request moving `task_id` to `status`.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
            remarks: None,
            delay_comment: None,
        }
    }

    /// Replaces the task remarks.
    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Records why the task is delayed.
    #[must_use]
    pub fn with_delay_comment(mut self, comment: impl Into<String>) -> Self {
        self.delay_comment = Some(comment.into());
        self
    }
}

/// Request payload for assigning or unassigning a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignTaskRequest {
    task_id: TaskId,
    employee_id: Option<EmployeeId>,
}

impl AssignTaskRequest {
    /// Assigns `task_id` to `employee_id`.
    #[must_use]
    pub const fn assign(task_id: TaskId, employee_id: EmployeeId) -> Self {
        Self {
            task_id,
            employee_id: Some(employee_id),
        }
    }

    /// Clears the assignment of `task_id`.
    #[must_use]
    pub const fn unassign(task_id: TaskId) -> Self {
        Self {
            task_id,
            employee_id: None,
        }
    }
}

/// Request payload for registering an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEmployeeRequest {
    name: String,
    role: String,
    department: Option<DepartmentId>,
}

impl RegisterEmployeeRequest {
    /// Creates a request with the required employee fields.
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            department: None,
        }
    }

    /// Places the employee in a department.
    #[must_use]
    pub const fn with_department(mut self, department: DepartmentId) -> Self {
        self.department = Some(department);
        self
    }
}

/// A newly created job together with its generated tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedJob {
    /// The stored job.
    pub job: Job,
    /// Tasks generated for the job, in sequence order.
    pub tasks: Vec<Task>,
}

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkflowRepositoryError),
    /// The requested task status is not recognised.
    #[error(transparent)]
    InvalidTaskStatus(#[from] ParseTaskStatusError),
    /// The requested job status is not recognised.
    #[error(transparent)]
    InvalidJobStatus(#[from] ParseJobStatusError),
    /// The requested employee role is not recognised.
    #[error(transparent)]
    InvalidRole(#[from] ParseEmployeeRoleError),
    /// The job does not exist.
    #[error("job not found: {0}")]
    UnknownJob(JobId),
    /// The task does not exist.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),
    /// The employee does not exist.
    #[error("employee not found: {0}")]
    UnknownEmployee(EmployeeId),
    /// The department does not exist.
    #[error("department not found: {0}")]
    UnknownDepartment(DepartmentId),
}

/// Result type for workflow service operations.
pub type WorkflowServiceResult<T> = Result<T, WorkflowServiceError>;

/// Workflow orchestration service.
#[derive(Clone)]
pub struct WorkflowService<R, C>
where
    R: JobRepository + TaskRepository + StaffRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: SchedulingConfig,
}

impl<R, C> WorkflowService<R, C>
where
    R: JobRepository + TaskRepository + StaffRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default scheduling configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_config(repository, clock, SchedulingConfig::default())
    }

    /// Creates a service with a custom scheduling configuration.
    #[must_use]
    pub const fn with_config(repository: Arc<R>, clock: Arc<C>, config: SchedulingConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Returns the scheduling configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Creates a job and generates its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Domain`] when the job type is blank,
    /// the quantity is zero or (unless the configuration is permissive) the
    /// delivery deadline is not in the future, and
    /// [`WorkflowServiceError::Repository`] when persistence fails. When
    /// storing the job succeeds but generating its tasks fails, the job is
    /// deleted again before the error is returned.
    #[instrument(skip_all, fields(job_type = %request.job_type))]
    pub async fn create_job(&self, request: CreateJobRequest) -> WorkflowServiceResult<CreatedJob> {
        let job_type = JobType::parse(&request.job_type)?;
        let specification =
            JobSpecification::new(job_type, request.quantity, request.delivery_deadline)?
                .with_stage_deadlines(request.stage_deadlines);
        if self.config.require_future_deadline {
            specification.ensure_deadline_after(self.clock.utc())?;
        }

        let number = self.repository.next_job_number().await?;
        let job = Job::new(number, specification, &*self.clock);
        self.repository.store_job(&job).await?;
        info!(job_id = %job.id(), job_number = %job.number(), "created job");

        match self.generate_tasks_for_job(&job).await {
            Ok(tasks) => Ok(CreatedJob { job, tasks }),
            Err(err) => {
                self.discard_job(&job).await;
                Err(err)
            }
        }
    }

    /// Removes a job whose task generation failed so no job is left without
    /// its task set.
    async fn discard_job(&self, job: &Job) {
        match self.repository.delete_job(job.id()).await {
            Ok(()) => warn!(job_id = %job.id(), "task generation failed; job discarded"),
            Err(err) => warn!(
                job_id = %job.id(),
                error = %err,
                "task generation failed and the job could not be discarded"
            ),
        }
    }

    /// Generates and stores one task per stage for `job`.
    ///
    /// Idempotent: when the job already has tasks they are returned
    /// unchanged. A concurrent generation that wins the race is treated the
    /// same way.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Repository`] when persistence fails.
    #[instrument(skip_all, fields(job_id = %job.id()))]
    pub async fn generate_tasks_for_job(&self, job: &Job) -> WorkflowServiceResult<Vec<Task>> {
        let existing = self.repository.tasks_for_job(job.id()).await?;
        if !existing.is_empty() {
            debug!(count = existing.len(), "tasks already generated");
            return Ok(existing);
        }

        let schedule = plan_stage_schedule(job, self.config.stage_policy);
        for issue in schedule.quality_issues(job.delivery_deadline()) {
            log_schedule_issue(job, issue);
        }

        let departments = self.repository.list_departments().await?;
        let directory = DepartmentDirectory::from_departments(&departments);
        let tasks = generate_tasks(job, &schedule, &directory, &*self.clock);
        if tasks.is_empty() {
            info!(job_type = %job.job_type(), "job type has no stages; no tasks generated");
            return Ok(tasks);
        }

        match self.repository.store_tasks(&tasks).await {
            Ok(()) => {
                info!(count = tasks.len(), "generated tasks");
                Ok(tasks)
            }
            Err(WorkflowRepositoryError::DuplicateTaskSequence { .. }) => {
                debug!("tasks generated concurrently; returning stored tasks");
                Ok(self.repository.tasks_for_job(job.id()).await?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Updates the status, and optionally the remarks and delay comment, of a
    /// task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::InvalidTaskStatus`] for an unknown
    /// status, [`WorkflowServiceError::UnknownTask`] when the task does not
    /// exist, and [`WorkflowServiceError::Repository`] when persistence
    /// fails.
    #[instrument(skip_all, fields(task_id = %request.task_id, status = %request.status))]
    pub async fn update_task_status(
        &self,
        request: UpdateTaskStatusRequest,
    ) -> WorkflowServiceResult<Task> {
        let status = TaskStatus::try_from(request.status.as_str())?;
        let mut task = self.load_task(request.task_id).await?;

        task.set_status(status, &*self.clock);
        if request.remarks.is_some() {
            task.set_remarks(request.remarks, &*self.clock);
        }
        if request.delay_comment.is_some() {
            task.set_delay_comment(request.delay_comment, &*self.clock);
        }
        self.repository.update_task(&task).await?;
        info!(stage = %task.stage(), "task status updated");
        Ok(task)
    }

    /// Assigns a task to an employee or clears its assignment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::UnknownTask`] or
    /// [`WorkflowServiceError::UnknownEmployee`] when a referenced record
    /// does not exist, and [`WorkflowServiceError::Repository`] when
    /// persistence fails.
    #[instrument(skip_all, fields(task_id = %request.task_id))]
    pub async fn assign_task(&self, request: AssignTaskRequest) -> WorkflowServiceResult<Task> {
        if let Some(employee_id) = request.employee_id {
            if self.repository.find_employee(employee_id).await?.is_none() {
                return Err(WorkflowServiceError::UnknownEmployee(employee_id));
            }
        }

        let mut task = self.load_task(request.task_id).await?;
        task.assign(request.employee_id, &*self.clock);
        self.repository.update_task(&task).await?;
        match request.employee_id {
            Some(employee_id) => info!(%employee_id, "task assigned"),
            None => info!("task unassigned"),
        }
        Ok(task)
    }

    /// Moves a job to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::InvalidJobStatus`] for an unknown
    /// status, [`WorkflowServiceError::UnknownJob`] when the job does not
    /// exist, and [`WorkflowServiceError::Repository`] when persistence
    /// fails.
    #[instrument(skip_all, fields(job_id = %job_id))]
    pub async fn update_job_status(
        &self,
        job_id: JobId,
        status_label: &str,
    ) -> WorkflowServiceResult<Job> {
        let status = JobStatus::try_from(status_label)?;
        let mut job = self
            .repository
            .find_job(job_id)
            .await?
            .ok_or(WorkflowServiceError::UnknownJob(job_id))?;
        job.set_status(status, &*self.clock);
        self.repository.update_job(&job).await?;
        info!(%status, "job status updated");
        Ok(job)
    }

    /// Deletes a job and, with it, all of its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::UnknownJob`] when the job does not
    /// exist and [`WorkflowServiceError::Repository`] when persistence fails.
    #[instrument(skip_all, fields(job_id = %job_id))]
    pub async fn delete_job(&self, job_id: JobId) -> WorkflowServiceResult<()> {
        match self.repository.delete_job(job_id).await {
            Ok(()) => {
                info!("job deleted");
                Ok(())
            }
            Err(WorkflowRepositoryError::JobNotFound(id)) => {
                Err(WorkflowServiceError::UnknownJob(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Registers a department.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Domain`] for a blank name and
    /// [`WorkflowServiceError::Repository`] when the name is taken or
    /// persistence fails.
    pub async fn register_department(
        &self,
        name: impl Into<String> + Send,
    ) -> WorkflowServiceResult<Department> {
        let department = Department::new(name)?;
        self.repository.store_department(&department).await?;
        debug!(department = department.name(), "department registered");
        Ok(department)
    }

    /// Registers an employee.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::InvalidRole`] for an unknown role,
    /// [`WorkflowServiceError::UnknownDepartment`] when the department does
    /// not exist, [`WorkflowServiceError::Domain`] for a blank name and
    /// [`WorkflowServiceError::Repository`] when persistence fails.
    pub async fn register_employee(
        &self,
        request: RegisterEmployeeRequest,
    ) -> WorkflowServiceResult<Employee> {
        let role = EmployeeRole::try_from(request.role.as_str())?;
        if let Some(department_id) = request.department {
            let known = self
                .repository
                .list_departments()
                .await?
                .iter()
                .any(|department| department.id() == department_id);
            if !known {
                return Err(WorkflowServiceError::UnknownDepartment(department_id));
            }
        }

        let employee = Employee::new(request.name, request.department, role)?;
        self.repository.store_employee(&employee).await?;
        debug!(employee_id = %employee.id(), "employee registered");
        Ok(employee)
    }

    /// Removes an employee. Their tasks stay, unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::UnknownEmployee`] when the employee
    /// does not exist and [`WorkflowServiceError::Repository`] when
    /// persistence fails.
    #[instrument(skip_all, fields(employee_id = %employee_id))]
    pub async fn remove_employee(&self, employee_id: EmployeeId) -> WorkflowServiceResult<()> {
        match self.repository.delete_employee(employee_id).await {
            Ok(()) => {
                info!("employee removed; assignments cleared");
                Ok(())
            }
            Err(WorkflowRepositoryError::EmployeeNotFound(id)) => {
                Err(WorkflowServiceError::UnknownEmployee(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn load_task(&self, task_id: TaskId) -> WorkflowServiceResult<Task> {
        self.repository
            .find_task(task_id)
            .await?
            .ok_or(WorkflowServiceError::UnknownTask(task_id))
    }
}

fn log_schedule_issue(job: &Job, issue: ScheduleIssue) {
    match issue {
        ScheduleIssue::NonMonotonic { stage, previous } => warn!(
            job_number = %job.number(),
            %stage,
            %previous,
            "stage deadline falls before the preceding stage"
        ),
        ScheduleIssue::BeyondDelivery { stage } => warn!(
            job_number = %job.number(),
            %stage,
            delivery_deadline = %job.delivery_deadline(),
            "stage deadline falls after the delivery deadline"
        ),
    }
}
