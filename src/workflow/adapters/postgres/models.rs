//! Diesel row models and their conversion to domain values.

use super::schema::{departments, employees, jobs, production_tasks};
use crate::workflow::{
    domain::{
        Department, DepartmentId, Employee, EmployeeId, EmployeeRole, Job, JobId, JobNumber,
        JobStatus, JobType, PersistedJobData, PersistedTaskData, Stage, Task, TaskId,
        TaskSequence, TaskStatus,
    },
    ports::{WorkflowRepositoryError, WorkflowRepositoryResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;

/// Row model for job records.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRow {
    /// Internal job identifier.
    pub id: uuid::Uuid,
    /// Display number.
    pub job_number: i64,
    /// Job type label.
    pub job_type: String,
    /// Ordered quantity.
    pub quantity: i32,
    /// Job status.
    pub status: String,
    /// Delivery deadline.
    pub delivery_deadline: DateTime<Utc>,
    /// Stage deadline overrides as a JSON object.
    pub stage_deadlines: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for task records.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = production_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning job.
    pub job_id: uuid::Uuid,
    /// Sequence number within the job.
    pub sequence: i32,
    /// Production stage.
    pub stage: String,
    /// Department performing the stage.
    pub department_id: Option<uuid::Uuid>,
    /// Assigned employee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Task deadline.
    pub deadline: DateTime<Utc>,
    /// Task status.
    pub status: String,
    /// Free-form remarks.
    pub remarks: Option<String>,
    /// Delay explanation.
    pub delay_comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for department records.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DepartmentRow {
    /// Internal department identifier.
    pub id: uuid::Uuid,
    /// Department name.
    pub name: String,
}

/// Row model for employee records.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRow {
    /// Internal employee identifier.
    pub id: uuid::Uuid,
    /// Employee name.
    pub name: String,
    /// Department the employee belongs to.
    pub department_id: Option<uuid::Uuid>,
    /// System role.
    pub role: String,
}

/// Result row for `nextval` queries.
#[derive(Debug, QueryableByName)]
pub struct SequenceValueRow {
    /// Value produced by the sequence.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub value: i64,
}

pub fn job_to_row(job: &Job) -> WorkflowRepositoryResult<JobRow> {
    let stage_deadlines =
        serde_json::to_value(job.stage_deadlines()).map_err(WorkflowRepositoryError::persistence)?;
    Ok(JobRow {
        id: job.id().into_inner(),
        job_number: i64::try_from(job.number().value())
            .map_err(WorkflowRepositoryError::persistence)?,
        job_type: job.job_type().as_str().to_owned(),
        quantity: i32::try_from(job.quantity()).map_err(WorkflowRepositoryError::persistence)?,
        status: job.status().as_str().to_owned(),
        delivery_deadline: job.delivery_deadline(),
        stage_deadlines,
        created_at: job.created_at(),
        updated_at: job.updated_at(),
    })
}

pub fn row_to_job(row: JobRow) -> WorkflowRepositoryResult<Job> {
    let number = u64::try_from(row.job_number)
        .map_err(WorkflowRepositoryError::persistence)
        .and_then(|value| JobNumber::new(value).map_err(WorkflowRepositoryError::persistence))?;
    let job_type = JobType::parse(&row.job_type).map_err(WorkflowRepositoryError::persistence)?;
    let quantity = u32::try_from(row.quantity).map_err(WorkflowRepositoryError::persistence)?;
    let status =
        JobStatus::try_from(row.status.as_str()).map_err(WorkflowRepositoryError::persistence)?;
    let stage_deadlines =
        serde_json::from_value::<BTreeMap<Stage, DateTime<Utc>>>(row.stage_deadlines)
            .map_err(WorkflowRepositoryError::persistence)?;

    Ok(Job::from_persisted(PersistedJobData {
        id: JobId::from_uuid(row.id),
        number,
        job_type,
        quantity,
        status,
        delivery_deadline: row.delivery_deadline,
        stage_deadlines,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub fn task_to_row(task: &Task) -> WorkflowRepositoryResult<TaskRow> {
    Ok(TaskRow {
        id: task.id().into_inner(),
        job_id: task.job_id().into_inner(),
        sequence: i32::try_from(task.sequence().value())
            .map_err(WorkflowRepositoryError::persistence)?,
        stage: task.stage().as_str().to_owned(),
        department_id: task.department().map(DepartmentId::into_inner),
        assignee_id: task.assignee().map(EmployeeId::into_inner),
        deadline: task.deadline(),
        status: task.status().as_str().to_owned(),
        remarks: task.remarks().map(str::to_owned),
        delay_comment: task.delay_comment().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

pub fn row_to_task(row: TaskRow) -> WorkflowRepositoryResult<Task> {
    let sequence = u32::try_from(row.sequence)
        .map_err(WorkflowRepositoryError::persistence)
        .and_then(|value| {
            TaskSequence::new(value).map_err(WorkflowRepositoryError::persistence)
        })?;
    let stage = Stage::try_from(row.stage.as_str()).map_err(WorkflowRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(WorkflowRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        job_id: JobId::from_uuid(row.job_id),
        sequence,
        stage,
        department: row.department_id.map(DepartmentId::from_uuid),
        assignee: row.assignee_id.map(EmployeeId::from_uuid),
        deadline: row.deadline,
        status,
        remarks: row.remarks,
        delay_comment: row.delay_comment,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

pub fn department_to_row(department: &Department) -> DepartmentRow {
    DepartmentRow {
        id: department.id().into_inner(),
        name: department.name().to_owned(),
    }
}

pub fn row_to_department(row: DepartmentRow) -> WorkflowRepositoryResult<Department> {
    Department::with_id(DepartmentId::from_uuid(row.id), row.name)
        .map_err(WorkflowRepositoryError::persistence)
}

pub fn employee_to_row(employee: &Employee) -> EmployeeRow {
    EmployeeRow {
        id: employee.id().into_inner(),
        name: employee.name().to_owned(),
        department_id: employee.department().map(DepartmentId::into_inner),
        role: employee.role().as_str().to_owned(),
    }
}

pub fn row_to_employee(row: EmployeeRow) -> WorkflowRepositoryResult<Employee> {
    let role =
        EmployeeRole::try_from(row.role.as_str()).map_err(WorkflowRepositoryError::persistence)?;
    Employee::with_id(
        EmployeeId::from_uuid(row.id),
        row.name,
        row.department_id.map(DepartmentId::from_uuid),
        role,
    )
    .map_err(WorkflowRepositoryError::persistence)
}
