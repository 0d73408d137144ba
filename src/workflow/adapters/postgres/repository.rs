//! `PostgreSQL` store implementing the workflow ports.

use super::{
    models::{
        DepartmentRow, EmployeeRow, JobRow, SequenceValueRow, TaskRow, department_to_row,
        employee_to_row, job_to_row, row_to_department, row_to_employee, row_to_job,
        row_to_task, task_to_row,
    },
    schema::{departments, employees, jobs, production_tasks},
};
use crate::workflow::{
    domain::{
        Department, Employee, EmployeeId, Job, JobId, JobNumber, Task, TaskId, TaskSequence,
    },
    ports::{
        JobRepository, StaffRepository, TaskRepository, WorkflowRepositoryError,
        WorkflowRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by workflow adapters.
pub type WorkflowPgPool = Pool<ConnectionManager<PgConnection>>;

const TASK_SEQUENCE_CONSTRAINT: &str = "idx_production_tasks_job_sequence";
const DEPARTMENT_NAME_CONSTRAINT: &str = "idx_departments_name_unique";

/// `PostgreSQL`-backed workflow store.
#[derive(Debug, Clone)]
pub struct PostgresWorkflowStore {
    pool: WorkflowPgPool,
}

impl PostgresWorkflowStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkflowRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkflowRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkflowRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkflowRepositoryError::persistence)?
    }
}

impl From<DieselError> for WorkflowRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn violated_constraint(err: &DieselError, kind: DatabaseErrorKind) -> Option<String> {
    match err {
        DieselError::DatabaseError(actual, info)
            if std::mem::discriminant(actual) == std::mem::discriminant(&kind) =>
        {
            Some(constraint_name(info.as_ref()))
        }
        _ => None,
    }
}

fn constraint_name(info: &dyn DatabaseErrorInformation) -> String {
    info.constraint_name().unwrap_or_default().to_owned()
}

#[async_trait]
impl JobRepository for PostgresWorkflowStore {
    async fn next_job_number(&self) -> WorkflowRepositoryResult<JobNumber> {
        self.run_blocking(|connection| {
            let row = diesel::sql_query("SELECT nextval('job_number_seq') AS value")
                .get_result::<SequenceValueRow>(connection)?;
            let value = u64::try_from(row.value).map_err(WorkflowRepositoryError::persistence)?;
            JobNumber::new(value).map_err(WorkflowRepositoryError::persistence)
        })
        .await
    }

    async fn store_job(&self, job: &Job) -> WorkflowRepositoryResult<()> {
        let job_id = job.id();
        let row = job_to_row(job)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(jobs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if violated_constraint(&err, DatabaseErrorKind::UniqueViolation).is_some() {
                        WorkflowRepositoryError::DuplicateJob(job_id)
                    } else {
                        WorkflowRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update_job(&self, job: &Job) -> WorkflowRepositoryResult<()> {
        let job_id = job.id();
        let row = job_to_row(job)?;
        self.run_blocking(move |connection| {
            let JobRow {
                id,
                quantity,
                status,
                delivery_deadline,
                stage_deadlines,
                updated_at,
                ..
            } = row;
            let updated = diesel::update(jobs::table.find(id))
                .set((
                    jobs::quantity.eq(quantity),
                    jobs::status.eq(status),
                    jobs::delivery_deadline.eq(delivery_deadline),
                    jobs::stage_deadlines.eq(stage_deadlines),
                    jobs::updated_at.eq(updated_at),
                ))
                .execute(connection)?;
            if updated == 0 {
                return Err(WorkflowRepositoryError::JobNotFound(job_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_job(&self, id: JobId) -> WorkflowRepositoryResult<Option<Job>> {
        self.run_blocking(move |connection| {
            let row = jobs::table
                .find(id.into_inner())
                .select(JobRow::as_select())
                .first::<JobRow>(connection)
                .optional()?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn list_jobs(&self) -> WorkflowRepositoryResult<Vec<Job>> {
        self.run_blocking(|connection| {
            jobs::table
                .order(jobs::job_number.asc())
                .select(JobRow::as_select())
                .load::<JobRow>(connection)?
                .into_iter()
                .map(row_to_job)
                .collect()
        })
        .await
    }

    async fn delete_job(&self, id: JobId) -> WorkflowRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Tasks go with the job through `ON DELETE CASCADE`.
            let deleted = diesel::delete(jobs::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(WorkflowRepositoryError::JobNotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresWorkflowStore {
    async fn store_tasks(&self, tasks: &[Task]) -> WorkflowRepositoryResult<()> {
        let Some(first) = tasks.first() else {
            return Ok(());
        };
        let fallback_key = (first.job_id(), first.sequence());
        let rows = tasks
            .iter()
            .map(task_to_row)
            .collect::<WorkflowRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, WorkflowRepositoryError, _>(|tx| {
                // This pre-check names the colliding slot; the unique index
                // still guards the window between check and insert.
                if let Some(existing) = find_occupied_slot(tx, &rows)? {
                    return Err(existing);
                }

                diesel::insert_into(production_tasks::table)
                    .values(&rows)
                    .execute(tx)
                    .map_err(|err| map_task_insert_error(err, fallback_key))?;
                Ok(())
            })
        })
        .await
    }

    async fn update_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let task_id = task.id();
        let row = task_to_row(task)?;
        self.run_blocking(move |connection| {
            let TaskRow {
                id,
                job_id,
                sequence,
                assignee_id,
                deadline,
                status,
                remarks,
                delay_comment,
                updated_at,
                ..
            } = row;
            let in_slot = production_tasks::table
                .find(id)
                .filter(production_tasks::job_id.eq(job_id))
                .filter(production_tasks::sequence.eq(sequence));
            let updated = diesel::update(in_slot)
                .set((
                    production_tasks::assignee_id.eq(assignee_id),
                    production_tasks::deadline.eq(deadline),
                    production_tasks::status.eq(status),
                    production_tasks::remarks.eq(remarks),
                    production_tasks::delay_comment.eq(delay_comment),
                    production_tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)?;
            if updated > 0 {
                return Ok(());
            }
            let exists = production_tasks::table
                .find(id)
                .select(production_tasks::id)
                .first::<uuid::Uuid>(connection)
                .optional()?
                .is_some();
            if exists {
                Err(WorkflowRepositoryError::TaskSlotChanged(task_id))
            } else {
                Err(WorkflowRepositoryError::TaskNotFound(task_id))
            }
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = production_tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn tasks_for_job(&self, job_id: JobId) -> WorkflowRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            production_tasks::table
                .filter(production_tasks::job_id.eq(job_id.into_inner()))
                .order(production_tasks::sequence.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }

    async fn list_tasks(&self) -> WorkflowRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            production_tasks::table
                .order((
                    production_tasks::job_id.asc(),
                    production_tasks::sequence.asc(),
                ))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }
}

fn find_occupied_slot(
    connection: &mut PgConnection,
    rows: &[TaskRow],
) -> WorkflowRepositoryResult<Option<WorkflowRepositoryError>> {
    for row in rows {
        let occupied = production_tasks::table
            .filter(production_tasks::job_id.eq(row.job_id))
            .filter(production_tasks::sequence.eq(row.sequence))
            .select(production_tasks::id)
            .first::<uuid::Uuid>(connection)
            .optional()?;
        if occupied.is_some() {
            let sequence = u32::try_from(row.sequence)
                .map_err(WorkflowRepositoryError::persistence)
                .and_then(|value| {
                    TaskSequence::new(value).map_err(WorkflowRepositoryError::persistence)
                })?;
            return Ok(Some(WorkflowRepositoryError::DuplicateTaskSequence {
                job_id: JobId::from_uuid(row.job_id),
                sequence,
            }));
        }
    }
    Ok(None)
}

fn map_task_insert_error(
    err: DieselError,
    (job_id, sequence): (JobId, TaskSequence),
) -> WorkflowRepositoryError {
    if violated_constraint(&err, DatabaseErrorKind::UniqueViolation)
        .is_some_and(|name| name == TASK_SEQUENCE_CONSTRAINT)
    {
        return WorkflowRepositoryError::DuplicateTaskSequence { job_id, sequence };
    }
    if violated_constraint(&err, DatabaseErrorKind::ForeignKeyViolation).is_some() {
        return WorkflowRepositoryError::JobNotFound(job_id);
    }
    WorkflowRepositoryError::persistence(err)
}

#[async_trait]
impl StaffRepository for PostgresWorkflowStore {
    async fn store_department(&self, department: &Department) -> WorkflowRepositoryResult<()> {
        let department_id = department.id();
        let row = department_to_row(department);
        self.run_blocking(move |connection| {
            diesel::insert_into(departments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    let duplicate = violated_constraint(&err, DatabaseErrorKind::UniqueViolation)
                        .is_some_and(|name| {
                            name == DEPARTMENT_NAME_CONSTRAINT || name == "departments_pkey"
                        });
                    if duplicate {
                        WorkflowRepositoryError::DuplicateDepartment(department_id)
                    } else {
                        WorkflowRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn list_departments(&self) -> WorkflowRepositoryResult<Vec<Department>> {
        self.run_blocking(|connection| {
            departments::table
                .order(departments::name.asc())
                .select(DepartmentRow::as_select())
                .load::<DepartmentRow>(connection)?
                .into_iter()
                .map(row_to_department)
                .collect()
        })
        .await
    }

    async fn store_employee(&self, employee: &Employee) -> WorkflowRepositoryResult<()> {
        let employee_id = employee.id();
        let row = employee_to_row(employee);
        self.run_blocking(move |connection| {
            diesel::insert_into(employees::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if violated_constraint(&err, DatabaseErrorKind::UniqueViolation).is_some() {
                        WorkflowRepositoryError::DuplicateEmployee(employee_id)
                    } else {
                        WorkflowRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn find_employee(&self, id: EmployeeId) -> WorkflowRepositoryResult<Option<Employee>> {
        self.run_blocking(move |connection| {
            let row = employees::table
                .find(id.into_inner())
                .select(EmployeeRow::as_select())
                .first::<EmployeeRow>(connection)
                .optional()?;
            row.map(row_to_employee).transpose()
        })
        .await
    }

    async fn list_employees(&self) -> WorkflowRepositoryResult<Vec<Employee>> {
        self.run_blocking(|connection| {
            employees::table
                .order(employees::name.asc())
                .select(EmployeeRow::as_select())
                .load::<EmployeeRow>(connection)?
                .into_iter()
                .map(row_to_employee)
                .collect()
        })
        .await
    }

    async fn delete_employee(&self, id: EmployeeId) -> WorkflowRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, WorkflowRepositoryError, _>(|tx| {
                let employee_uuid = id.into_inner();
                diesel::update(
                    production_tasks::table
                        .filter(production_tasks::assignee_id.eq(employee_uuid)),
                )
                .set(production_tasks::assignee_id.eq(None::<uuid::Uuid>))
                .execute(tx)?;

                let deleted = diesel::delete(employees::table.find(employee_uuid)).execute(tx)?;
                if deleted == 0 {
                    return Err(WorkflowRepositoryError::EmployeeNotFound(id));
                }
                Ok(())
            })
        })
        .await
    }
}
