//! In-memory workflow store for tests and embedding.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::workflow::{
    domain::{
        Department, DepartmentId, Employee, EmployeeId, Job, JobId, JobNumber, Task, TaskId,
        TaskSequence,
    },
    ports::{
        JobRepository, StaffRepository, TaskRepository, WorkflowRepositoryError,
        WorkflowRepositoryResult,
    },
};

/// Thread-safe in-memory store implementing every workflow port.
///
/// Jobs, tasks and staff share one lock so cascading deletes and assignment
/// clearing are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStore {
    state: Arc<RwLock<InMemoryWorkflowState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkflowState {
    last_job_number: u64,
    jobs: HashMap<JobId, Job>,
    tasks: HashMap<TaskId, Task>,
    sequence_index: BTreeMap<(JobId, TaskSequence), TaskId>,
    departments: HashMap<DepartmentId, Department>,
    employees: HashMap<EmployeeId, Employee>,
}

impl InMemoryWorkflowStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> WorkflowRepositoryResult<RwLockReadGuard<'_, InMemoryWorkflowState>> {
        self.state.read().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> WorkflowRepositoryResult<RwLockWriteGuard<'_, InMemoryWorkflowState>> {
        self.state.write().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn sorted_by<T, K: Ord>(values: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut collected: Vec<T> = values.collect();
    collected.sort_by_key(|value| key(value));
    collected
}

#[async_trait]
impl JobRepository for InMemoryWorkflowStore {
    async fn next_job_number(&self) -> WorkflowRepositoryResult<JobNumber> {
        let mut state = self.write()?;
        let next = state.last_job_number.saturating_add(1);
        let number = JobNumber::new(next).map_err(WorkflowRepositoryError::persistence)?;
        state.last_job_number = next;
        Ok(number)
    }

    async fn store_job(&self, job: &Job) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;
        if state.jobs.contains_key(&job.id()) {
            return Err(WorkflowRepositoryError::DuplicateJob(job.id()));
        }
        state.last_job_number = state.last_job_number.max(job.number().value());
        state.jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &Job) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .jobs
            .get_mut(&job.id())
            .ok_or(WorkflowRepositoryError::JobNotFound(job.id()))?;
        *slot = job.clone();
        Ok(())
    }

    async fn find_job(&self, id: JobId) -> WorkflowRepositoryResult<Option<Job>> {
        let state = self.read()?;
        Ok(state.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self) -> WorkflowRepositoryResult<Vec<Job>> {
        let state = self.read()?;
        Ok(sorted_by(state.jobs.values().cloned(), Job::number))
    }

    async fn delete_job(&self, id: JobId) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;
        if state.jobs.remove(&id).is_none() {
            return Err(WorkflowRepositoryError::JobNotFound(id));
        }
        state.tasks.retain(|_, task| task.job_id() != id);
        state.sequence_index.retain(|(job_id, _), _| *job_id != id);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryWorkflowStore {
    async fn store_tasks(&self, tasks: &[Task]) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;

        let mut batch_keys = Vec::with_capacity(tasks.len());
        for task in tasks {
            if !state.jobs.contains_key(&task.job_id()) {
                return Err(WorkflowRepositoryError::JobNotFound(task.job_id()));
            }
            let key = (task.job_id(), task.sequence());
            if state.sequence_index.contains_key(&key) || batch_keys.contains(&key) {
                return Err(WorkflowRepositoryError::DuplicateTaskSequence {
                    job_id: task.job_id(),
                    sequence: task.sequence(),
                });
            }
            batch_keys.push(key);
        }

        for task in tasks {
            state
                .sequence_index
                .insert((task.job_id(), task.sequence()), task.id());
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(WorkflowRepositoryError::TaskNotFound(task.id()))?;
        if slot.job_id() != task.job_id() || slot.sequence() != task.sequence() {
            return Err(WorkflowRepositoryError::TaskSlotChanged(task.id()));
        }
        *slot = task.clone();
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn tasks_for_job(&self, job_id: JobId) -> WorkflowRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state
            .sequence_index
            .range((job_id, TaskSequence::from_position(0))..)
            .take_while(|((owner, _), _)| *owner == job_id)
            .filter_map(|(_, task_id)| state.tasks.get(task_id).cloned())
            .collect();
        Ok(tasks)
    }

    async fn list_tasks(&self) -> WorkflowRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state
            .sequence_index
            .values()
            .filter_map(|task_id| state.tasks.get(task_id).cloned())
            .collect();
        Ok(tasks)
    }
}

#[async_trait]
impl StaffRepository for InMemoryWorkflowStore {
    async fn store_department(&self, department: &Department) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;
        let name_taken = state
            .departments
            .values()
            .any(|existing| existing.name().eq_ignore_ascii_case(department.name()));
        if name_taken || state.departments.contains_key(&department.id()) {
            return Err(WorkflowRepositoryError::DuplicateDepartment(department.id()));
        }
        state
            .departments
            .insert(department.id(), department.clone());
        Ok(())
    }

    async fn list_departments(&self) -> WorkflowRepositoryResult<Vec<Department>> {
        let state = self.read()?;
        Ok(sorted_by(state.departments.values().cloned(), |department| {
            department.name().to_owned()
        }))
    }

    async fn store_employee(&self, employee: &Employee) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;
        if state.employees.contains_key(&employee.id()) {
            return Err(WorkflowRepositoryError::DuplicateEmployee(employee.id()));
        }
        state.employees.insert(employee.id(), employee.clone());
        Ok(())
    }

    async fn find_employee(&self, id: EmployeeId) -> WorkflowRepositoryResult<Option<Employee>> {
        let state = self.read()?;
        Ok(state.employees.get(&id).cloned())
    }

    async fn list_employees(&self) -> WorkflowRepositoryResult<Vec<Employee>> {
        let state = self.read()?;
        Ok(sorted_by(state.employees.values().cloned(), |employee| {
            employee.name().to_owned()
        }))
    }

    async fn delete_employee(&self, id: EmployeeId) -> WorkflowRepositoryResult<()> {
        let mut state = self.write()?;
        if state.employees.remove(&id).is_none() {
            return Err(WorkflowRepositoryError::EmployeeNotFound(id));
        }
        for task in state.tasks.values_mut() {
            if task.assignee() == Some(id) {
                task.clear_assignee();
            }
        }
        Ok(())
    }
}
