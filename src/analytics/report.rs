//! Whole-system production report assembled from repository snapshots.

use super::index::{group_tasks_by_job, index_employees, index_jobs};
use super::progress::{
    DashboardMetrics, EmployeeWorkload, FlaggedTask, JobProgress, ProgressAnalyzer,
    StageBottleneck,
};
use crate::config::RiskPolicy;
use crate::workflow::domain::{Employee, Job, Task};
use crate::workflow::ports::{
    JobRepository, StaffRepository, TaskRepository, WorkflowRepositoryError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Point-in-time copy of everything the analyzer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    /// All jobs.
    pub jobs: Vec<Job>,
    /// All tasks.
    pub tasks: Vec<Task>,
    /// All employees.
    pub employees: Vec<Employee>,
}

/// Serialisable summary of the production floor at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionReport {
    /// Instant the report was evaluated at.
    pub generated_at: DateTime<Utc>,
    /// Headline figures.
    pub dashboard: DashboardMetrics,
    /// Progress of every job, in job-number order.
    pub jobs: Vec<JobProgress>,
    /// Stages holding overdue or at-risk tasks.
    pub bottlenecks: Vec<StageBottleneck>,
    /// Workload of every employee, in name order.
    pub workloads: Vec<EmployeeWorkload>,
    /// Overdue and at-risk tasks, earliest deadline first.
    pub flagged_tasks: Vec<FlaggedTask>,
}

impl ProgressAnalyzer {
    /// Builds a full report from `snapshot`.
    #[must_use]
    pub fn report(&self, snapshot: &WorkflowSnapshot) -> ProductionReport {
        let jobs = index_jobs(&snapshot.jobs);
        let employees = index_employees(&snapshot.employees);
        let tasks_by_job = group_tasks_by_job(&snapshot.tasks);

        let mut ordered_jobs: Vec<&Job> = snapshot.jobs.iter().collect();
        ordered_jobs.sort_by_key(|job| job.number());
        let job_progress = ordered_jobs
            .into_iter()
            .map(|job| {
                let own = tasks_by_job
                    .get(&job.id())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                self.job_progress(job, own.iter().copied())
            })
            .collect();

        let mut workloads: Vec<EmployeeWorkload> = snapshot
            .employees
            .iter()
            .map(|employee| self.employee_workload(employee, &snapshot.tasks))
            .collect();
        workloads.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));

        ProductionReport {
            generated_at: self.now(),
            dashboard: self.dashboard(&snapshot.jobs, &snapshot.tasks),
            jobs: job_progress,
            bottlenecks: self.bottlenecks(&snapshot.tasks, &jobs),
            workloads,
            flagged_tasks: self.flagged_tasks(&snapshot.tasks, &jobs, &employees),
        }
    }
}

/// Errors returned while assembling reports.
#[derive(Debug, Clone, Error)]
pub enum ReportingError {
    /// Reading the snapshot failed.
    #[error(transparent)]
    Repository(#[from] WorkflowRepositoryError),
}

/// Result type for reporting operations.
pub type ReportingResult<T> = Result<T, ReportingError>;

/// Reads snapshots through the repository ports and evaluates them at the
/// clock's current time.
#[derive(Clone)]
pub struct ReportingService<R, C>
where
    R: JobRepository + TaskRepository + StaffRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    policy: RiskPolicy,
}

impl<R, C> ReportingService<R, C>
where
    R: JobRepository + TaskRepository + StaffRepository,
    C: Clock + Send + Sync,
{
    /// Creates a reporting service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, policy: RiskPolicy) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    /// Returns an analyzer anchored at the clock's current time.
    #[must_use]
    pub fn analyzer(&self) -> ProgressAnalyzer {
        ProgressAnalyzer::from_clock(&*self.clock, self.policy)
    }

    /// Reads the current jobs, tasks and employees.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::Repository`] when any read fails.
    pub async fn snapshot(&self) -> ReportingResult<WorkflowSnapshot> {
        Ok(WorkflowSnapshot {
            jobs: self.repository.list_jobs().await?,
            tasks: self.repository.list_tasks().await?,
            employees: self.repository.list_employees().await?,
        })
    }

    /// Builds a production report from a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::Repository`] when the snapshot cannot be
    /// read.
    #[instrument(skip_all)]
    pub async fn production_report(&self) -> ReportingResult<ProductionReport> {
        let snapshot = self.snapshot().await?;
        log_dangling_references(&snapshot);

        let report = self.analyzer().report(&snapshot);
        info!(
            jobs = report.dashboard.total_jobs,
            overdue_jobs = report.dashboard.overdue_jobs,
            flagged_tasks = report.flagged_tasks.len(),
            "production report generated"
        );
        Ok(report)
    }
}

fn log_dangling_references(snapshot: &WorkflowSnapshot) {
    let jobs = index_jobs(&snapshot.jobs);
    let employees = index_employees(&snapshot.employees);
    for task in &snapshot.tasks {
        if jobs.get(&task.job_id()).is_none() {
            warn!(task_id = %task.id(), job_id = %task.job_id(), "task references a missing job");
        }
        if let Some(employee_id) = task.assignee() {
            if employees.get(&employee_id).is_none() {
                warn!(task_id = %task.id(), %employee_id, "task assigned to a missing employee");
            }
        }
    }
}
