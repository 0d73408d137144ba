//! Per-job, per-stage and per-employee progress computations.

use super::index::{EmployeeIndex, JobIndex};
use super::risk::{RiskLevel, classify, percentage};
use crate::config::RiskPolicy;
use crate::workflow::domain::{
    Employee, EmployeeId, Job, JobId, JobNumber, Stage, Task, TaskId, TaskSequence, TaskStatus,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Job as referenced from computed output; the job may be missing from the
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobReference {
    /// The job is present in the snapshot.
    Known {
        /// Job identifier.
        id: JobId,
        /// Display number.
        number: JobNumber,
    },
    /// The job is not present in the snapshot.
    Unknown {
        /// Dangling job identifier.
        id: JobId,
    },
}

impl JobReference {
    /// Resolves `id` against `jobs`.
    #[must_use]
    pub fn resolve(id: JobId, jobs: &JobIndex<'_>) -> Self {
        jobs.get(&id).map_or(Self::Unknown { id }, |job| Self::Known {
            id,
            number: job.number(),
        })
    }

    /// Returns the referenced identifier.
    #[must_use]
    pub const fn id(self) -> JobId {
        match self {
            Self::Known { id, .. } | Self::Unknown { id } => id,
        }
    }
}

impl fmt::Display for JobReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known { number, .. } => write!(f, "{number}"),
            Self::Unknown { .. } => f.write_str("Unknown"),
        }
    }
}

/// Assignee of a task as shown in computed output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignee {
    /// Nobody is assigned.
    Unassigned,
    /// The assignee is present in the snapshot.
    Employee {
        /// Employee identifier.
        id: EmployeeId,
        /// Employee name.
        name: String,
    },
    /// The assignee is not present in the snapshot.
    Unknown {
        /// Dangling employee identifier.
        id: EmployeeId,
    },
}

impl Assignee {
    /// Resolves a task's assignee against `employees`.
    #[must_use]
    pub fn resolve(task: &Task, employees: &EmployeeIndex<'_>) -> Self {
        let Some(id) = task.assignee() else {
            return Self::Unassigned;
        };
        employees
            .get(&id)
            .map_or(Self::Unknown { id }, |employee| Self::Employee {
                id,
                name: employee.name().to_owned(),
            })
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => f.write_str("Unassigned"),
            Self::Employee { name, .. } => f.write_str(name),
            Self::Unknown { .. } => f.write_str("Unknown"),
        }
    }
}

/// Completion and deadline standing of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobProgress {
    /// Job identifier.
    pub job_id: JobId,
    /// Display number.
    pub job_number: JobNumber,
    /// Completed tasks as a rounded percentage; 0 for a job without tasks.
    pub percent: u8,
    /// Number of completed tasks.
    pub completed_tasks: usize,
    /// Number of tasks.
    pub total_tasks: usize,
    /// Deadline standing of the job.
    pub risk: RiskLevel,
    /// Stage of the first unfinished task, if any.
    pub current_stage: Option<Stage>,
}

impl JobProgress {
    /// Returns `true` when the job is overdue.
    #[must_use]
    pub const fn is_overdue(&self) -> bool {
        self.risk.is_overdue()
    }

    /// Returns `true` when the job is at risk but not yet overdue.
    #[must_use]
    pub const fn is_at_risk(&self) -> bool {
        self.risk.is_at_risk()
    }
}

/// Concentration of overdue and at-risk tasks in one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageBottleneck {
    /// Affected stage.
    pub stage: Stage,
    /// Number of overdue or at-risk tasks in the stage.
    pub at_risk_count: usize,
    /// How many of those are overdue.
    pub overdue_count: usize,
    /// Distinct jobs owning the affected tasks.
    pub affected_job_ids: BTreeSet<JobId>,
    /// The same jobs resolved for display, in job-id order.
    pub affected_jobs: Vec<JobReference>,
}

/// Task load and completion ratio of one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeWorkload {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Employee name.
    pub employee_name: String,
    /// Number of tasks assigned to the employee.
    pub total_tasks: usize,
    /// Tasks in progress.
    pub active_tasks: usize,
    /// Completed tasks.
    pub completed_tasks: usize,
    /// Unfinished tasks past their deadline.
    pub overdue_tasks: usize,
    /// Completed tasks as a rounded percentage of all assigned tasks; 0 when
    /// nothing is assigned.
    pub efficiency_percent: u8,
}

/// System-wide headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    /// Number of jobs.
    pub total_jobs: usize,
    /// Jobs that are neither completed nor delivered.
    pub active_jobs: usize,
    /// Overdue jobs.
    pub overdue_jobs: usize,
    /// At-risk jobs.
    pub at_risk_jobs: usize,
    /// Number of tasks.
    pub total_tasks: usize,
    /// Completed tasks.
    pub completed_tasks: usize,
    /// Overdue tasks.
    pub overdue_tasks: usize,
    /// Completed tasks as a rounded percentage of all tasks; 0 without tasks.
    pub overall_progress: u8,
}

/// An overdue or at-risk task resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedTask {
    /// Task identifier.
    pub task_id: TaskId,
    /// Owning job.
    pub job: JobReference,
    /// Stage of the task.
    pub stage: Stage,
    /// Position of the task within its job.
    pub sequence: TaskSequence,
    /// Task deadline.
    pub deadline: DateTime<Utc>,
    /// Task status.
    pub status: TaskStatus,
    /// Overdue or at risk.
    pub risk: RiskLevel,
    /// Who the task is assigned to.
    pub assignee: Assignee,
}

/// Stateless analyzer evaluating snapshots at a fixed instant.
///
/// All methods are total: missing references degrade to
/// [`JobReference::Unknown`] or [`Assignee::Unknown`] and empty inputs yield
/// zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressAnalyzer {
    now: DateTime<Utc>,
    policy: RiskPolicy,
}

impl ProgressAnalyzer {
    /// Creates an analyzer evaluating deadlines against `now`.
    #[must_use]
    pub const fn at(now: DateTime<Utc>, policy: RiskPolicy) -> Self {
        Self { now, policy }
    }

    /// Creates an analyzer evaluating deadlines against the clock's time.
    #[must_use]
    pub fn from_clock(clock: &impl Clock, policy: RiskPolicy) -> Self {
        Self::at(clock.utc(), policy)
    }

    /// Returns the evaluation instant.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Classifies a job by its delivery deadline and status.
    #[must_use]
    pub fn job_risk(&self, job: &Job) -> RiskLevel {
        classify(
            job.delivery_deadline(),
            job.status().is_terminal(),
            self.now,
            self.policy.at_risk_window(),
        )
    }

    /// Classifies a task by its own deadline and status, independently of
    /// its job.
    #[must_use]
    pub fn task_risk(&self, task: &Task) -> RiskLevel {
        classify(
            task.deadline(),
            task.status().is_terminal(),
            self.now,
            self.policy.at_risk_window(),
        )
    }

    /// Computes the progress of `job`. Tasks belonging to other jobs are
    /// ignored, so the full task snapshot may be passed.
    #[must_use]
    pub fn job_progress<'t>(
        &self,
        job: &Job,
        tasks: impl IntoIterator<Item = &'t Task>,
    ) -> JobProgress {
        let mut own: Vec<&Task> = tasks
            .into_iter()
            .filter(|task| task.job_id() == job.id())
            .collect();
        own.sort_by_key(|task| task.sequence());

        let completed_tasks = own
            .iter()
            .filter(|task| task.status() == TaskStatus::Completed)
            .count();
        let current_stage = if own.is_empty() {
            job.status().stage()
        } else {
            own.iter()
                .find(|task| task.status() != TaskStatus::Completed)
                .map(|task| task.stage())
        };

        JobProgress {
            job_id: job.id(),
            job_number: job.number(),
            percent: percentage(completed_tasks, own.len()),
            completed_tasks,
            total_tasks: own.len(),
            risk: self.job_risk(job),
            current_stage,
        }
    }

    /// Groups overdue and at-risk tasks by stage.
    ///
    /// Stages without such tasks are omitted. Results are ordered by
    /// `at_risk_count` descending, then by production order.
    #[must_use]
    pub fn bottlenecks(&self, tasks: &[Task], jobs: &JobIndex<'_>) -> Vec<StageBottleneck> {
        let mut by_stage: BTreeMap<Stage, (usize, usize, BTreeSet<JobId>)> = BTreeMap::new();
        for task in tasks {
            let risk = self.task_risk(task);
            if !risk.needs_attention() {
                continue;
            }
            let (flagged, overdue, job_ids) = by_stage.entry(task.stage()).or_default();
            *flagged += 1;
            if risk.is_overdue() {
                *overdue += 1;
            }
            job_ids.insert(task.job_id());
        }

        let mut bottlenecks: Vec<StageBottleneck> = by_stage
            .into_iter()
            .map(|(stage, (at_risk_count, overdue_count, affected_job_ids))| {
                let affected_jobs = affected_job_ids
                    .iter()
                    .map(|id| JobReference::resolve(*id, jobs))
                    .collect();
                StageBottleneck {
                    stage,
                    at_risk_count,
                    overdue_count,
                    affected_job_ids,
                    affected_jobs,
                }
            })
            .collect();
        bottlenecks.sort_by(|a, b| {
            b.at_risk_count
                .cmp(&a.at_risk_count)
                .then(a.stage.cmp(&b.stage))
        });
        bottlenecks
    }

    /// Summarises the tasks assigned to `employee`.
    #[must_use]
    pub fn employee_workload(&self, employee: &Employee, tasks: &[Task]) -> EmployeeWorkload {
        let mut workload = EmployeeWorkload {
            employee_id: employee.id(),
            employee_name: employee.name().to_owned(),
            total_tasks: 0,
            active_tasks: 0,
            completed_tasks: 0,
            overdue_tasks: 0,
            efficiency_percent: 0,
        };

        for task in tasks
            .iter()
            .filter(|task| task.assignee() == Some(employee.id()))
        {
            workload.total_tasks += 1;
            match task.status() {
                TaskStatus::Completed => workload.completed_tasks += 1,
                TaskStatus::InProgress => workload.active_tasks += 1,
                TaskStatus::Pending | TaskStatus::InQueue | TaskStatus::Delayed => {}
            }
            if self.task_risk(task).is_overdue() {
                workload.overdue_tasks += 1;
            }
        }

        workload.efficiency_percent = percentage(workload.completed_tasks, workload.total_tasks);
        workload
    }

    /// Computes system-wide headline figures.
    #[must_use]
    pub fn dashboard(&self, jobs: &[Job], tasks: &[Task]) -> DashboardMetrics {
        let job_risks: Vec<RiskLevel> = jobs.iter().map(|job| self.job_risk(job)).collect();
        let completed_tasks = tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::Completed)
            .count();

        DashboardMetrics {
            total_jobs: jobs.len(),
            active_jobs: jobs
                .iter()
                .filter(|job| !job.status().is_terminal())
                .count(),
            overdue_jobs: job_risks.iter().filter(|risk| risk.is_overdue()).count(),
            at_risk_jobs: job_risks.iter().filter(|risk| risk.is_at_risk()).count(),
            total_tasks: tasks.len(),
            completed_tasks,
            overdue_tasks: tasks
                .iter()
                .filter(|task| self.task_risk(task).is_overdue())
                .count(),
            overall_progress: percentage(completed_tasks, tasks.len()),
        }
    }

    /// Lists overdue and at-risk tasks, earliest deadline first.
    #[must_use]
    pub fn flagged_tasks(
        &self,
        tasks: &[Task],
        jobs: &JobIndex<'_>,
        employees: &EmployeeIndex<'_>,
    ) -> Vec<FlaggedTask> {
        let mut flagged: Vec<FlaggedTask> = tasks
            .iter()
            .filter_map(|task| {
                let risk = self.task_risk(task);
                risk.needs_attention().then(|| FlaggedTask {
                    task_id: task.id(),
                    job: JobReference::resolve(task.job_id(), jobs),
                    stage: task.stage(),
                    sequence: task.sequence(),
                    deadline: task.deadline(),
                    status: task.status(),
                    risk,
                    assignee: Assignee::resolve(task, employees),
                })
            })
            .collect();
        flagged.sort_by_key(|entry| (entry.deadline, entry.sequence));
        flagged
    }
}
