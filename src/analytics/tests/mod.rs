//! Unit tests for progress and risk analytics.


use crate::workflow::domain::{
    EmployeeId, Job, JobId, JobNumber, JobStatus, JobType, PersistedJobData, PersistedTaskData,
    Stage, Task, TaskId, TaskSequence, TaskStatus,
};
use crate::workflow::tests::midnight;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Evaluation instant shared by the analytics tests.
pub(crate) fn now() -> DateTime<Utc> {
    midnight(2024, 3, 15)
}

pub(crate) fn job(number: u64, status: JobStatus, delivery: DateTime<Utc>) -> Job {
    Job::from_persisted(PersistedJobData {
        id: JobId::new(),
        number: JobNumber::new(number).expect("valid job number"),
        job_type: JobType::Booklet,
        quantity: 100,
        status,
        delivery_deadline: delivery,
        stage_deadlines: BTreeMap::new(),
        created_at: midnight(2024, 3, 1),
        updated_at: midnight(2024, 3, 1),
    })
}

/// Builder for tasks with explicit deadline, status and assignee.
pub(crate) struct TaskSpec {
    job_id: JobId,
    sequence: u32,
    stage: Stage,
    deadline: DateTime<Utc>,
    status: TaskStatus,
    assignee: Option<EmployeeId>,
}

impl TaskSpec {
    pub(crate) fn new(job_id: JobId, sequence: u32, deadline: DateTime<Utc>) -> Self {
        let index = usize::try_from(sequence.saturating_sub(1)).unwrap_or_default();
        Self {
            job_id,
            sequence,
            stage: Stage::all().get(index).copied().unwrap_or(Stage::Dispatch),
            deadline,
            status: TaskStatus::Pending,
            assignee: None,
        }
    }

    pub(crate) const fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub(crate) const fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) const fn assignee(mut self, employee: EmployeeId) -> Self {
        self.assignee = Some(employee);
        self
    }

    pub(crate) fn build(self) -> Task {
        Task::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            job_id: self.job_id,
            sequence: TaskSequence::new(self.sequence).expect("positive sequence"),
            stage: self.stage,
            department: None,
            assignee: self.assignee,
            deadline: self.deadline,
            status: self.status,
            remarks: None,
            delay_comment: None,
            created_at: midnight(2024, 3, 1),
            updated_at: midnight(2024, 3, 1),
        })
    }
}
