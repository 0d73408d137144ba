//! Task generation for newly created jobs.

use super::{
    Department, DepartmentId, Job, Stage, StagePolicy, StageSchedule, Task, TaskBlueprint,
    TaskSequence, allocate_stage_deadlines,
};
use mockable::Clock;
use std::collections::{BTreeMap, BTreeSet};

/// Read-only lookup from stage to the department that performs it.
///
/// Built per call from a department snapshot; departments are matched to
/// stages by name (`"Pre-Press"`, `"QC"`, ...). When several departments
/// match a stage the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentDirectory {
    by_stage: BTreeMap<Stage, DepartmentId>,
}

impl DepartmentDirectory {
    /// Builds the directory from a department snapshot.
    #[must_use]
    pub fn from_departments<'a>(departments: impl IntoIterator<Item = &'a Department>) -> Self {
        let mut by_stage = BTreeMap::new();
        for department in departments {
            if let Some(stage) = department.stage() {
                by_stage.entry(stage).or_insert(department.id());
            }
        }
        Self { by_stage }
    }

    /// Returns the department performing `stage`, if known.
    #[must_use]
    pub fn department_for(&self, stage: Stage) -> Option<DepartmentId> {
        self.by_stage.get(&stage).copied()
    }
}

/// Resolves the job's stages and their deadlines.
///
/// Explicit per-stage deadlines on the job take precedence over the
/// allocated ones.
#[must_use]
pub fn plan_stage_schedule(job: &Job, policy: StagePolicy) -> StageSchedule {
    let stages = policy.stages_for(job.job_type());
    allocate_stage_deadlines(stages, job.created_at(), job.delivery_deadline())
        .with_overrides(job.stage_deadlines())
}

/// Materialises one pending, unassigned task per scheduled stage.
///
/// Sequence numbers follow stage order starting at 1. A stage listed twice
/// produces a single task. An empty stage list produces no tasks.
#[must_use]
pub fn generate_tasks(
    job: &Job,
    schedule: &StageSchedule,
    departments: &DepartmentDirectory,
    clock: &impl Clock,
) -> Vec<Task> {
    let mut seen = BTreeSet::new();
    schedule
        .entries()
        .iter()
        .filter(|entry| seen.insert(entry.stage))
        .enumerate()
        .map(|(index, entry)| {
            let blueprint = TaskBlueprint {
                job_id: job.id(),
                sequence: TaskSequence::from_position(index),
                stage: entry.stage,
                department: departments.department_for(entry.stage),
                deadline: entry.deadline,
            };
            Task::from_blueprint(blueprint, clock)
        })
        .collect()
}
