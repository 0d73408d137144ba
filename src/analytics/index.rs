//! Call-local lookup structures joining snapshot collections by identifier.
//!
//! Indexes borrow the snapshot they were built from and are dropped with
//! the computation that built them; nothing is cached between calls.

use crate::workflow::domain::{Employee, EmployeeId, Job, JobId, Task};
use std::collections::HashMap;
use std::hash::Hash;

/// Read-only index from identifier to record.
#[derive(Debug)]
pub struct RecordIndex<'a, K, V> {
    records: HashMap<K, &'a V>,
}

impl<'a, K, V> RecordIndex<'a, K, V>
where
    K: Eq + Hash,
{
    /// Indexes `records` by the key `key_of` extracts. Later duplicates win.
    #[must_use]
    pub fn build(records: impl IntoIterator<Item = &'a V>, key_of: impl Fn(&V) -> K) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (key_of(record), record))
                .collect(),
        }
    }

    /// Returns the record stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&'a V> {
        self.records.get(key).copied()
    }

    /// Returns the number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Index of jobs by identifier.
pub type JobIndex<'a> = RecordIndex<'a, JobId, Job>;

/// Index of employees by identifier.
pub type EmployeeIndex<'a> = RecordIndex<'a, EmployeeId, Employee>;

/// Builds a job index.
#[must_use]
pub fn index_jobs(jobs: &[Job]) -> JobIndex<'_> {
    RecordIndex::build(jobs, Job::id)
}

/// Builds an employee index.
#[must_use]
pub fn index_employees(employees: &[Employee]) -> EmployeeIndex<'_> {
    RecordIndex::build(employees, Employee::id)
}

/// Groups tasks by owning job, preserving input order within each group.
#[must_use]
pub fn group_tasks_by_job(tasks: &[Task]) -> HashMap<JobId, Vec<&Task>> {
    let mut grouped: HashMap<JobId, Vec<&Task>> = HashMap::new();
    for task in tasks {
        grouped.entry(task.job_id()).or_default().push(task);
    }
    grouped
}
