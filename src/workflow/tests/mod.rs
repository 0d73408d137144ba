//! Unit tests for the workflow bounded context.

mod schedule_tests;

use crate::workflow::domain::{Job, JobNumber, JobSpecification, JobType};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Midnight UTC on the given date.
pub(crate) fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid calendar date")
}

/// A job of `job_type` created at `created_at` and due at `delivery`.
pub(crate) fn job_created_at(
    job_type: JobType,
    created_at: DateTime<Utc>,
    delivery: DateTime<Utc>,
) -> Job {
    let spec = JobSpecification::new(job_type, 500, delivery).expect("valid specification");
    Job::new(
        JobNumber::new(1).expect("valid job number"),
        spec,
        &FixedClock(created_at),
    )
}
