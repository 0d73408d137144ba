//! Stage deadline allocation.
//!
//! Deadlines are interpolated at day granularity between the job's creation
//! time and its delivery deadline. Sub-day precision is not attempted.

use super::Stage;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Target deadline for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDeadline {
    /// Stage the deadline applies to.
    pub stage: Stage,
    /// Target completion time.
    pub deadline: DateTime<Utc>,
}

/// Data-quality finding in a stage schedule.
///
/// Explicit overrides are accepted as given, so a schedule can go backwards
/// or run past the delivery deadline. These findings make that visible
/// without rejecting the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleIssue {
    /// The stage is due before the stage preceding it.
    NonMonotonic {
        /// Stage with the earlier deadline.
        stage: Stage,
        /// Preceding stage with the later deadline.
        previous: Stage,
    },
    /// The stage is due after the job's delivery deadline.
    BeyondDelivery {
        /// Offending stage.
        stage: Stage,
    },
}

/// Ordered mapping from stage to deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageSchedule {
    entries: Vec<StageDeadline>,
}

impl StageSchedule {
    /// Replaces computed deadlines with explicit overrides where present.
    ///
    /// Overrides for stages outside the schedule are ignored.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<Stage, DateTime<Utc>>) -> Self {
        for entry in &mut self.entries {
            if let Some(deadline) = overrides.get(&entry.stage) {
                entry.deadline = *deadline;
            }
        }
        self
    }

    /// Returns the deadline for `stage`, if the stage is scheduled.
    #[must_use]
    pub fn deadline_for(&self, stage: Stage) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.deadline)
    }

    /// Returns the scheduled stages in order.
    #[must_use]
    pub fn entries(&self) -> &[StageDeadline] {
        &self.entries
    }

    /// Returns the number of scheduled stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no stage is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lists ordering and delivery-deadline violations.
    #[must_use]
    pub fn quality_issues(&self, delivery_deadline: DateTime<Utc>) -> Vec<ScheduleIssue> {
        let mut issues = Vec::new();
        let mut previous: Option<&StageDeadline> = None;
        for entry in &self.entries {
            if let Some(prior) = previous.filter(|prior| entry.deadline < prior.deadline) {
                issues.push(ScheduleIssue::NonMonotonic {
                    stage: entry.stage,
                    previous: prior.stage,
                });
            }
            if entry.deadline > delivery_deadline {
                issues.push(ScheduleIssue::BeyondDelivery { stage: entry.stage });
            }
            previous = Some(entry);
        }
        issues
    }
}

/// Allocates one deadline per stage between `created_at` and
/// `delivery_deadline`.
///
/// With `total_days = max(1, ceil(delivery_deadline - created_at))` and
/// `per_stage = max(1, floor(total_days / stages))`, the i-th stage
/// (one-based) is due `i * per_stage` days after creation, capped at
/// `total_days`. The cap only bites when there are more stages than days; the
/// trailing stages then share the final day. A delivery deadline at or before
/// the creation time is treated as one day out.
#[must_use]
pub fn allocate_stage_deadlines(
    stages: &[Stage],
    created_at: DateTime<Utc>,
    delivery_deadline: DateTime<Utc>,
) -> StageSchedule {
    let stage_count = i64::try_from(stages.len()).unwrap_or(i64::MAX);
    let total_days = whole_days_ceil(delivery_deadline - created_at).max(1);
    let per_stage_days = total_days.checked_div(stage_count).unwrap_or(1).max(1);

    let entries = stages
        .iter()
        .zip(1_i64..)
        .map(|(stage, position)| {
            let offset_days = position.saturating_mul(per_stage_days).min(total_days);
            StageDeadline {
                stage: *stage,
                deadline: add_days(created_at, offset_days),
            }
        })
        .collect();

    StageSchedule { entries }
}

/// Rounds a span up to whole days; non-positive spans yield zero.
fn whole_days_ceil(span: TimeDelta) -> i64 {
    let millis = span.num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    millis
        .saturating_add(MILLIS_PER_DAY - 1)
        .checked_div(MILLIS_PER_DAY)
        .unwrap_or(0)
}

fn add_days(start: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    TimeDelta::try_days(days)
        .and_then(|offset| start.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
