//! Tests for stage deadline allocation and schedule inspection.

use super::midnight;
use crate::workflow::domain::{
    ScheduleIssue, Stage, StageDeadline, StageSchedule, allocate_stage_deadlines,
};
use chrono::{DateTime, TimeDelta, Utc};
use rstest::rstest;
use std::collections::BTreeMap;

fn deadlines(schedule: &StageSchedule) -> Vec<DateTime<Utc>> {
    schedule.entries().iter().map(|entry| entry.deadline).collect()
}

#[rstest]
fn eight_days_over_eight_stages_gives_one_stage_per_day() {
    let created = midnight(2024, 1, 1);
    let schedule = allocate_stage_deadlines(Stage::all(), created, midnight(2024, 1, 9));

    let expected: Vec<DateTime<Utc>> = (2..=9).map(|day| midnight(2024, 1, day)).collect();
    assert_eq!(deadlines(&schedule), expected);
}

#[rstest]
fn one_day_window_puts_every_stage_on_the_delivery_day() {
    let schedule =
        allocate_stage_deadlines(Stage::all(), midnight(2024, 1, 1), midnight(2024, 1, 2));

    assert_eq!(schedule.len(), 8);
    assert!(
        deadlines(&schedule)
            .iter()
            .all(|deadline| *deadline == midnight(2024, 1, 2))
    );
}

#[rstest]
#[case(midnight(2024, 1, 1), midnight(2024, 1, 9))]
#[case(midnight(2024, 1, 1), midnight(2024, 1, 31))]
#[case(midnight(2024, 3, 10), midnight(2024, 3, 13))]
#[case(midnight(2024, 1, 1), midnight(2024, 1, 1) + TimeDelta::hours(5))]
fn deadlines_never_decrease_and_stay_after_creation(
    #[case] created: DateTime<Utc>,
    #[case] delivery: DateTime<Utc>,
) {
    let schedule = allocate_stage_deadlines(Stage::all(), created, delivery);
    let values = deadlines(&schedule);

    assert!(values.iter().all(|deadline| *deadline > created));
    assert!(values.is_sorted());
    let latest = delivery.max(created + TimeDelta::days(1));
    assert!(values.iter().all(|deadline| *deadline <= latest + TimeDelta::days(1)));
}

#[rstest]
fn deadlines_strictly_increase_when_days_outnumber_stages() {
    let schedule =
        allocate_stage_deadlines(Stage::all(), midnight(2024, 1, 1), midnight(2024, 1, 21));
    let values = deadlines(&schedule);

    assert!(values.is_sorted_by(|earlier, later| earlier < later));
    // 20 days over 8 stages: two days each.
    assert_eq!(values.last(), Some(&midnight(2024, 1, 17)));
}

#[rstest]
fn partial_days_round_up() {
    let created = midnight(2024, 1, 1);
    let delivery = created + TimeDelta::days(7) + TimeDelta::hours(1);
    let schedule = allocate_stage_deadlines(Stage::all(), created, delivery);

    assert_eq!(deadlines(&schedule).last(), Some(&midnight(2024, 1, 9)));
}

#[rstest]
fn past_delivery_deadline_is_treated_as_one_day() {
    let created = midnight(2024, 1, 5);
    let schedule = allocate_stage_deadlines(
        &[Stage::PrePress, Stage::Dispatch],
        created,
        midnight(2024, 1, 1),
    );

    assert_eq!(
        deadlines(&schedule),
        vec![midnight(2024, 1, 6), midnight(2024, 1, 6)]
    );
}

#[rstest]
fn empty_stage_list_yields_an_empty_schedule() {
    let schedule = allocate_stage_deadlines(&[], midnight(2024, 1, 1), midnight(2024, 1, 9));

    assert!(schedule.is_empty());
}

#[rstest]
fn overrides_replace_allocated_deadlines_for_their_stage_only() {
    let override_at = midnight(2024, 1, 4) + TimeDelta::hours(12);
    let overrides = BTreeMap::from([(Stage::Cutting, override_at)]);
    let schedule =
        allocate_stage_deadlines(Stage::all(), midnight(2024, 1, 1), midnight(2024, 1, 9))
            .with_overrides(&overrides);

    assert_eq!(schedule.deadline_for(Stage::Cutting), Some(override_at));
    assert_eq!(
        schedule.deadline_for(Stage::Printing),
        Some(midnight(2024, 1, 3))
    );
    assert_eq!(schedule.len(), 8);
}

#[rstest]
fn overrides_for_stages_outside_the_schedule_are_ignored() {
    let overrides = BTreeMap::from([(Stage::Binding, midnight(2024, 1, 5))]);
    let schedule = allocate_stage_deadlines(
        &[Stage::PrePress, Stage::Printing],
        midnight(2024, 1, 1),
        midnight(2024, 1, 9),
    )
    .with_overrides(&overrides);

    assert_eq!(schedule.deadline_for(Stage::Binding), None);
    assert_eq!(schedule.len(), 2);
}

#[rstest]
fn quality_issues_flag_out_of_order_and_late_overrides_without_rejecting_them() {
    let delivery = midnight(2024, 1, 9);
    let overrides = BTreeMap::from([
        (Stage::Printing, midnight(2024, 1, 8)),
        (Stage::Dispatch, midnight(2024, 1, 12)),
    ]);
    let schedule = allocate_stage_deadlines(Stage::all(), midnight(2024, 1, 1), delivery)
        .with_overrides(&overrides);

    let issues = schedule.quality_issues(delivery);

    assert_eq!(
        issues,
        vec![
            ScheduleIssue::NonMonotonic {
                stage: Stage::Cutting,
                previous: Stage::Printing,
            },
            ScheduleIssue::BeyondDelivery {
                stage: Stage::Dispatch,
            },
        ]
    );
    assert_eq!(schedule.deadline_for(Stage::Dispatch), Some(midnight(2024, 1, 12)));
}

#[rstest]
fn allocated_schedules_have_no_quality_issues() {
    let delivery = midnight(2024, 1, 9);
    let schedule = allocate_stage_deadlines(Stage::all(), midnight(2024, 1, 1), delivery);

    assert!(schedule.quality_issues(delivery).is_empty());
    assert_eq!(
        schedule.entries().first(),
        Some(&StageDeadline {
            stage: Stage::PrePress,
            deadline: midnight(2024, 1, 2),
        })
    );
}
