//! Then steps for production workflow BDD scenarios.

use super::world::PrintflowWorld;
use crate::test_helpers::parse_midnight;
use printflow::{
    analytics::{Assignee, RiskLevel},
    workflow::{
        domain::{Stage, Task, WorkflowDomainError},
        services::WorkflowServiceError,
    },
};
use rstest_bdd_macros::then;

fn task_at(world: &PrintflowWorld, sequence: u32) -> Result<&Task, eyre::Report> {
    world
        .created()?
        .tasks
        .iter()
        .find(|task| task.sequence().value() == sequence)
        .ok_or_else(|| eyre::eyre!("no task with sequence {sequence}"))
}

fn flagged_risk(world: &PrintflowWorld, sequence: u32) -> Result<RiskLevel, eyre::Report> {
    let task_id = task_at(world, sequence)?.id();
    world
        .report()?
        .flagged_tasks
        .iter()
        .find(|entry| entry.task_id == task_id)
        .map(|entry| entry.risk)
        .ok_or_else(|| eyre::eyre!("task {sequence} is not flagged"))
}

#[then("{count:usize} tasks are generated")]
fn tasks_generated(world: &PrintflowWorld, count: usize) -> Result<(), eyre::Report> {
    let generated = world.created()?.tasks.len();
    eyre::ensure!(generated == count, "expected {count} tasks, found {generated}");
    Ok(())
}

#[then(r#"task {sequence:u32} is due "{date}""#)]
fn task_is_due(world: &PrintflowWorld, sequence: u32, date: String) -> Result<(), eyre::Report> {
    let expected = parse_midnight(&date)?;
    let deadline = task_at(world, sequence)?.deadline();
    eyre::ensure!(
        deadline == expected,
        "task {sequence} is due {deadline}, expected {expected}"
    );
    Ok(())
}

#[then(r#"every task is due "{date}""#)]
fn every_task_is_due(world: &PrintflowWorld, date: String) -> Result<(), eyre::Report> {
    let expected = parse_midnight(&date)?;
    let tasks = &world.created()?.tasks;
    eyre::ensure!(
        tasks.iter().all(|task| task.deadline() == expected),
        "not every task is due {expected}"
    );
    Ok(())
}

#[then("the regenerated tasks match the original tasks")]
fn regenerated_tasks_match(world: &PrintflowWorld) -> Result<(), eyre::Report> {
    let regenerated = world
        .regenerated
        .as_ref()
        .ok_or_else(|| eyre::eyre!("tasks were not regenerated"))?;
    eyre::ensure!(
        *regenerated == world.created()?.tasks,
        "regeneration produced a different task set"
    );
    Ok(())
}

#[then("job creation fails with a deadline error")]
fn creation_fails_with_deadline_error(world: &PrintflowWorld) -> Result<(), eyre::Report> {
    let error = world
        .creation_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("job creation did not fail"))?;
    if !matches!(
        error,
        WorkflowServiceError::Domain(WorkflowDomainError::DeliveryDeadlineNotInFuture { .. })
    ) {
        return Err(eyre::eyre!("expected a deadline error, got {error:?}"));
    }
    Ok(())
}

#[then("the job is {percent:u8} percent complete")]
fn job_percent_complete(world: &PrintflowWorld, percent: u8) -> Result<(), eyre::Report> {
    let progress = world
        .report()?
        .jobs
        .first()
        .ok_or_else(|| eyre::eyre!("report has no jobs"))?;
    eyre::ensure!(
        progress.percent == percent,
        "expected {percent}%, found {}%",
        progress.percent
    );
    Ok(())
}

#[then(r#"the current stage is "{stage}""#)]
fn current_stage_is(world: &PrintflowWorld, stage: String) -> Result<(), eyre::Report> {
    let expected = Stage::try_from(stage.as_str())
        .map_err(|err| eyre::eyre!("invalid expected stage in scenario: {err}"))?;
    let progress = world
        .report()?
        .jobs
        .first()
        .ok_or_else(|| eyre::eyre!("report has no jobs"))?;
    eyre::ensure!(
        progress.current_stage == Some(expected),
        "expected current stage {expected}, found {:?}",
        progress.current_stage
    );
    Ok(())
}

#[then("task {sequence:u32} is overdue and not at risk")]
fn task_is_overdue(world: &PrintflowWorld, sequence: u32) -> Result<(), eyre::Report> {
    let risk = flagged_risk(world, sequence)?;
    eyre::ensure!(
        risk.is_overdue() && !risk.is_at_risk(),
        "task {sequence} is {risk:?}"
    );
    Ok(())
}

#[then("task {sequence:u32} is at risk")]
fn task_is_at_risk(world: &PrintflowWorld, sequence: u32) -> Result<(), eyre::Report> {
    let risk = flagged_risk(world, sequence)?;
    eyre::ensure!(risk == RiskLevel::AtRisk, "task {sequence} is {risk:?}");
    Ok(())
}

#[then(r#""{name}" has an efficiency of {percent:u8} percent with {overdue:usize} overdue tasks"#)]
fn employee_efficiency(
    world: &PrintflowWorld,
    name: String,
    percent: u8,
    overdue: usize,
) -> Result<(), eyre::Report> {
    let workload = world
        .report()?
        .workloads
        .iter()
        .find(|workload| workload.employee_name == name)
        .ok_or_else(|| eyre::eyre!("no workload for {name}"))?;
    eyre::ensure!(
        workload.efficiency_percent == percent && workload.overdue_tasks == overdue,
        "{name}: efficiency {}%, {} overdue",
        workload.efficiency_percent,
        workload.overdue_tasks
    );
    Ok(())
}

#[then("no flagged task is assigned")]
fn no_flagged_task_assigned(world: &PrintflowWorld) -> Result<(), eyre::Report> {
    let flagged = &world.report()?.flagged_tasks;
    eyre::ensure!(!flagged.is_empty(), "expected flagged tasks");
    eyre::ensure!(
        flagged
            .iter()
            .all(|entry| entry.assignee == Assignee::Unassigned),
        "a flagged task is still assigned"
    );
    Ok(())
}
