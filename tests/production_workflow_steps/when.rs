//! When steps for production workflow BDD scenarios.

use std::sync::Arc;

use super::world::{PrintflowWorld, run_async};
use crate::test_helpers::{FixedClock, parse_midnight};
use eyre::WrapErr;
use printflow::{
    analytics::{ReportingService, RiskPolicy},
    workflow::services::CreateJobRequest,
};
use rstest_bdd_macros::when;

#[when(r#"a "{job_type}" job due "{date}" is created"#)]
fn job_is_created(
    world: &mut PrintflowWorld,
    job_type: String,
    date: String,
) -> Result<(), eyre::Report> {
    let deadline = parse_midnight(&date)?;
    match run_async(
        world
            .service()
            .create_job(CreateJobRequest::new(job_type, 250, deadline)),
    ) {
        Ok(created) => world.created = Some(created),
        Err(err) => world.creation_error = Some(err),
    }
    Ok(())
}

#[when("tasks are generated again for the job")]
fn tasks_generated_again(world: &mut PrintflowWorld) -> Result<(), eyre::Report> {
    let job = world.created()?.job.clone();
    let tasks = run_async(world.service().generate_tasks_for_job(&job))
        .wrap_err("regenerate tasks")?;
    world.regenerated = Some(tasks);
    Ok(())
}

#[when(r#"the report is generated on "{date}""#)]
fn report_generated(world: &mut PrintflowWorld, date: String) -> Result<(), eyre::Report> {
    let reporting = ReportingService::new(
        Arc::clone(&world.store),
        Arc::new(FixedClock(parse_midnight(&date)?)),
        RiskPolicy::default(),
    );
    let report = run_async(reporting.production_report()).wrap_err("generate report")?;
    world.report = Some(report);
    Ok(())
}

#[when(r#"employee "{name}" is removed"#)]
fn employee_removed(world: &mut PrintflowWorld, name: String) -> Result<(), eyre::Report> {
    let employee_id = world.employee(&name)?.id();
    run_async(world.service().remove_employee(employee_id)).wrap_err("remove employee")?;
    Ok(())
}
