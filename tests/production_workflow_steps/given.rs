//! Given steps for production workflow BDD scenarios.

use super::world::{PrintflowWorld, run_async};
use crate::test_helpers::parse_midnight;
use eyre::WrapErr;
use printflow::workflow::services::{
    AssignTaskRequest, CreateJobRequest, RegisterEmployeeRequest, UpdateTaskStatusRequest,
};
use rstest_bdd_macros::given;

#[given(r#"the clock reads "{date}""#)]
fn clock_reads(world: &mut PrintflowWorld, date: String) -> Result<(), eyre::Report> {
    world.now = parse_midnight(&date)?;
    Ok(())
}

#[given(r#"a "{job_type}" job due "{date}" has been created"#)]
fn job_has_been_created(
    world: &mut PrintflowWorld,
    job_type: String,
    date: String,
) -> Result<(), eyre::Report> {
    let deadline = parse_midnight(&date)?;
    let created = run_async(
        world
            .service()
            .create_job(CreateJobRequest::new(job_type, 1_000, deadline)),
    )
    .wrap_err("create job for scenario setup")?;
    world.created = Some(created);
    Ok(())
}

#[given(r#"employee "{name}" is registered"#)]
fn employee_registered(world: &mut PrintflowWorld, name: String) -> Result<(), eyre::Report> {
    let employee = run_async(
        world
            .service()
            .register_employee(RegisterEmployeeRequest::new(name.clone(), "operator")),
    )
    .wrap_err("register employee")?;
    world.employees.insert(name, employee);
    Ok(())
}

#[given(r#"the first {count:usize} tasks are assigned to "{name}""#)]
fn first_tasks_assigned(
    world: &mut PrintflowWorld,
    count: usize,
    name: String,
) -> Result<(), eyre::Report> {
    let employee_id = world.employee(&name)?.id();
    let service = world.service();
    for task in world.created()?.tasks.iter().take(count) {
        run_async(service.assign_task(AssignTaskRequest::assign(task.id(), employee_id)))
            .wrap_err("assign task")?;
    }
    Ok(())
}

#[given(r#"the first {count:usize} tasks are marked "{status}""#)]
fn first_tasks_marked(
    world: &mut PrintflowWorld,
    count: usize,
    status: String,
) -> Result<(), eyre::Report> {
    let service = world.service();
    for task in world.created()?.tasks.iter().take(count) {
        run_async(
            service.update_task_status(UpdateTaskStatusRequest::new(task.id(), status.clone())),
        )
        .wrap_err("update task status")?;
    }
    Ok(())
}
