//! Job and task lifecycle through the public service API.

use std::sync::Arc;

use super::helpers::{opening_day, service_at, store};
use crate::test_helpers::parse_midnight;
use printflow::workflow::{
    adapters::memory::InMemoryWorkflowStore,
    domain::{JobStatus, Stage, TaskStatus},
    ports::{JobRepository, TaskRepository},
    services::{
        AssignTaskRequest, CreateJobRequest, RegisterEmployeeRequest, UpdateTaskStatusRequest,
        WorkflowServiceError,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn job_moves_through_its_stages(store: Arc<InMemoryWorkflowStore>) {
    let service = service_at(&store, opening_day());
    let created = service
        .create_job(CreateJobRequest::new(
            "Carton",
            5_000,
            parse_midnight("2024-01-15").expect("valid date"),
        ))
        .await
        .expect("job creation should succeed");

    let later = service_at(&store, parse_midnight("2024-01-03").expect("valid date"));
    for task in created.tasks.iter().take(2) {
        later
            .update_task_status(UpdateTaskStatusRequest::new(task.id(), "completed"))
            .await
            .expect("status update should succeed");
    }
    let moved = later
        .update_job_status(created.job.id(), "cutting")
        .await
        .expect("job status update should succeed");

    assert_eq!(moved.status(), JobStatus::InStage(Stage::Cutting));
    assert_eq!(moved.updated_at(), parse_midnight("2024-01-03").expect("valid date"));
    let stored = store
        .tasks_for_job(created.job.id())
        .await
        .expect("stored tasks");
    let completed = stored
        .iter()
        .filter(|task| task.status() == TaskStatus::Completed)
        .count();
    assert_eq!(completed, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassigning_a_task_clears_the_assignee(store: Arc<InMemoryWorkflowStore>) {
    let service = service_at(&store, opening_day());
    let created = service
        .create_job(CreateJobRequest::new(
            "Poster",
            20,
            parse_midnight("2024-01-05").expect("valid date"),
        ))
        .await
        .expect("job");
    let employee = service
        .register_employee(RegisterEmployeeRequest::new("Sam", "supervisor"))
        .await
        .expect("employee");
    let task_id = created.tasks.first().map(|task| task.id()).expect("task");

    service
        .assign_task(AssignTaskRequest::assign(task_id, employee.id()))
        .await
        .expect("assignment");
    let cleared = service
        .assign_task(AssignTaskRequest::unassign(task_id))
        .await
        .expect("unassignment");

    assert_eq!(cleared.assignee(), None);
    let stored = store.find_task(task_id).await.expect("lookup").expect("task");
    assert_eq!(stored.assignee(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_jobs_take_their_tasks_with_them(store: Arc<InMemoryWorkflowStore>) {
    let service = service_at(&store, opening_day());
    let keep = service
        .create_job(CreateJobRequest::new(
            "Flyer",
            10,
            parse_midnight("2024-01-09").expect("valid date"),
        ))
        .await
        .expect("job");
    let discarded = service
        .create_job(CreateJobRequest::new(
            "Brochure",
            10,
            parse_midnight("2024-01-09").expect("valid date"),
        ))
        .await
        .expect("job");

    service.delete_job(discarded.job.id()).await.expect("delete");

    let jobs = store.list_jobs().await.expect("jobs");
    assert_eq!(jobs.len(), 1);
    let tasks = store.list_tasks().await.expect("tasks");
    assert!(tasks.iter().all(|task| task.job_id() == keep.job.id()));
    assert!(matches!(
        service.delete_job(discarded.job.id()).await,
        Err(WorkflowServiceError::UnknownJob(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_department_names_are_rejected(store: Arc<InMemoryWorkflowStore>) {
    let service = service_at(&store, opening_day());
    service
        .register_department("Binding")
        .await
        .expect("department");

    let result = service.register_department("binding").await;

    assert!(matches!(result, Err(WorkflowServiceError::Repository(_))));
}
