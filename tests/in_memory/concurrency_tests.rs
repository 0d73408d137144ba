//! Job numbering and task generation under concurrent callers.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::helpers::{opening_day, service_at, store};
use crate::test_helpers::{FixedClock, parse_midnight};
use printflow::workflow::{
    adapters::memory::InMemoryWorkflowStore,
    domain::{Job, JobSpecification, JobType},
    ports::{JobRepository, TaskRepository},
    services::CreateJobRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creations_get_distinct_job_numbers(store: Arc<InMemoryWorkflowStore>) {
    let deadline = parse_midnight("2024-01-20").expect("valid date");
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service_at(&store, opening_day());
            tokio::spawn(async move {
                service
                    .create_job(CreateJobRequest::new("Flyer", 100, deadline))
                    .await
            })
        })
        .collect();

    let mut numbers = BTreeSet::new();
    for handle in handles {
        let created = handle
            .await
            .expect("task should not panic")
            .expect("creation should succeed");
        numbers.insert(created.job.number().value());
    }

    assert_eq!(numbers, (1..=8).collect::<BTreeSet<_>>());
    assert_eq!(store.list_tasks().await.expect("list tasks").len(), 64);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_generation_stores_a_single_task_set(store: Arc<InMemoryWorkflowStore>) {
    let spec = JobSpecification::new(
        JobType::Booklet,
        400,
        parse_midnight("2024-01-09").expect("valid date"),
    )
    .expect("valid specification");
    let number = store.next_job_number().await.expect("job number");
    let job = Job::new(number, spec, &FixedClock(opening_day()));
    store.store_job(&job).await.expect("store job");

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let service = service_at(&store, opening_day());
            let job = job.clone();
            tokio::spawn(async move { service.generate_tasks_for_job(&job).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(
            handle
                .await
                .expect("task should not panic")
                .expect("generation should succeed"),
        );
    }

    let stored = store.tasks_for_job(job.id()).await.expect("stored tasks");
    assert_eq!(stored.len(), 8);
    assert!(results.iter().all(|tasks| *tasks == stored));
}
