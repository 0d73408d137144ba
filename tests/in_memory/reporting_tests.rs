//! Production reports over a populated in-memory store.

use std::sync::Arc;

use super::helpers::{opening_day, service_at, store};
use crate::test_helpers::{FixedClock, parse_midnight};
use printflow::{
    analytics::{RiskPolicy, ReportingService},
    config::PrintflowConfig,
    workflow::{
        adapters::memory::InMemoryWorkflowStore,
        domain::Stage,
        services::{CreateJobRequest, UpdateTaskStatusRequest},
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_highlights_the_stage_holding_up_work(store: Arc<InMemoryWorkflowStore>) {
    let service = service_at(&store, opening_day());
    for job_type in ["Booklet", "Flyer", "Brochure"] {
        let created = service
            .create_job(CreateJobRequest::new(
                job_type,
                250,
                parse_midnight("2024-01-09").expect("valid date"),
            ))
            .await
            .expect("job");
        let pre_press = created.tasks.first().expect("pre-press task");
        service
            .update_task_status(UpdateTaskStatusRequest::new(pre_press.id(), "completed"))
            .await
            .expect("status update");
    }

    let reporting = ReportingService::new(
        Arc::clone(&store),
        Arc::new(FixedClock(
            parse_midnight("2024-01-03").expect("valid date") + chrono::TimeDelta::hours(6),
        )),
        RiskPolicy::default(),
    );
    let report = reporting.production_report().await.expect("report");

    let worst = report.bottlenecks.first().expect("bottleneck");
    assert_eq!(worst.stage, Stage::Printing);
    assert_eq!(worst.overdue_count, 3);
    assert_eq!(worst.affected_job_ids.len(), 3);
    assert_eq!(report.dashboard.total_tasks, 24);
    assert_eq!(report.dashboard.completed_tasks, 3);
    assert_eq!(report.dashboard.overall_progress, 13);
    assert!(
        report
            .jobs
            .iter()
            .all(|progress| progress.current_stage == Some(Stage::Printing))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_risk_window_widens_the_flagged_set(store: Arc<InMemoryWorkflowStore>) {
    let service = service_at(&store, opening_day());
    service
        .create_job(CreateJobRequest::new(
            "Booklet",
            250,
            parse_midnight("2024-01-17").expect("valid date"),
        ))
        .await
        .expect("job");
    let config = PrintflowConfig::from_json_str(r#"{"risk": {"at_risk_window_hours": 96}}"#)
        .expect("valid configuration");
    let clock = Arc::new(FixedClock(opening_day()));

    let default_report =
        ReportingService::new(Arc::clone(&store), Arc::clone(&clock), RiskPolicy::default())
            .production_report()
        .await
        .expect("report");
    let wide_report = ReportingService::new(Arc::clone(&store), clock, config.risk)
        .production_report()
        .await
        .expect("report");

    // Two days per stage: pre-press is due on the 3rd, printing on the 5th.
    assert_eq!(default_report.flagged_tasks.len(), 0);
    assert_eq!(wide_report.flagged_tasks.len(), 2);
}
