//! Fixtures shared by the in-memory integration tests.

use std::sync::Arc;

use crate::test_helpers::{FixedClock, parse_midnight};
use printflow::workflow::{adapters::memory::InMemoryWorkflowStore, services::WorkflowService};
use rstest::fixture;

/// Service type used by the in-memory tests.
pub type TestService = WorkflowService<InMemoryWorkflowStore, FixedClock>;

/// Creation instant used by the in-memory tests.
///
/// # Panics
///
/// Panics if the hard-coded date fails to parse.
#[must_use]
pub fn opening_day() -> chrono::DateTime<chrono::Utc> {
    parse_midnight("2024-01-01").expect("valid date")
}

/// Shared store backing every service built by a test.
#[fixture]
pub fn store() -> Arc<InMemoryWorkflowStore> {
    Arc::new(InMemoryWorkflowStore::new())
}

/// Builds a workflow service over `store` with the clock at `now`.
#[must_use]
pub fn service_at(
    store: &Arc<InMemoryWorkflowStore>,
    now: chrono::DateTime<chrono::Utc>,
) -> TestService {
    WorkflowService::new(Arc::clone(store), Arc::new(FixedClock(now)))
}
