//! Shared world state for production workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use crate::test_helpers::FixedClock;
use chrono::{DateTime, Utc};
use printflow::{
    analytics::ProductionReport,
    workflow::{
        adapters::memory::InMemoryWorkflowStore,
        domain::{Employee, Task},
        services::{CreatedJob, WorkflowService, WorkflowServiceError},
    },
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestWorkflowService = WorkflowService<InMemoryWorkflowStore, FixedClock>;

/// Scenario world for production workflow behaviour tests.
pub struct PrintflowWorld {
    pub store: Arc<InMemoryWorkflowStore>,
    pub now: DateTime<Utc>,
    pub created: Option<CreatedJob>,
    pub creation_error: Option<WorkflowServiceError>,
    pub regenerated: Option<Vec<Task>>,
    pub employees: HashMap<String, Employee>,
    pub report: Option<ProductionReport>,
}

impl PrintflowWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryWorkflowStore::new()),
            now: DateTime::<Utc>::default(),
            created: None,
            creation_error: None,
            regenerated: None,
            employees: HashMap::new(),
            report: None,
        }
    }

    /// Returns a workflow service reading the world's clock.
    pub fn service(&self) -> TestWorkflowService {
        WorkflowService::new(Arc::clone(&self.store), Arc::new(FixedClock(self.now)))
    }

    /// Returns the job created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no job has been created.
    pub fn created(&self) -> Result<&CreatedJob, eyre::Report> {
        self.created
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created job in scenario world"))
    }

    /// Returns the report generated earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no report has been generated.
    pub fn report(&self) -> Result<&ProductionReport, eyre::Report> {
        self.report
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing report in scenario world"))
    }

    /// Looks up a registered employee by name.
    ///
    /// # Errors
    ///
    /// Returns an error when no employee with that name was registered.
    pub fn employee(&self, name: &str) -> Result<&Employee, eyre::Report> {
        self.employees
            .get(name)
            .ok_or_else(|| eyre::eyre!("employee {name} was not registered"))
    }
}

impl Default for PrintflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PrintflowWorld {
    PrintflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
