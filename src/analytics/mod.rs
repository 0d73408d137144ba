//! Progress and risk analytics over workflow snapshots.
//!
//! Everything here is a pure function of a snapshot and an evaluation
//! instant. [`ProgressAnalyzer`] computes per-job progress, stage
//! bottlenecks, employee workloads and dashboard figures;
//! [`ReportingService`] reads the snapshot through the workflow ports and
//! bundles the results into a [`ProductionReport`].

pub mod index;
mod progress;
mod report;
mod risk;

pub use crate::config::RiskPolicy;
pub use progress::{
    Assignee, DashboardMetrics, EmployeeWorkload, FlaggedTask, JobProgress, JobReference,
    ProgressAnalyzer, StageBottleneck,
};
pub use report::{
    ProductionReport, ReportingError, ReportingResult, ReportingService, WorkflowSnapshot,
};
pub use risk::{RiskLevel, classify, percentage};

#[cfg(test)]
mod tests;
