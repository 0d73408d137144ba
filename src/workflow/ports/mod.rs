//! Port contracts for the production workflow.
//!
//! Ports define infrastructure-agnostic interfaces used by workflow and
//! reporting services.

pub mod repository;

pub use repository::{
    JobRepository, StaffRepository, TaskRepository, WorkflowRepositoryError,
    WorkflowRepositoryResult,
};
