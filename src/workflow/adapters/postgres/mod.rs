//! `PostgreSQL` adapters for workflow persistence.
//!
//! The schema lives in `migrations/`; `(job_id, sequence)` uniqueness is
//! enforced by `idx_production_tasks_job_sequence`.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresWorkflowStore, WorkflowPgPool};
