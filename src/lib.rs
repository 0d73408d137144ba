//! Printflow: production workflow tracking for a print shop.
//!
//! Jobs pass through a fixed sequence of production stages. Creating a job
//! allocates a deadline to every stage between its creation time and its
//! delivery deadline and generates one task per stage; analytics then
//! report progress, overdue and at-risk work, bottlenecks and workloads.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over ports with an injected clock
//!
//! # Modules
//!
//! - [`workflow`]: Jobs, tasks, staff, deadline allocation and task generation
//! - [`analytics`]: Progress, risk classification and reporting
//! - [`config`]: Scheduling and risk settings

pub mod analytics;
pub mod config;
pub mod workflow;
