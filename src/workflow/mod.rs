//! Production workflow for print jobs.
//!
//! A job moves through a fixed sequence of production stages (pre-press to
//! dispatch). When a job is created, one task per stage is generated with a
//! deadline interpolated between the creation time and the delivery
//! deadline. The module follows hexagonal architecture:
//!
//! - Domain types, deadline allocation and task generation in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;
