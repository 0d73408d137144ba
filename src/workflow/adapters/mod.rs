//! Adapter implementations for the workflow ports.

pub mod memory;
pub mod postgres;
