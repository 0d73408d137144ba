//! In-memory adapters for the workflow ports.

mod store;

pub use store::InMemoryWorkflowStore;
