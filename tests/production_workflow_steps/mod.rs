//! Step definitions shared by the job scheduling and production tracking
//! features.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
