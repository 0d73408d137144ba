//! Application services for the production workflow.

mod workflow;

pub use workflow::{
    AssignTaskRequest, CreateJobRequest, CreatedJob, RegisterEmployeeRequest,
    UpdateTaskStatusRequest, WorkflowService, WorkflowServiceError, WorkflowServiceResult,
};
