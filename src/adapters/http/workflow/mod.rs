//! Workflow HTTP adapter - the tool-call surface over REST.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{status_for, WorkflowApiError, WorkflowAppState};
pub use routes::workflow_router;
