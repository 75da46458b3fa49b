//! Axum router configuration for workflow endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    call_tool, get_investigation, health, list_tools, submit_expert_result, WorkflowAppState,
};

/// Create the workflow API router.
///
/// # Routes
///
/// - `GET /tools` - List tools with input schemas
/// - `POST /tools/:name/call` - Submit one step
/// - `GET /investigations/:id` - Inspect a live investigation
/// - `POST /investigations/:id/expert-result` - Report an expert verdict
/// - `GET /health` - Liveness check
pub fn workflow_router(state: WorkflowAppState) -> Router {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/:name/call", post(call_tool))
        .route("/investigations/:id", get(get_investigation))
        .route("/investigations/:id/expert-result", post(submit_expert_result))
        .route("/health", get(health))
        .with_state(state)
}
