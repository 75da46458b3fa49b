//! HTTP handlers for workflow endpoints.
//!
//! These handlers connect Axum routes to the workflow command/query handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::application::handlers::workflow::{
    CallToolCommand, CallToolHandler, GetInvestigationHandler, GetInvestigationQuery,
    ListToolsHandler, ResolveExpertCommand, ResolveExpertHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, InvestigationId, ValidationError};
use crate::domain::investigation::WorkflowError;

use super::dto::{ErrorResponse, ExpertResultRequest, HealthResponse, ListToolsResponse};

// ════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════

/// Shared handler state, cloned per request.
#[derive(Clone)]
pub struct WorkflowAppState {
    pub list_tools: Arc<ListToolsHandler>,
    pub call_tool: Arc<CallToolHandler>,
    pub resolve_expert: Arc<ResolveExpertHandler>,
    pub get_investigation: Arc<GetInvestigationHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /tools - List registered tools with their input schemas
pub async fn list_tools(State(state): State<WorkflowAppState>) -> impl IntoResponse {
    Json(ListToolsResponse::from(state.list_tools.handle()))
}

/// POST /tools/:name/call - Submit one step of a tool's investigation
///
/// The body is the raw argument mapping.
pub async fn call_tool(
    State(state): State<WorkflowAppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, WorkflowApiError> {
    let Value::Object(arguments) = body else {
        return Err(
            ValidationError::invalid_format("arguments", "request body must be a JSON object")
                .into(),
        );
    };

    let response = state
        .call_tool
        .handle(CallToolCommand {
            tool_name: name,
            arguments,
        })
        .await?;

    Ok(Json(response))
}

/// GET /investigations/:id - Inspect a live investigation
pub async fn get_investigation(
    State(state): State<WorkflowAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, WorkflowApiError> {
    let investigation_id = parse_id(&id)?;

    let summary = state
        .get_investigation
        .handle(GetInvestigationQuery { investigation_id })
        .await?;

    Ok(Json(summary))
}

/// POST /investigations/:id/expert-result - Record an externally obtained verdict
pub async fn submit_expert_result(
    State(state): State<WorkflowAppState>,
    Path(id): Path<String>,
    Json(req): Json<ExpertResultRequest>,
) -> Result<impl IntoResponse, WorkflowApiError> {
    let investigation_id = parse_id(&id)?;

    let resolved = state
        .resolve_expert
        .handle(ResolveExpertCommand {
            investigation_id,
            verdict: req.verdict,
        })
        .await?;

    Ok(Json(resolved))
}

/// GET /health - Liveness check
pub async fn health(State(state): State<WorkflowAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        tools: state.list_tools.handle().len(),
    })
}

fn parse_id(raw: &str) -> Result<InvestigationId, WorkflowApiError> {
    raw.parse::<InvestigationId>().map_err(|_| {
        ValidationError::invalid_format("continuation_id", "must be a UUID").into()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════

/// API error type that converts workflow errors to HTTP responses.
#[derive(Debug)]
pub struct WorkflowApiError(WorkflowError);

impl From<WorkflowError> for WorkflowApiError {
    fn from(err: WorkflowError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for WorkflowApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

/// Status code for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::ToolNotFound | ErrorCode::InvestigationNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidState => StatusCode::CONFLICT,
        ErrorCode::ExpertAnalysisFailed | ErrorCode::EvidenceUnavailable => {
            StatusCode::BAD_GATEWAY
        }
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for WorkflowApiError {
    fn into_response(self) -> Response {
        let domain: DomainError = self.0.into();
        let status = status_for(domain.code);

        if status.is_server_error() {
            tracing::error!(code = %domain.code, message = %domain.message, "Request failed");
        } else {
            tracing::debug!(code = %domain.code, message = %domain.message, "Request rejected");
        }

        (status, Json(ErrorResponse::from(domain))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_codes() {
        assert_eq!(status_for(ErrorCode::ValidationFailed), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::ToolNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::InvestigationNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::InvalidState), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorCode::ExpertAnalysisFailed), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorCode::InternalError), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn state_error_becomes_conflict() {
        let response = WorkflowApiError::from(WorkflowError::state("late step")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn bad_id_is_validation_error() {
        let err = parse_id("not-a-uuid").unwrap_err();
        assert!(matches!(err.0, WorkflowError::Validation(_)));
    }
}
