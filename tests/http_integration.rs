//! Integration tests for the workflow HTTP endpoints.
//!
//! Requests go through the real axum router via `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::timeout::TimeoutLayer;

use advisor_zen_tools::adapters::http::{workflow_router, WorkflowAppState};
use advisor_zen_tools::adapters::{InMemoryInvestigationRepository, MockExpertAnalyst};
use advisor_zen_tools::application::handlers::workflow::{
    CallToolHandler, GetInvestigationHandler, ListToolsHandler, ResolveExpertHandler,
    SubmitStepHandler,
};
use advisor_zen_tools::domain::tools::catalog;
use advisor_zen_tools::ports::ExpertAnalysisError;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(analyst: Option<MockExpertAnalyst>) -> Router {
    app_with_expert_timeout(analyst, None)
}

fn app_with_expert_timeout(
    analyst: Option<MockExpertAnalyst>,
    expert_timeout: Option<Duration>,
) -> Router {
    let registry = Arc::new(catalog::default_registry());
    let repo = Arc::new(InMemoryInvestigationRepository::new());
    let submit = Arc::new(SubmitStepHandler::new(registry.clone(), repo.clone()));
    let resolve = Arc::new(ResolveExpertHandler::new(repo.clone()));

    let mut call_tool = CallToolHandler::new(registry.clone(), submit, resolve.clone());
    if let Some(analyst) = analyst {
        call_tool = call_tool.with_auto_expert(Arc::new(analyst));
    }
    if let Some(timeout) = expert_timeout {
        call_tool = call_tool.with_expert_timeout(timeout);
    }

    workflow_router(WorkflowAppState {
        list_tools: Arc::new(ListToolsHandler::new(registry)),
        call_tool: Arc::new(call_tool),
        resolve_expert: resolve,
        get_investigation: Arc::new(GetInvestigationHandler::new(repo)),
    })
}

fn app() -> Router {
    app_with(None)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn lists_tools_with_schemas() {
    let app = app();

    let (status, body) = send(&app, "GET", "/tools", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["tools"][0]["name"], "tax-calculation-review");
    assert_eq!(body["tools"][0]["input_schema"]["required"], json!(["prompt"]));
}

#[tokio::test]
async fn health_reports_tool_count() {
    let (status, body) = send(&app(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["tools"], 3);
}

#[tokio::test]
async fn call_then_inspect_then_report_verdict() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/tools/financial-compliance-audit/call",
        Some(json!({ "prompt": "Audit revenue recognition", "total_steps": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "AWAITING_NEXT_STEP");
    assert_eq!(body["content"][0]["type"], "text");
    let id = body["outcome"]["investigation_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/tools/financial-compliance-audit/call",
        Some(json!({
            "prompt": "Audit revenue recognition",
            "step_number": 2,
            "total_steps": 2,
            "findings": "Controls documented",
            "continuation_id": id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "AWAITING_EXPERT");

    let (status, body) = send(&app, "GET", &format!("/investigations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "awaiting_expert");
    assert_eq!(body["last_step"], 2);
    assert!(body["rendered_context"]
        .as_str()
        .unwrap()
        .contains("Controls documented"));

    let (status, body) = send(
        &app,
        "POST",
        &format!("/investigations/{}/expert-result", id),
        Some(json!({ "verdict": "SOX controls adequate" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verdict"], "SOX controls adequate");

    let (status, body) = send(&app, "GET", &format!("/investigations/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "INVESTIGATION_NOT_FOUND");
}

#[tokio::test]
async fn missing_prompt_is_bad_request() {
    let (status, body) = send(
        &app(),
        "POST",
        "/tools/tax-calculation-review/call",
        Some(json!({ "step_number": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "prompt");
}

#[tokio::test]
async fn non_object_body_is_bad_request() {
    let (status, _) = send(
        &app(),
        "POST",
        "/tools/tax-calculation-review/call",
        Some(json!(["prompt"])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_tool_is_not_found() {
    let (status, body) = send(
        &app(),
        "POST",
        "/tools/nope/call",
        Some(json!({ "prompt": "p" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TOOL_NOT_FOUND");
}

#[tokio::test]
async fn out_of_sequence_step_is_conflict() {
    let (status, body) = send(
        &app(),
        "POST",
        "/tools/multi-tenant-security-check/call",
        Some(json!({ "prompt": "p", "step_number": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn malformed_investigation_id_is_bad_request() {
    let (status, _) = send(&app(), "GET", "/investigations/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expert_failure_is_reported_in_a_successful_response() {
    let analyst =
        MockExpertAnalyst::new().with_error(ExpertAnalysisError::unavailable("maintenance"));
    let app = app_with(Some(analyst));

    let (status, body) = send(
        &app,
        "POST",
        "/tools/tax-calculation-review/call",
        Some(json!({ "prompt": "p", "confidence": "certain" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "AWAITING_EXPERT");
    assert_eq!(body["expert"]["result"], "failed");
    assert_eq!(body["expert"]["code"], "EXPERT_ANALYSIS_FAILED");
    assert_eq!(body["expert"]["retryable"], true);
}

#[tokio::test]
async fn slow_expert_times_out_inside_the_request_budget() {
    let analyst = MockExpertAnalyst::new().with_delay(Duration::from_secs(10));
    let app = app_with_expert_timeout(Some(analyst), Some(Duration::from_millis(100)))
        .layer(TimeoutLayer::new(Duration::from_secs(5)));

    let (status, body) = send(
        &app,
        "POST",
        "/tools/tax-calculation-review/call",
        Some(json!({ "prompt": "p", "confidence": "certain", "findings": "Rates checked" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expert"]["result"], "failed");
    assert_eq!(body["expert"]["retryable"], true);
    let context = body["outcome"]["rendered_context"].as_str().unwrap().to_string();
    let id = body["outcome"]["investigation_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/investigations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "awaiting_expert");
    assert_eq!(body["rendered_context"], context);
}
