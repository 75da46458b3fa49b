//! Data transfer objects for workflow HTTP endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::tools::ToolListing;

// ═══════════════════════════════════════════════════════════════════════════
// Request DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Expert verdict reported by a caller that ran the analysis itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertResultRequest {
    pub verdict: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Response for tool discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResponse {
    pub count: usize,
    pub tools: Vec<ToolListing>,
}

impl From<Vec<ToolListing>> for ListToolsResponse {
    fn from(tools: Vec<ToolListing>) -> Self {
        Self {
            count: tools.len(),
            tools,
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub tools: usize,
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (field name, tool, continuation id).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        Self {
            code: err.code,
            message: err.message,
            details: err.details.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serializes_code_and_details() {
        let err = DomainError::validation("prompt", "Field 'prompt' is required");

        let json = serde_json::to_value(ErrorResponse::from(err)).unwrap();

        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["details"]["field"], "prompt");
    }

    #[test]
    fn error_response_omits_empty_details() {
        let err = DomainError::new(ErrorCode::InternalError, "boom");

        let json = serde_json::to_value(ErrorResponse::from(err)).unwrap();

        assert!(json.get("details").is_none());
    }
}
