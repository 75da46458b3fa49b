//! Error types for the workflow engine

use crate::domain::foundation::{DomainError, ErrorCode, InvestigationId, ValidationError};

/// Errors surfaced to the caller of a workflow tool. None are retried.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid state: {0}")]
    State(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Investigation not found: {0}")]
    InvestigationNotFound(InvestigationId),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorkflowError {
    pub fn state(message: impl Into<String>) -> Self {
        WorkflowError::State(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::Validation(_) => ErrorCode::ValidationFailed,
            WorkflowError::State(_) => ErrorCode::InvalidState,
            WorkflowError::ToolNotFound(_) => ErrorCode::ToolNotFound,
            WorkflowError::InvestigationNotFound(_) => ErrorCode::InvestigationNotFound,
            WorkflowError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WorkflowError::ToolNotFound(_) | WorkflowError::InvestigationNotFound(_)
        )
    }
}

impl From<WorkflowError> for DomainError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(inner) => inner.into(),
            WorkflowError::ToolNotFound(ref name) => {
                DomainError::new(err.code(), err.to_string()).with_detail("tool", name.clone())
            }
            WorkflowError::InvestigationNotFound(id) => {
                DomainError::new(err.code(), err.to_string())
                    .with_detail("continuation_id", id.to_string())
            }
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_passes_message_through() {
        let err: WorkflowError = ValidationError::missing_field("prompt").into();
        assert_eq!(err.to_string(), "Field 'prompt' is required");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn state_error_has_prefix() {
        let err = WorkflowError::state("step 3 submitted before step 2");
        assert_eq!(err.to_string(), "Invalid state: step 3 submitted before step 2");
        assert_eq!(err.code(), ErrorCode::InvalidState);
    }

    #[test]
    fn not_found_kinds() {
        assert!(WorkflowError::ToolNotFound("x".to_string()).is_not_found());
        assert!(WorkflowError::InvestigationNotFound(InvestigationId::new()).is_not_found());
        assert!(!WorkflowError::state("x").is_not_found());
    }

    #[test]
    fn converts_to_domain_error_with_details() {
        let domain: DomainError = WorkflowError::ToolNotFound("nope".to_string()).into();
        assert_eq!(domain.code, ErrorCode::ToolNotFound);
        assert_eq!(domain.details.get("tool"), Some(&"nope".to_string()));
    }
}
