//! Expert Analyst Port - the external judgement at the end of an investigation.
//!
//! The analyst receives the rendered expert context (plus any retrieved file
//! contents) and returns free text. No structure is expected from it.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoAnalyst;
//!
//! #[async_trait]
//! impl ExpertAnalyst for EchoAnalyst {
//!     async fn analyze(&self, request: ExpertRequest) -> Result<ExpertVerdict, ExpertAnalysisError> {
//!         Ok(ExpertVerdict::new(request.rendered_context, "echo"))
//!     }
//!
//!     fn analyst_name(&self) -> &str {
//!         "echo"
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::InvestigationId;

use super::EvidenceDocument;

/// Input for one expert call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertRequest {
    pub investigation_id: InvestigationId,
    pub tool: String,
    /// Output of the tool's expert gate, unchanged.
    pub rendered_context: String,
    /// File contents retrieved during the investigation.
    pub evidence: Vec<EvidenceDocument>,
}

impl ExpertRequest {
    pub fn new(
        investigation_id: InvestigationId,
        tool: impl Into<String>,
        rendered_context: impl Into<String>,
    ) -> Self {
        Self {
            investigation_id,
            tool: tool.into(),
            rendered_context: rendered_context.into(),
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Vec<EvidenceDocument>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Full text sent to the analyst: the rendered context followed by an
    /// appendix with each evidence file.
    pub fn prompt(&self) -> String {
        if self.evidence.is_empty() {
            return self.rendered_context.clone();
        }

        let mut out = self.rendered_context.trim_end().to_string();
        out.push_str("\n\nATTACHED EVIDENCE:\n");
        for doc in &self.evidence {
            out.push_str(&format!("\n=== {} ===\n", doc.path));
            out.push_str(&doc.content);
            if doc.truncated {
                out.push_str("\n[truncated]");
            }
            out.push('\n');
        }
        out
    }
}

/// Free-text answer from the analyst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertVerdict {
    pub text: String,
    /// Which analyst produced it, e.g. the model name.
    pub analyst: String,
}

impl ExpertVerdict {
    pub fn new(text: impl Into<String>, analyst: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            analyst: analyst.into(),
        }
    }
}

/// Errors from an expert call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpertAnalysisError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("analyst unavailable: {0}")]
    Unavailable(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ExpertAnalysisError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if calling again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExpertAnalysisError::RateLimited { .. }
                | ExpertAnalysisError::Unavailable(_)
                | ExpertAnalysisError::Network(_)
                | ExpertAnalysisError::Timeout { .. }
        )
    }
}

/// Port for the expert-analysis collaborator.
#[async_trait]
pub trait ExpertAnalyst: Send + Sync {
    async fn analyze(&self, request: ExpertRequest) -> Result<ExpertVerdict, ExpertAnalysisError>;

    /// Short identifier for logs and verdicts.
    fn analyst_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_evidence_is_context() {
        let request = ExpertRequest::new(InvestigationId::new(), "t", "CONTEXT");
        assert_eq!(request.prompt(), "CONTEXT");
    }

    #[test]
    fn prompt_appends_evidence() {
        let request = ExpertRequest::new(InvestigationId::new(), "t", "CONTEXT\n").with_evidence(vec![
            EvidenceDocument {
                path: "src/tax.ts".to_string(),
                content: "export const rate = 0.2;".to_string(),
                truncated: true,
            },
        ]);

        let prompt = request.prompt();
        assert!(prompt.starts_with("CONTEXT\n\nATTACHED EVIDENCE:\n"));
        assert!(prompt.contains("=== src/tax.ts ===\nexport const rate = 0.2;\n[truncated]"));
    }

    #[test]
    fn retryable_errors() {
        assert!(ExpertAnalysisError::RateLimited { retry_after_secs: 3 }.is_retryable());
        assert!(ExpertAnalysisError::network("reset").is_retryable());
        assert!(ExpertAnalysisError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(!ExpertAnalysisError::AuthenticationFailed.is_retryable());
        assert!(!ExpertAnalysisError::parse("bad json").is_retryable());
    }
}
