//! Evidence Source Port - reads the files a step refers to.
//!
//! Unreadable paths are not errors for the workflow: they come back as
//! [`RetrievalFailure`]s and are turned into warning lines on the step's
//! findings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text content of one retrieved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceDocument {
    pub path: String,
    pub content: String,
    /// Content was cut at the configured size limit.
    pub truncated: bool,
}

/// A path that could not be read, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalFailure {
    pub path: String,
    pub reason: String,
}

impl RetrievalFailure {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Line appended to the step's findings.
    pub fn warning(&self) -> String {
        format!("Warning: could not retrieve {}: {}", self.path, self.reason)
    }
}

/// Everything a fetch produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    pub documents: Vec<EvidenceDocument>,
    pub failures: Vec<RetrievalFailure>,
}

impl EvidenceBundle {
    /// Bundle in which every path failed for the same reason.
    pub fn all_failed(paths: &[String], reason: &str) -> Self {
        Self {
            documents: Vec::new(),
            failures: paths
                .iter()
                .map(|p| RetrievalFailure::new(p.clone(), reason))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.failures.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.failures.iter().map(RetrievalFailure::warning).collect()
    }

    pub fn merge(&mut self, other: EvidenceBundle) {
        self.documents.extend(other.documents);
        self.failures.extend(other.failures);
    }
}

/// Errors that make the whole source unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvidenceError {
    #[error("Evidence root unavailable: {0}")]
    RootUnavailable(String),

    #[error("Evidence IO error: {0}")]
    Io(String),
}

/// Port for reading evidence files.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Reads every path, reporting per-path failures in the bundle.
    async fn fetch(&self, paths: &[String]) -> Result<EvidenceBundle, EvidenceError>;
}
