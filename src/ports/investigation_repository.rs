//! Investigation Repository Port - where live investigations are kept
//! between step submissions.
//!
//! The repository is only an index from continuation id to aggregate. Each
//! investigation owns its findings; the store never merges or shares them.

use async_trait::async_trait;

use crate::domain::foundation::InvestigationId;
use crate::domain::investigation::{Investigation, WorkflowError};

/// Errors from the backing store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    /// The stored copy moved on since it was read.
    #[error("investigation {id} was updated concurrently: expected step {expected}, found {actual}")]
    Conflict {
        id: InvestigationId,
        expected: u32,
        actual: String,
    },
}

impl From<RepositoryError> for WorkflowError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { .. } => WorkflowError::State(err.to_string()),
            RepositoryError::Storage(_) => WorkflowError::Internal(err.to_string()),
        }
    }
}

/// Port for keeping investigations alive across steps.
#[async_trait]
pub trait InvestigationRepository: Send + Sync {
    /// Live investigation for `id`, if any.
    async fn find(&self, id: InvestigationId) -> Result<Option<Investigation>, RepositoryError>;

    /// Inserts or replaces the investigation.
    ///
    /// The write only happens if the stored copy is still at
    /// `expected_last_step` (0: no copy may exist yet). Otherwise
    /// [`RepositoryError::Conflict`] is returned and nothing changes.
    async fn save(
        &self,
        investigation: &Investigation,
        expected_last_step: u32,
    ) -> Result<(), RepositoryError>;

    /// Discards a terminated investigation and remembers its id, so later
    /// steps on it can be told apart from steps on an id never seen.
    ///
    /// Same `expected_last_step` check as [`save`](Self::save); retiring an
    /// id twice is a conflict.
    async fn retire(
        &self,
        id: InvestigationId,
        expected_last_step: u32,
    ) -> Result<(), RepositoryError>;

    /// Whether `id` was discarded by [`retire`](Self::retire).
    async fn is_retired(&self, id: InvestigationId) -> Result<bool, RepositoryError>;

    /// Number of live investigations.
    async fn count(&self) -> Result<usize, RepositoryError>;
}
