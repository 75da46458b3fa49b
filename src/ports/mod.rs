//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the workflow engine and the outside world. Adapters implement these ports.
//!
//! - `InvestigationRepository` - Live investigations keyed by continuation id
//! - `EvidenceSource` - Retrieves the files a step refers to
//! - `ExpertAnalyst` - The external judgement that closes an investigation

mod evidence_source;
mod expert_analyst;
mod investigation_repository;

pub use evidence_source::{
    EvidenceBundle, EvidenceDocument, EvidenceError, EvidenceSource, RetrievalFailure,
};
pub use expert_analyst::{ExpertAnalysisError, ExpertAnalyst, ExpertRequest, ExpertVerdict};
pub use investigation_repository::{InvestigationRepository, RepositoryError};
