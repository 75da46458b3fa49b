//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the workflow engine to external systems:
//! - `storage` - Investigation repository (in-memory)
//! - `evidence` - File-system evidence source
//! - `expert` - Expert analysts (Anthropic, mock)
//! - `http` - Axum tool-call surface

pub mod evidence;
pub mod expert;
pub mod http;
pub mod storage;

pub use evidence::FileEvidenceSource;
pub use expert::{AnthropicAnalystConfig, AnthropicExpertAnalyst, MockExpertAnalyst};
pub use storage::InMemoryInvestigationRepository;
