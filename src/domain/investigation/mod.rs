//! Investigation module - the multi-step workflow engine.
//!
//! # Components
//!
//! - `FindingsStore` - append-only per-investigation evidence log
//! - `StepPolicy` - step index to required actions, per tool
//! - `ExpertAnalysisGate` - whether and how findings go to an expert
//! - `Investigation` - the state machine tying them together

mod aggregate;
mod confidence;
mod errors;
mod expert;
mod findings;
mod policy;
mod request;
mod status;

pub use aggregate::{Investigation, InvestigationSummary, StepOutcome};
pub use confidence::Confidence;
pub use errors::WorkflowError;
pub use expert::{
    AnalysisDimension, ChecklistGate, ExpertAnalysisDecision, ExpertAnalysisGate,
    ExpertCallPolicy, ExpertTemplate, NO_FILES_MARKER,
};
pub use findings::{step_marker, ConsolidatedFindings, FindingsStore, StepRecord};
pub use policy::{Phase, PhaseKey, PolicyError, StepPolicy, StepPolicyBuilder};
pub use request::{keys as argument_keys, ToolRequest};
pub use status::InvestigationStatus;
