//! Workflow handlers - tool discovery, step submission and expert hand-off.

mod call_tool;
mod get_investigation;
mod list_tools;
mod resolve_expert;
mod submit_step;

pub use call_tool::{
    CallToolCommand, CallToolHandler, CallToolResponse, CollaboratorFailure, ContentBlock,
    ExpertOutcome,
};
pub use get_investigation::{GetInvestigationHandler, GetInvestigationQuery};
pub use list_tools::ListToolsHandler;
pub use resolve_expert::{ResolveExpertCommand, ResolveExpertHandler, ResolvedInvestigation};
pub use submit_step::{SubmitStepCommand, SubmitStepHandler, DEFAULT_MAX_TOTAL_STEPS};
