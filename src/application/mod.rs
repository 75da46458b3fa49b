//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (submit a step, record an expert verdict) are kept apart from
//! queries (list tools, inspect an investigation).

pub mod handlers;

pub use handlers::workflow::{
    CallToolCommand, CallToolHandler, CallToolResponse, GetInvestigationHandler,
    GetInvestigationQuery, ListToolsHandler, ResolveExpertCommand, ResolveExpertHandler,
    SubmitStepCommand, SubmitStepHandler,
};
