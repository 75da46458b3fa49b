//! Tools module - workflow tool definitions and their registry.

pub mod catalog;
mod definition;
mod registry;

pub use definition::{FieldSpec, PromptContext, ToolCategory, ToolDefinition, ToolListing};
pub use registry::ToolRegistry;
