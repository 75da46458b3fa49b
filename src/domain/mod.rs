//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, error codes, validation errors)
//! - `investigation` - The workflow engine: requests, findings, step policy,
//!   expert gate and the Investigation aggregate
//! - `tools` - Tool definitions, the registry, and the built-in catalog

pub mod foundation;
pub mod investigation;
pub mod tools;
