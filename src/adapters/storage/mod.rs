//! Storage Adapters
//!
//! Implementations of the InvestigationRepository port.
//!
//! - **InMemoryInvestigationRepository** - Process-local map of live investigations

mod in_memory_investigation_repository;

pub use in_memory_investigation_repository::{
    InMemoryInvestigationRepository, DEFAULT_RETIRED_CAPACITY,
};
