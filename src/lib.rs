//! Advisor Zen Tools - guided multi-step investigations
//!
//! This crate runs stateful investigation workflows (tax calculation review,
//! financial compliance audit, multi-tenant security check) that walk a
//! caller through declared phases, consolidate findings across steps, and
//! hand the result to an expert analyst.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
