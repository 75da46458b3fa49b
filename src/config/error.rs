//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Unknown log format: {0} (expected text or json)")]
    InvalidLogFormat(String),

    #[error("max_total_steps must be between 1 and {max}")]
    InvalidMaxTotalSteps { max: u32 },

    #[error("Evidence max_file_bytes must be greater than zero")]
    InvalidMaxFileBytes,

    #[error("Expert timeout must be between 1 and 600 seconds")]
    InvalidExpertTimeout,

    #[error("Expert max_retries must be at most {max}")]
    InvalidExpertRetries { max: u32 },

    #[error(
        "workflow.expert_timeout_secs ({expert}s) must be shorter than \
         server.request_timeout_secs ({request}s)"
    )]
    ExpertTimeoutExceedsRequest { expert: u64, request: u64 },

    #[error("workflow.retired_capacity must be greater than zero")]
    InvalidRetiredCapacity,

    #[error("Invalid expert base URL: {0}")]
    InvalidExpertBaseUrl(String),
}
