//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ADVISOR_ZEN` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use advisor_zen_tools::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//!
//! println!("Server running on {}", config.server.socket_addr()?);
//! # Ok(())
//! # }
//! ```

mod error;
mod evidence;
mod expert;
mod server;
mod workflow;

pub use error::{ConfigError, ValidationError};
pub use evidence::EvidenceConfig;
pub use expert::{ExpertConfig, ExpertProvider};
pub use server::{Environment, ServerConfig};
pub use workflow::WorkflowConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// service backed by the mock expert analyst.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Workflow engine settings
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// File evidence settings
    #[serde(default)]
    pub evidence: EvidenceConfig,

    /// Expert analyst settings
    #[serde(default)]
    pub expert: ExpertConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ADVISOR_ZEN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ADVISOR_ZEN__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ADVISOR_ZEN__EXPERT__PROVIDER=anthropic` -> `expert.provider = anthropic`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ADVISOR_ZEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.workflow.validate()?;
        self.evidence.validate()?;
        self.expert.validate()?;

        // An inline expert call that outlives the request leaves the caller
        // with a bare timeout after the step was already recorded.
        if self.workflow.auto_expert
            && self.workflow.expert_timeout_secs >= self.server.request_timeout_secs
        {
            return Err(ValidationError::ExpertTimeoutExceedsRequest {
                expert: self.workflow.expert_timeout_secs,
                request: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "ADVISOR_ZEN__SERVER__PORT",
        "ADVISOR_ZEN__SERVER__LOG_FORMAT",
        "ADVISOR_ZEN__WORKFLOW__AUTO_EXPERT",
        "ADVISOR_ZEN__WORKFLOW__MAX_TOTAL_STEPS",
        "ADVISOR_ZEN__EXPERT__PROVIDER",
        "ADVISOR_ZEN__EXPERT__ANTHROPIC_API_KEY",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.workflow.auto_expert);
        assert_eq!(config.expert.provider, ExpertProvider::Mock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ADVISOR_ZEN__SERVER__PORT", "9090");
        env::set_var("ADVISOR_ZEN__SERVER__LOG_FORMAT", "json");
        env::set_var("ADVISOR_ZEN__WORKFLOW__AUTO_EXPERT", "false");
        env::set_var("ADVISOR_ZEN__WORKFLOW__MAX_TOTAL_STEPS", "12");
        env::set_var("ADVISOR_ZEN__EXPERT__PROVIDER", "anthropic");
        env::set_var("ADVISOR_ZEN__EXPERT__ANTHROPIC_API_KEY", "sk-ant-xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 9090);
        assert!(config.server.json_logs());
        assert!(!config.workflow.auto_expert);
        assert_eq!(config.workflow.max_total_steps, 12);
        assert_eq!(config.expert.provider, ExpertProvider::Anthropic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_anthropic_without_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ADVISOR_ZEN__EXPERT__PROVIDER", "anthropic");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expert_timeout_must_fit_in_request_timeout() {
        let mut config = AppConfig::default();
        config.workflow.expert_timeout_secs = 30;
        config.server.request_timeout_secs = 30;
        assert_eq!(
            config.validate(),
            Err(ValidationError::ExpertTimeoutExceedsRequest {
                expert: 30,
                request: 30
            })
        );

        config.workflow.auto_expert = false;
        assert!(config.validate().is_ok());
    }
}
