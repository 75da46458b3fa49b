//! Expert analyst configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound accepted for `max_retries`.
pub const MAX_RETRIES_CEILING: u32 = 10;

/// Expert analyst configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExpertConfig {
    /// Which analyst answers expert requests
    #[serde(default)]
    pub provider: ExpertProvider,

    /// Anthropic API key
    pub anthropic_api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// Expert analyst backend
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpertProvider {
    #[default]
    Mock,
    Anthropic,
}

impl ExpertConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate expert configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == ExpertProvider::Anthropic && !self.has_anthropic() {
            return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidExpertTimeout);
        }
        if self.max_retries > MAX_RETRIES_CEILING {
            return Err(ValidationError::InvalidExpertRetries {
                max: MAX_RETRIES_CEILING,
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidExpertBaseUrl(self.base_url.clone()));
        }
        Ok(())
    }
}

impl Default for ExpertConfig {
    fn default() -> Self {
        Self {
            provider: ExpertProvider::default(),
            anthropic_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expert_config_defaults() {
        let config = ExpertConfig::default();
        assert_eq!(config.provider, ExpertProvider::Mock);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = ExpertConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_anthropic_requires_key() {
        let config = ExpertConfig {
            provider: ExpertProvider::Anthropic,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );

        let config = ExpertConfig {
            provider: ExpertProvider::Anthropic,
            anthropic_api_key: Some(Secret::new("sk-ant-xxx".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_key_is_not_configured() {
        let config = ExpertConfig {
            anthropic_api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(!config.has_anthropic());
    }

    #[test]
    fn test_retries_are_bounded() {
        let config = ExpertConfig {
            max_retries: 70,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidExpertRetries { max: 10 })
        );
    }

    #[test]
    fn test_base_url_must_be_http() {
        let config = ExpertConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let config = ExpertConfig {
            anthropic_api_key: Some(Secret::new("sk-ant-secret".to_string())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("sk-ant-secret"));
    }
}
