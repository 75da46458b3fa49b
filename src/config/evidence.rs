//! Evidence source configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Evidence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceConfig {
    /// Directory relative file paths are resolved against
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Per-file read limit in bytes
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl EvidenceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_file_bytes == 0 {
            return Err(ValidationError::InvalidMaxFileBytes);
        }
        Ok(())
    }
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_file_bytes() -> u64 {
    256 * 1024
}
