//! Workflow engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound accepted for `max_total_steps`.
const MAX_TOTAL_STEPS_CEILING: u32 = 1000;

/// Workflow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Invoke the expert analyst inline when an investigation finalizes
    #[serde(default = "default_auto_expert")]
    pub auto_expert: bool,

    /// Largest `total_steps` a caller may declare
    #[serde(default = "default_max_total_steps")]
    pub max_total_steps: u32,

    /// Budget for one inline expert call, retries included. Must be shorter
    /// than `server.request_timeout_secs`.
    #[serde(default = "default_expert_timeout")]
    pub expert_timeout_secs: u64,

    /// How many finished investigation ids are remembered
    #[serde(default = "default_retired_capacity")]
    pub retired_capacity: usize,
}

impl WorkflowConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_total_steps == 0 || self.max_total_steps > MAX_TOTAL_STEPS_CEILING {
            return Err(ValidationError::InvalidMaxTotalSteps {
                max: MAX_TOTAL_STEPS_CEILING,
            });
        }
        if self.expert_timeout_secs == 0 {
            return Err(ValidationError::InvalidExpertTimeout);
        }
        if self.retired_capacity == 0 {
            return Err(ValidationError::InvalidRetiredCapacity);
        }
        Ok(())
    }

    pub fn expert_timeout(&self) -> Duration {
        Duration::from_secs(self.expert_timeout_secs)
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            auto_expert: default_auto_expert(),
            max_total_steps: default_max_total_steps(),
            expert_timeout_secs: default_expert_timeout(),
            retired_capacity: default_retired_capacity(),
        }
    }
}

fn default_auto_expert() -> bool {
    true
}

fn default_max_total_steps() -> u32 {
    50
}

fn default_expert_timeout() -> u64 {
    25
}

fn default_retired_capacity() -> usize {
    10_000
}
