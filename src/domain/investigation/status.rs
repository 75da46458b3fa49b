//! Investigation lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an investigation is in its lifecycle.
///
/// ```text
/// InProgress --step--> InProgress
/// InProgress --finalize--> Complete | AwaitingExpert
/// AwaitingExpert --expert result--> Complete
/// ```
///
/// Both `Complete` and `AwaitingExpert` refuse further steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationStatus {
    InProgress,
    AwaitingExpert,
    Complete,
}

impl InvestigationStatus {
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use InvestigationStatus::*;
        matches!(
            (self, target),
            (InProgress, InProgress)
                | (InProgress, AwaitingExpert)
                | (InProgress, Complete)
                | (AwaitingExpert, Complete)
        )
    }

    pub fn valid_transitions(&self) -> Vec<Self> {
        use InvestigationStatus::*;
        match self {
            InProgress => vec![InProgress, AwaitingExpert, Complete],
            AwaitingExpert => vec![Complete],
            Complete => vec![],
        }
    }

    /// Returns the target if the move is legal.
    pub fn transition_to(&self, target: Self) -> Option<Self> {
        self.can_transition_to(&target).then_some(target)
    }

    /// Whether step submissions are still accepted.
    pub fn accepts_steps(&self) -> bool {
        *self == InvestigationStatus::InProgress
    }

    pub fn is_terminal(&self) -> bool {
        !self.accepts_steps()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestigationStatus::InProgress => "in_progress",
            InvestigationStatus::AwaitingExpert => "awaiting_expert",
            InvestigationStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
