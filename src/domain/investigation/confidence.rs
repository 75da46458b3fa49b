//! Caller-asserted certainty in the current findings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How sure the caller is about what it has found so far.
///
/// Ordered from least to most certain. `Certain` ends the investigation
/// regardless of how many steps were estimated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Exploring,
    Low,
    Medium,
    High,
    Certain,
}

impl Confidence {
    /// All levels in ascending order.
    pub const ALL: [Confidence; 5] = [
        Confidence::Exploring,
        Confidence::Low,
        Confidence::Medium,
        Confidence::High,
        Confidence::Certain,
    ];

    /// Wire name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Exploring => "exploring",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::Certain => "certain",
        }
    }

    pub fn is_certain(&self) -> bool {
        *self == Confidence::Certain
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Confidence::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "confidence",
                    format!(
                        "expected one of exploring, low, medium, high, certain; got '{}'",
                        s
                    ),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Certain".parse::<Confidence>().unwrap(), Confidence::Certain);
        assert_eq!(" low ".parse::<Confidence>().unwrap(), Confidence::Low);
    }

    #[test]
    fn rejects_unknown_level() {
        let err = "very_high".parse::<Confidence>().unwrap_err();
        assert_eq!(err.field(), "confidence");
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Confidence::Exploring < Confidence::Medium);
        assert!(Confidence::High < Confidence::Certain);
    }

    #[test]
    fn defaults_to_exploring() {
        assert_eq!(Confidence::default(), Confidence::Exploring);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Confidence::Medium).unwrap(),
            "\"medium\""
        );
    }
}
