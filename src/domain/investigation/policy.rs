//! Step Policy
//!
//! Static, per-tool table mapping a step index to the actions the caller
//! must perform in that phase. Steps past the enumerated phases fall through
//! to a required catch-all entry, so investigations can run longer than
//! first estimated.

use serde::{Deserialize, Serialize};

/// Which steps a phase applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKey {
    Step(u32),
    Default,
}

/// One row of a step policy table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub key: PhaseKey,
    pub actions: Vec<String>,
}

/// Errors raised while assembling a policy table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("Step policy has no default phase")]
    MissingDefault,

    #[error("Step policy declares step {0} more than once")]
    DuplicateStep(u32),

    #[error("Step indices start at 1")]
    ZeroStep,

    #[error("Phase {0:?} has no actions")]
    EmptyPhase(PhaseKey),
}

/// Ordered phase table with a catch-all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPolicy {
    phases: Vec<Phase>,
    fallback: Phase,
}

impl StepPolicy {
    pub fn builder() -> StepPolicyBuilder {
        StepPolicyBuilder::default()
    }

    /// Policy whose phases apply to steps 1, 2, ... in the order given.
    pub fn sequential<P, A, S, F, T>(phases: P, fallback: F) -> Self
    where
        P: IntoIterator<Item = A>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
        F: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let phases = phases
            .into_iter()
            .zip(1u32..)
            .map(|(actions, step)| Phase {
                key: PhaseKey::Step(step),
                actions: actions.into_iter().map(Into::into).collect(),
            })
            .collect();

        Self {
            phases,
            fallback: Phase {
                key: PhaseKey::Default,
                actions: fallback.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Actions required for `step_number`.
    ///
    /// The step is clamped to `total_steps` first; anything not listed
    /// explicitly gets the default phase. Neither confidence nor findings
    /// influence the result.
    pub fn required_actions(&self, step_number: u32, total_steps: u32) -> &[String] {
        let step = step_number.min(total_steps.max(1));
        self.phases
            .iter()
            .find(|phase| phase.key == PhaseKey::Step(step))
            .unwrap_or(&self.fallback)
            .actions
            .as_slice()
    }

    /// Number of explicitly enumerated phases.
    pub fn declared_steps(&self) -> u32 {
        self.phases.len() as u32
    }

    /// Explicit phases in step order, then the default phase.
    pub fn phases(&self) -> impl Iterator<Item = &Phase> {
        self.phases.iter().chain(std::iter::once(&self.fallback))
    }
}

/// Builder for [`StepPolicy`].
#[derive(Debug, Default)]
pub struct StepPolicyBuilder {
    phases: Vec<Phase>,
    fallback: Option<Vec<String>>,
}

impl StepPolicyBuilder {
    /// Adds the phase for one step index.
    pub fn phase<I, S>(mut self, step: u32, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phases.push(Phase {
            key: PhaseKey::Step(step),
            actions: actions.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Sets the catch-all phase.
    pub fn fallback<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(mut self) -> Result<StepPolicy, PolicyError> {
        let fallback = self.fallback.ok_or(PolicyError::MissingDefault)?;
        if fallback.is_empty() {
            return Err(PolicyError::EmptyPhase(PhaseKey::Default));
        }

        self.phases.sort_by_key(|phase| match phase.key {
            PhaseKey::Step(n) => n,
            PhaseKey::Default => u32::MAX,
        });

        let mut previous = None;
        for phase in &self.phases {
            if let PhaseKey::Step(n) = phase.key {
                if n == 0 {
                    return Err(PolicyError::ZeroStep);
                }
                if previous == Some(n) {
                    return Err(PolicyError::DuplicateStep(n));
                }
                previous = Some(n);
            }
            if phase.actions.is_empty() {
                return Err(PolicyError::EmptyPhase(phase.key));
            }
        }

        Ok(StepPolicy {
            phases: self.phases,
            fallback: Phase {
                key: PhaseKey::Default,
                actions: fallback,
            },
        })
    }
}
