//! Investigation aggregate - the workflow state machine.
//!
//! One Investigation drives one tool invocation from step 1 to termination.
//! It owns its FindingsStore outright; nothing else ever holds a mutable
//! reference to another investigation's findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::InvestigationId;
use crate::domain::tools::ToolDefinition;

use super::{
    ConsolidatedFindings, FindingsStore, InvestigationStatus, StepRecord, ToolRequest,
    WorkflowError,
};

/// Result of one accepted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepOutcome {
    /// Investigation continues; the caller performs `required_actions` and
    /// submits `next_step_number`.
    AwaitingNextStep {
        investigation_id: InvestigationId,
        step_number: u32,
        total_steps: u32,
        next_step_number: u32,
        required_actions: Vec<String>,
        guidance: String,
    },
    /// Finalized; `rendered_context` must go to an expert before the
    /// investigation is done.
    AwaitingExpert {
        investigation_id: InvestigationId,
        rendered_context: String,
        findings: ConsolidatedFindings,
    },
    /// Finalized without expert review.
    Complete {
        investigation_id: InvestigationId,
        findings: ConsolidatedFindings,
    },
}

impl StepOutcome {
    pub fn investigation_id(&self) -> InvestigationId {
        match self {
            StepOutcome::AwaitingNextStep { investigation_id, .. }
            | StepOutcome::AwaitingExpert { investigation_id, .. }
            | StepOutcome::Complete { investigation_id, .. } => *investigation_id,
        }
    }

    /// True once no further steps will be accepted.
    pub fn is_final(&self) -> bool {
        !matches!(self, StepOutcome::AwaitingNextStep { .. })
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            StepOutcome::AwaitingNextStep { .. } => "AWAITING_NEXT_STEP",
            StepOutcome::AwaitingExpert { .. } => "AWAITING_EXPERT",
            StepOutcome::Complete { .. } => "COMPLETE",
        }
    }
}

/// The Investigation aggregate root.
#[derive(Debug, Clone)]
pub struct Investigation {
    id: InvestigationId,
    tool_name: String,
    status: InvestigationStatus,
    total_steps: u32,
    last_step: u32,
    store: FindingsStore,
    /// Context handed to the expert; kept while AWAITING_EXPERT.
    expert_context: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Investigation {
    /// Opens an investigation that has not yet received step 1.
    pub fn start(id: InvestigationId, tool_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            tool_name: tool_name.into(),
            status: InvestigationStatus::InProgress,
            total_steps: 0,
            last_step: 0,
            store: FindingsStore::new(),
            expert_context: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> InvestigationId {
        self.id
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn status(&self) -> InvestigationStatus {
        self.status
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Highest step accepted so far; 0 before step 1.
    pub fn last_step(&self) -> u32 {
        self.last_step
    }

    pub fn findings(&self) -> &ConsolidatedFindings {
        self.store.view()
    }

    /// Rendered expert context, while the verdict is outstanding.
    pub fn expert_context(&self) -> Option<&str> {
        self.expert_context.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ───────────────────────────────────────────────────────────────
    // Transitions
    // ───────────────────────────────────────────────────────────────

    /// Accepts one step report and decides what happens next.
    ///
    /// Nothing is mutated unless every check passes.
    pub fn submit_step(
        &mut self,
        request: &ToolRequest,
        tool: &ToolDefinition,
    ) -> Result<StepOutcome, WorkflowError> {
        request.validate()?;

        if tool.name() != self.tool_name {
            return Err(WorkflowError::state(format!(
                "investigation {} belongs to tool '{}', not '{}'",
                self.id,
                self.tool_name,
                tool.name()
            )));
        }

        if !self.status.accepts_steps() {
            return Err(WorkflowError::state(format!(
                "investigation {} is {} and accepts no further steps",
                self.id, self.status
            )));
        }

        let expected = self.last_step + 1;
        if request.step_number != expected {
            return Err(WorkflowError::state(format!(
                "expected step {} for investigation {}, got step {}",
                expected, self.id, request.step_number
            )));
        }

        let step = request.step_number;
        let total = if step > request.total_steps {
            tracing::info!(
                investigation_id = %self.id,
                step_number = step,
                declared_total = request.total_steps,
                "Investigation grew past its estimate"
            );
            step
        } else {
            request.total_steps
        };

        let actions = tool.policy().required_actions(step, total).to_vec();
        self.store.append(
            step,
            request.confidence,
            &request.findings,
            &request.files,
            actions.clone(),
        );
        self.last_step = step;
        self.total_steps = total;
        self.updated_at = Utc::now();

        tracing::debug!(
            investigation_id = %self.id,
            tool = %self.tool_name,
            step_number = step,
            total_steps = total,
            confidence = %request.confidence,
            "Step recorded"
        );

        if request.confidence.is_certain() || step == total {
            return self.finalize(tool);
        }

        Ok(StepOutcome::AwaitingNextStep {
            investigation_id: self.id,
            step_number: step,
            total_steps: total,
            next_step_number: step + 1,
            required_actions: actions,
            guidance: tool.render_step_prompt(request),
        })
    }

    /// Records that the expert verdict came back.
    pub fn resolve_expert(&mut self) -> Result<(), WorkflowError> {
        if self.status != InvestigationStatus::AwaitingExpert {
            return Err(WorkflowError::state(format!(
                "investigation {} is {}, not awaiting expert analysis",
                self.id, self.status
            )));
        }
        self.transition(InvestigationStatus::Complete)?;
        self.expert_context = None;
        Ok(())
    }

    fn finalize(&mut self, tool: &ToolDefinition) -> Result<StepOutcome, WorkflowError> {
        let decision = tool.gate().decide(self.store.view());

        match decision.rendered_context {
            Some(rendered_context) if decision.should_call => {
                self.transition(InvestigationStatus::AwaitingExpert)?;
                self.expert_context = Some(rendered_context.clone());
                Ok(StepOutcome::AwaitingExpert {
                    investigation_id: self.id,
                    rendered_context,
                    findings: self.store.snapshot(),
                })
            }
            _ => {
                self.transition(InvestigationStatus::Complete)?;
                Ok(StepOutcome::Complete {
                    investigation_id: self.id,
                    findings: self.store.snapshot(),
                })
            }
        }
    }

    fn transition(&mut self, target: InvestigationStatus) -> Result<(), WorkflowError> {
        let next = self.status.transition_to(target).ok_or_else(|| {
            WorkflowError::state(format!(
                "cannot move investigation {} from {} to {}",
                self.id, self.status, target
            ))
        })?;

        tracing::info!(
            investigation_id = %self.id,
            from = %self.status,
            to = %next,
            "Investigation status changed"
        );
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Read model for inspection endpoints.
    pub fn summary(&self) -> InvestigationSummary {
        InvestigationSummary {
            investigation_id: self.id,
            tool: self.tool_name.clone(),
            status: self.status,
            last_step: self.last_step,
            total_steps: self.total_steps,
            steps_taken: self.store.view().steps_taken.clone(),
            findings: self.store.snapshot(),
            rendered_context: self.expert_context.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Serializable view of an investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationSummary {
    pub investigation_id: InvestigationId,
    pub tool: String,
    pub status: InvestigationStatus,
    pub last_step: u32,
    pub total_steps: u32,
    pub steps_taken: Vec<StepRecord>,
    pub findings: ConsolidatedFindings,
    /// Present while AWAITING_EXPERT, so the hand-off can be retried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_context: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
