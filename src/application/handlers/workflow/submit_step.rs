//! SubmitStepHandler - Route one step report to its investigation.

use std::sync::Arc;

use crate::domain::foundation::{InvestigationId, ValidationError};
use crate::domain::investigation::{
    argument_keys, Investigation, StepOutcome, ToolRequest, WorkflowError,
};
use crate::domain::tools::ToolRegistry;
use crate::ports::InvestigationRepository;

/// Default cap on `total_steps`.
pub const DEFAULT_MAX_TOTAL_STEPS: u32 = 50;

/// Command to submit one step
#[derive(Debug, Clone)]
pub struct SubmitStepCommand {
    pub tool_name: String,
    pub request: ToolRequest,
}

/// Handler for step submissions
pub struct SubmitStepHandler {
    registry: Arc<ToolRegistry>,
    repository: Arc<dyn InvestigationRepository>,
    max_total_steps: u32,
}

impl SubmitStepHandler {
    pub fn new(registry: Arc<ToolRegistry>, repository: Arc<dyn InvestigationRepository>) -> Self {
        Self {
            registry,
            repository,
            max_total_steps: DEFAULT_MAX_TOTAL_STEPS,
        }
    }

    pub fn with_max_total_steps(mut self, max_total_steps: u32) -> Self {
        self.max_total_steps = max_total_steps;
        self
    }

    pub async fn handle(&self, cmd: SubmitStepCommand) -> Result<StepOutcome, WorkflowError> {
        let tool = self.registry.get(&cmd.tool_name)?;
        let request = cmd.request;

        request.validate()?;
        if request.total_steps > self.max_total_steps {
            return Err(ValidationError::out_of_range(
                argument_keys::TOTAL_STEPS,
                1,
                i64::from(self.max_total_steps),
                i64::from(request.total_steps),
            )
            .into());
        }
        if request.step_number > self.max_total_steps {
            return Err(ValidationError::out_of_range(
                argument_keys::STEP_NUMBER,
                1,
                i64::from(self.max_total_steps),
                i64::from(request.step_number),
            )
            .into());
        }

        let mut investigation = self.resolve(&request, tool.name()).await?;
        let read_at = investigation.last_step();
        let outcome = investigation.submit_step(&request, &tool)?;

        // A concurrent submission for the same id that saved first turns
        // this write into a conflict, reported as a state error.
        match outcome {
            StepOutcome::Complete { .. } => {
                self.repository.retire(investigation.id(), read_at).await?
            }
            _ => self.repository.save(&investigation, read_at).await?,
        }

        tracing::info!(
            investigation_id = %investigation.id(),
            tool = %tool.name(),
            step_number = request.step_number,
            status = outcome.status_label(),
            "Step accepted"
        );

        Ok(outcome)
    }

    /// Finds the investigation a request continues, or opens one for step 1.
    async fn resolve(
        &self,
        request: &ToolRequest,
        tool_name: &str,
    ) -> Result<Investigation, WorkflowError> {
        let id = match request.continuation_id {
            Some(id) => id,
            None if request.step_number == 1 => {
                return Ok(Investigation::start(InvestigationId::new(), tool_name));
            }
            None => {
                return Err(WorkflowError::state(format!(
                    "step {} submitted without a continuation_id; start with step 1",
                    request.step_number
                )));
            }
        };

        if self.repository.is_retired(id).await? {
            return Err(WorkflowError::state(format!(
                "investigation {} has finished; start a new one",
                id
            )));
        }

        match self.repository.find(id).await? {
            Some(investigation) => Ok(investigation),
            None if request.step_number == 1 => Ok(Investigation::start(id, tool_name)),
            None => Err(WorkflowError::state(format!(
                "step {} submitted for investigation {} which has no prior step",
                request.step_number, id
            ))),
        }
    }
}
