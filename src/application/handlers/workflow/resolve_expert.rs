//! ResolveExpertHandler - Record the expert verdict for a finished investigation.
//!
//! Used when expert analysis runs outside the service: the caller took the
//! rendered context from an AWAITING_EXPERT outcome and reports back.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InvestigationId, ValidationError};
use crate::domain::investigation::{ConsolidatedFindings, WorkflowError};
use crate::ports::InvestigationRepository;

/// Command carrying an expert verdict.
#[derive(Debug, Clone)]
pub struct ResolveExpertCommand {
    pub investigation_id: InvestigationId,
    pub verdict: String,
}

/// Final record of an expert-reviewed investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedInvestigation {
    pub investigation_id: InvestigationId,
    pub findings: ConsolidatedFindings,
    pub verdict: String,
}

/// Handler for expert verdicts.
pub struct ResolveExpertHandler {
    repository: Arc<dyn InvestigationRepository>,
}

impl ResolveExpertHandler {
    pub fn new(repository: Arc<dyn InvestigationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: ResolveExpertCommand,
    ) -> Result<ResolvedInvestigation, WorkflowError> {
        if cmd.verdict.trim().is_empty() {
            return Err(ValidationError::empty_field("verdict").into());
        }

        let id = cmd.investigation_id;
        let mut investigation = match self.repository.find(id).await? {
            Some(investigation) => investigation,
            None if self.repository.is_retired(id).await? => {
                return Err(WorkflowError::state(format!(
                    "investigation {} has already finished",
                    id
                )));
            }
            None => return Err(WorkflowError::InvestigationNotFound(id)),
        };

        investigation.resolve_expert()?;
        self.repository.retire(id, investigation.last_step()).await?;

        tracing::info!(investigation_id = %id, "Expert verdict recorded");

        Ok(ResolvedInvestigation {
            investigation_id: id,
            findings: investigation.findings().clone(),
            verdict: cmd.verdict,
        })
    }
}
