//! GetInvestigationHandler - Query handler for a live investigation.

use std::sync::Arc;

use crate::domain::foundation::InvestigationId;
use crate::domain::investigation::{InvestigationSummary, WorkflowError};
use crate::ports::InvestigationRepository;

/// Query for one investigation.
#[derive(Debug, Clone)]
pub struct GetInvestigationQuery {
    pub investigation_id: InvestigationId,
}

/// Handler for investigation lookups.
pub struct GetInvestigationHandler {
    repository: Arc<dyn InvestigationRepository>,
}

impl GetInvestigationHandler {
    pub fn new(repository: Arc<dyn InvestigationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetInvestigationQuery,
    ) -> Result<InvestigationSummary, WorkflowError> {
        self.repository
            .find(query.investigation_id)
            .await?
            .map(|investigation| investigation.summary())
            .ok_or(WorkflowError::InvestigationNotFound(query.investigation_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryInvestigationRepository;
    use crate::domain::investigation::{Investigation, InvestigationStatus};
    use crate::domain::tools::catalog;

    #[tokio::test]
    async fn returns_summary_of_live_investigation() {
        let repo = Arc::new(InMemoryInvestigationRepository::new());
        let inv = Investigation::start(InvestigationId::new(), catalog::tax_calculation_review::NAME);
        repo.save(&inv, 0).await.unwrap();
        let handler = GetInvestigationHandler::new(repo);

        let summary = handler
            .handle(GetInvestigationQuery {
                investigation_id: inv.id(),
            })
            .await
            .unwrap();

        assert_eq!(summary.investigation_id, inv.id());
        assert_eq!(summary.status, InvestigationStatus::InProgress);
        assert_eq!(summary.last_step, 0);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let handler = GetInvestigationHandler::new(Arc::new(InMemoryInvestigationRepository::new()));
        let id = InvestigationId::new();

        let err = handler
            .handle(GetInvestigationQuery { investigation_id: id })
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::InvestigationNotFound(id));
    }
}
