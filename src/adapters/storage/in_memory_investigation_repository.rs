//! In-Memory Investigation Repository
//!
//! Live investigations exist only in process memory. Retired ids are kept
//! so a late step on a finished investigation is reported as out of
//! sequence rather than unknown. Only the most recent `retired_capacity`
//! ids are remembered; older ones are evicted first-in first-out.

use async_trait::async_trait;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::InvestigationId;
use crate::domain::investigation::Investigation;
use crate::ports::{InvestigationRepository, RepositoryError};

/// Default number of retired ids remembered.
pub const DEFAULT_RETIRED_CAPACITY: usize = 10_000;

#[derive(Debug, Default)]
struct Inner {
    live: HashMap<InvestigationId, Investigation>,
    retired: IndexSet<InvestigationId>,
}

impl Inner {
    /// Fails unless the stored state for `id` is at `expected`.
    fn check(&self, id: InvestigationId, expected: u32) -> Result<(), RepositoryError> {
        let actual = match self.live.get(&id) {
            Some(stored) if stored.last_step() == expected => return Ok(()),
            Some(stored) => format!("step {}", stored.last_step()),
            None if self.retired.contains(&id) => "a retired investigation".to_string(),
            None if expected == 0 => return Ok(()),
            None => "nothing stored".to_string(),
        };
        Err(RepositoryError::Conflict {
            id,
            expected,
            actual,
        })
    }
}

/// In-memory storage for investigations
#[derive(Debug, Clone)]
pub struct InMemoryInvestigationRepository {
    inner: Arc<RwLock<Inner>>,
    retired_capacity: usize,
}

impl Default for InMemoryInvestigationRepository {
    fn default() -> Self {
        Self {
            inner: Arc::default(),
            retired_capacity: DEFAULT_RETIRED_CAPACITY,
        }
    }
}

impl InMemoryInvestigationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retired_capacity(mut self, capacity: usize) -> Self {
        self.retired_capacity = capacity.max(1);
        self
    }

    pub async fn retired_count(&self) -> usize {
        self.inner.read().await.retired.len()
    }
}

#[async_trait]
impl InvestigationRepository for InMemoryInvestigationRepository {
    async fn find(&self, id: InvestigationId) -> Result<Option<Investigation>, RepositoryError> {
        Ok(self.inner.read().await.live.get(&id).cloned())
    }

    async fn save(
        &self,
        investigation: &Investigation,
        expected_last_step: u32,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.check(investigation.id(), expected_last_step)?;
        inner.live.insert(investigation.id(), investigation.clone());
        Ok(())
    }

    async fn retire(
        &self,
        id: InvestigationId,
        expected_last_step: u32,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.check(id, expected_last_step)?;
        inner.live.remove(&id);
        inner.retired.insert(id);
        while inner.retired.len() > self.retired_capacity {
            if let Some(evicted) = inner.retired.shift_remove_index(0) {
                tracing::debug!(investigation_id = %evicted, "Forgot retired investigation");
            }
        }
        Ok(())
    }

    async fn is_retired(&self, id: InvestigationId) -> Result<bool, RepositoryError> {
        Ok(self.inner.read().await.retired.contains(&id))
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.inner.read().await.live.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::investigation::{Confidence, ToolRequest};
    use crate::domain::tools::catalog;

    fn investigation() -> Investigation {
        Investigation::start(InvestigationId::new(), catalog::tax_calculation_review::NAME)
    }

    fn advanced(inv: &Investigation) -> Investigation {
        let tool = catalog::tax_calculation_review::definition();
        let mut next = inv.clone();
        let request = ToolRequest::new("Check rates")
            .with_step(inv.last_step() + 1, 5)
            .with_confidence(Confidence::Low)
            .with_findings("more");
        next.submit_step(&request, &tool).unwrap();
        next
    }

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemoryInvestigationRepository::new();
        let inv = investigation();

        repo.save(&inv, 0).await.unwrap();

        let found = repo.find(inv.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), inv.id());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_unknown_is_none() {
        let repo = InMemoryInvestigationRepository::new();
        assert!(repo.find(InvestigationId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_from_stale_read_conflicts() {
        let repo = InMemoryInvestigationRepository::new();
        let first = advanced(&investigation());
        repo.save(&first, 0).await.unwrap();

        let winner = advanced(&first);
        let loser = advanced(&first);
        repo.save(&winner, 1).await.unwrap();
        let err = repo.save(&loser, 1).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict { expected: 1, .. }));
        let stored = repo.find(first.id()).await.unwrap().unwrap();
        assert_eq!(stored.last_step(), 2);
    }

    #[tokio::test]
    async fn second_new_investigation_with_same_id_conflicts() {
        let repo = InMemoryInvestigationRepository::new();
        let inv = advanced(&investigation());

        repo.save(&inv, 0).await.unwrap();

        assert!(repo.save(&inv, 0).await.is_err());
    }

    #[tokio::test]
    async fn retire_removes_and_remembers() {
        let repo = InMemoryInvestigationRepository::new();
        let inv = investigation();
        repo.save(&inv, 0).await.unwrap();

        repo.retire(inv.id(), 0).await.unwrap();

        assert!(repo.find(inv.id()).await.unwrap().is_none());
        assert!(repo.is_retired(inv.id()).await.unwrap());
        assert!(!repo.is_retired(InvestigationId::new()).await.unwrap());
        assert_eq!(repo.retired_count().await, 1);
    }

    #[tokio::test]
    async fn retired_id_cannot_be_saved_or_retired_again() {
        let repo = InMemoryInvestigationRepository::new();
        let inv = investigation();
        repo.retire(inv.id(), 0).await.unwrap();

        assert!(repo.save(&inv, 0).await.is_err());
        assert!(repo.retire(inv.id(), 0).await.is_err());
    }

    #[tokio::test]
    async fn retired_ids_are_bounded_oldest_first() {
        let repo = InMemoryInvestigationRepository::new().with_retired_capacity(2);
        let ids: Vec<InvestigationId> = (0..3).map(|_| InvestigationId::new()).collect();

        for id in &ids {
            repo.retire(*id, 0).await.unwrap();
        }

        assert_eq!(repo.retired_count().await, 2);
        assert!(!repo.is_retired(ids[0]).await.unwrap());
        assert!(repo.is_retired(ids[1]).await.unwrap());
        assert!(repo.is_retired(ids[2]).await.unwrap());
    }
}
