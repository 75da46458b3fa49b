//! Mock Expert Analyst for tests and offline runs.
//!
//! # Example
//!
//! ```ignore
//! let analyst = MockExpertAnalyst::new()
//!     .with_verdict("Brackets are correct for 2024.")
//!     .with_error(ExpertAnalysisError::network("reset"));
//!
//! let verdict = analyst.analyze(request).await?;
//! assert_eq!(analyst.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ExpertAnalysisError, ExpertAnalyst, ExpertRequest, ExpertVerdict};

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Verdict(String),
    Error(ExpertAnalysisError),
}

/// Mock expert analyst.
///
/// Replies are consumed in order; once exhausted, every call succeeds with a
/// short canned verdict.
#[derive(Debug, Clone, Default)]
pub struct MockExpertAnalyst {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<ExpertRequest>>>,
    delay: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockExpertAnalyst {
    pub const NAME: &'static str = "mock-expert";

    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful verdict.
    pub fn with_verdict(self, text: impl Into<String>) -> Self {
        lock(&self.replies).push_back(MockReply::Verdict(text.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: ExpertAnalysisError) -> Self {
        lock(&self.replies).push_back(MockReply::Error(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Every request received, oldest first.
    pub fn calls(&self) -> Vec<ExpertRequest> {
        lock(&self.calls).clone()
    }

    fn next_reply(&self, request: &ExpertRequest) -> MockReply {
        lock(&self.replies).pop_front().unwrap_or_else(|| {
            MockReply::Verdict(format!(
                "Expert review of {} complete: {} characters of findings assessed.",
                request.tool,
                request.rendered_context.len()
            ))
        })
    }
}

#[async_trait]
impl ExpertAnalyst for MockExpertAnalyst {
    async fn analyze(&self, request: ExpertRequest) -> Result<ExpertVerdict, ExpertAnalysisError> {
        lock(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply(&request) {
            MockReply::Verdict(text) => Ok(ExpertVerdict::new(text, Self::NAME)),
            MockReply::Error(err) => Err(err),
        }
    }

    fn analyst_name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::InvestigationId;

    fn request() -> ExpertRequest {
        ExpertRequest::new(InvestigationId::new(), "tax-calculation-review", "CONTEXT")
    }

    #[tokio::test]
    async fn replies_in_order_then_default() {
        let analyst = MockExpertAnalyst::new()
            .with_error(ExpertAnalysisError::network("reset"))
            .with_verdict("Looks right");

        assert!(analyst.analyze(request()).await.is_err());
        assert_eq!(analyst.analyze(request()).await.unwrap().text, "Looks right");

        let fallback = analyst.analyze(request()).await.unwrap();
        assert!(fallback.text.contains("tax-calculation-review"));
        assert_eq!(fallback.analyst, MockExpertAnalyst::NAME);
    }

    #[tokio::test]
    async fn records_calls() {
        let analyst = MockExpertAnalyst::new();
        analyst.analyze(request()).await.unwrap();

        assert_eq!(analyst.call_count(), 1);
        assert_eq!(analyst.calls()[0].rendered_context, "CONTEXT");
    }

    #[tokio::test]
    async fn clones_share_state() {
        let analyst = MockExpertAnalyst::new().with_verdict("shared");
        let clone = analyst.clone();

        assert_eq!(clone.analyze(request()).await.unwrap().text, "shared");
        assert_eq!(analyst.call_count(), 1);
    }
}
