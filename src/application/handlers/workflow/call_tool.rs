//! CallToolHandler - The tool-call boundary.
//!
//! Takes a tool name and the raw argument mapping a protocol layer received,
//! and returns the content blocks that go back to the caller. Along the way
//! it pulls evidence for the step's files, submits the step, and (when
//! configured) runs the expert analyst on finalization.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{ErrorCode, InvestigationId};
use crate::domain::investigation::{StepOutcome, ToolRequest, WorkflowError};
use crate::domain::tools::ToolRegistry;
use crate::ports::{
    EvidenceBundle, EvidenceSource, ExpertAnalysisError, ExpertAnalyst, ExpertRequest,
};

use super::{ResolveExpertCommand, ResolveExpertHandler, SubmitStepCommand, SubmitStepHandler};

/// Command for one tool call.
#[derive(Debug, Clone)]
pub struct CallToolCommand {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

/// One block of returned content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// A collaborator that failed without failing the step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorFailure {
    pub code: ErrorCode,
    pub message: String,
    pub retryable: bool,
}

/// What happened when the expert analyst ran inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ExpertOutcome {
    Resolved {
        analyst: String,
        verdict: String,
    },
    /// The investigation was not resolved. `verdict` is set when the analyst
    /// answered but recording the answer failed.
    Failed {
        #[serde(flatten)]
        failure: CollaboratorFailure,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verdict: Option<String>,
    },
}

impl ExpertOutcome {
    fn failed(failure: CollaboratorFailure) -> Self {
        ExpertOutcome::Failed {
            failure,
            verdict: None,
        }
    }
}

/// Full result of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResponse {
    pub content: Vec<ContentBlock>,
    pub outcome: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert: Option<ExpertOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_error: Option<CollaboratorFailure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Handler for tool calls.
pub struct CallToolHandler {
    registry: Arc<ToolRegistry>,
    submit: Arc<SubmitStepHandler>,
    resolve: Arc<ResolveExpertHandler>,
    evidence: Option<Arc<dyn EvidenceSource>>,
    analyst: Option<Arc<dyn ExpertAnalyst>>,
    auto_expert: bool,
    expert_timeout: Option<Duration>,
}

impl CallToolHandler {
    pub fn new(
        registry: Arc<ToolRegistry>,
        submit: Arc<SubmitStepHandler>,
        resolve: Arc<ResolveExpertHandler>,
    ) -> Self {
        Self {
            registry,
            submit,
            resolve,
            evidence: None,
            analyst: None,
            auto_expert: false,
            expert_timeout: None,
        }
    }

    pub fn with_evidence(mut self, evidence: Arc<dyn EvidenceSource>) -> Self {
        self.evidence = Some(evidence);
        self
    }

    /// Runs `analyst` inline whenever a step ends in AWAITING_EXPERT.
    pub fn with_auto_expert(mut self, analyst: Arc<dyn ExpertAnalyst>) -> Self {
        self.analyst = Some(analyst);
        self.auto_expert = true;
        self
    }

    /// Caps one inline expert call, retries included. Must leave room
    /// inside the request timeout of whatever serves this handler.
    pub fn with_expert_timeout(mut self, timeout: Duration) -> Self {
        self.expert_timeout = Some(timeout);
        self
    }

    pub async fn handle(&self, cmd: CallToolCommand) -> Result<CallToolResponse, WorkflowError> {
        let tool = self.registry.get(&cmd.tool_name)?;
        let mut request = ToolRequest::from_arguments(&cmd.arguments, &tool)?;

        let (bundle, evidence_error) = self.fetch_evidence(&request.files).await;
        let warnings = bundle.warnings();
        if !warnings.is_empty() {
            append_warnings(&mut request, &warnings);
        }

        let outcome = self
            .submit
            .handle(SubmitStepCommand {
                tool_name: tool.name().to_string(),
                request,
            })
            .await?;

        let expert = match (&outcome, &self.analyst) {
            (
                StepOutcome::AwaitingExpert {
                    investigation_id,
                    rendered_context,
                    findings,
                },
                Some(analyst),
            ) if self.auto_expert => {
                let files: Vec<String> = findings.relevant_files.iter().cloned().collect();
                let (appendix, _) = self.fetch_evidence(&files).await;
                let expert_request =
                    ExpertRequest::new(*investigation_id, tool.name(), rendered_context.clone())
                        .with_evidence(appendix.documents);
                Some(self.run_expert(analyst.as_ref(), expert_request).await)
            }
            _ => None,
        };

        let content = vec![ContentBlock::text(render_text(
            &outcome,
            expert.as_ref(),
            &warnings,
        ))];

        Ok(CallToolResponse {
            content,
            outcome,
            expert,
            evidence_error,
            warnings,
        })
    }

    /// Never fails: an unusable source turns every path into a failure.
    async fn fetch_evidence(
        &self,
        files: &[String],
    ) -> (EvidenceBundle, Option<CollaboratorFailure>) {
        let Some(source) = &self.evidence else {
            return (EvidenceBundle::default(), None);
        };
        if files.is_empty() {
            return (EvidenceBundle::default(), None);
        }

        match source.fetch(files).await {
            Ok(bundle) => (bundle, None),
            Err(err) => {
                tracing::warn!(error = %err, files = files.len(), "Evidence source unavailable");
                let failure = CollaboratorFailure {
                    code: ErrorCode::EvidenceUnavailable,
                    message: err.to_string(),
                    retryable: false,
                };
                (EvidenceBundle::all_failed(files, "evidence source unavailable"), Some(failure))
            }
        }
    }

    /// Never fails: the step is already recorded, so every problem here is
    /// reported in the outcome and the investigation stays AWAITING_EXPERT.
    async fn run_expert(&self, analyst: &dyn ExpertAnalyst, request: ExpertRequest) -> ExpertOutcome {
        let investigation_id = request.investigation_id;
        tracing::info!(
            investigation_id = %investigation_id,
            tool = %request.tool,
            analyst = analyst.analyst_name(),
            evidence_files = request.evidence.len(),
            "Invoking expert analysis"
        );

        let analysis = match self.expert_timeout {
            Some(budget) => tokio::time::timeout(budget, analyst.analyze(request))
                .await
                .unwrap_or_else(|_| {
                    Err(ExpertAnalysisError::Timeout {
                        timeout_secs: budget.as_secs() as u32,
                    })
                }),
            None => analyst.analyze(request).await,
        };

        let verdict = match analysis {
            Ok(verdict) => verdict,
            Err(err) => return ExpertOutcome::failed(expert_failure(investigation_id, &err)),
        };

        let recorded = self
            .resolve
            .handle(ResolveExpertCommand {
                investigation_id,
                verdict: verdict.text.clone(),
            })
            .await;

        match recorded {
            Ok(_) => ExpertOutcome::Resolved {
                analyst: verdict.analyst,
                verdict: verdict.text,
            },
            Err(err) => {
                tracing::warn!(
                    investigation_id = %investigation_id,
                    error = %err,
                    "Expert verdict could not be recorded"
                );
                ExpertOutcome::Failed {
                    failure: CollaboratorFailure {
                        code: err.code(),
                        message: err.to_string(),
                        retryable: false,
                    },
                    verdict: Some(verdict.text),
                }
            }
        }
    }
}

fn expert_failure(investigation_id: InvestigationId, err: &ExpertAnalysisError) -> CollaboratorFailure {
    tracing::warn!(
        investigation_id = %investigation_id,
        error = %err,
        retryable = err.is_retryable(),
        "Expert analysis failed; investigation stays awaiting expert"
    );
    CollaboratorFailure {
        code: ErrorCode::ExpertAnalysisFailed,
        message: err.to_string(),
        retryable: err.is_retryable(),
    }
}

fn append_warnings(request: &mut ToolRequest, warnings: &[String]) {
    let joined = warnings.join("\n");
    if request.findings.trim().is_empty() {
        request.findings = joined;
    } else {
        request.findings = format!("{}\n{}", request.findings.trim_end(), joined);
    }
}

fn render_text(outcome: &StepOutcome, expert: Option<&ExpertOutcome>, warnings: &[String]) -> String {
    let mut out = match outcome {
        StepOutcome::AwaitingNextStep {
            investigation_id,
            step_number,
            total_steps,
            next_step_number,
            required_actions,
            guidance,
        } => {
            let mut text = format!(
                "Investigation {} recorded step {} of {}.\n\
                 Continue with step {} using continuation_id {}.\n\nREQUIRED ACTIONS:\n",
                investigation_id, step_number, total_steps, next_step_number, investigation_id
            );
            for (i, action) in required_actions.iter().enumerate() {
                text.push_str(&format!("{}. {}\n", i + 1, action));
            }
            text.push('\n');
            text.push_str(guidance);
            text
        }
        StepOutcome::AwaitingExpert {
            investigation_id,
            rendered_context,
            ..
        } => {
            let mut text = format!(
                "Investigation {} is complete and awaiting expert analysis.\n\n{}",
                investigation_id, rendered_context
            );
            match expert {
                Some(ExpertOutcome::Resolved { analyst, verdict }) => {
                    text.push_str(&format!("\n\nEXPERT ANALYSIS ({}):\n{}", analyst, verdict));
                }
                Some(ExpertOutcome::Failed { failure, verdict }) => {
                    text.push_str(&format!(
                        "\n\nExpert analysis failed ({}): {}. Report a verdict for \
                         investigation {} once one is available.",
                        failure.code, failure.message, investigation_id
                    ));
                    if let Some(verdict) = verdict {
                        text.push_str(&format!("\n\nUNRECORDED EXPERT VERDICT:\n{}", verdict));
                    }
                }
                None => {}
            }
            text
        }
        StepOutcome::Complete {
            investigation_id,
            findings,
        } => format!(
            "Investigation {} is complete.\n\n{}",
            investigation_id, findings.findings
        ),
    };

    if !warnings.is_empty() {
        out.push_str("\n\nWARNINGS:\n");
        out.push_str(&warnings.join("\n"));
    }
    out
}
