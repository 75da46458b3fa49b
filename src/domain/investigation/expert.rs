//! Expert Analysis Gate
//!
//! Decides whether a finished investigation goes to an external expert and,
//! if so, renders the exact text handed over. Gates are pluggable per tool;
//! [`ChecklistGate`] is the table-driven implementation the bundled tools use.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

use super::findings::ConsolidatedFindings;

/// Marker rendered when no files were reported.
pub const NO_FILES_MARKER: &str = "No specific files provided";

/// Verdict of the gate for one termination attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertAnalysisDecision {
    pub should_call: bool,
    pub rendered_context: Option<String>,
}

/// Per-tool policy for handing consolidated findings to an expert.
///
/// Both methods must be pure: the same findings always give the same answer.
pub trait ExpertAnalysisGate: fmt::Debug + Send + Sync {
    fn should_call(&self, consolidated: &ConsolidatedFindings) -> bool;

    fn render_context(&self, consolidated: &ConsolidatedFindings) -> String;

    fn decide(&self, consolidated: &ConsolidatedFindings) -> ExpertAnalysisDecision {
        if self.should_call(consolidated) {
            ExpertAnalysisDecision {
                should_call: true,
                rendered_context: Some(self.render_context(consolidated)),
            }
        } else {
            ExpertAnalysisDecision {
                should_call: false,
                rendered_context: None,
            }
        }
    }
}

/// When a [`ChecklistGate`] asks for expert review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertCallPolicy {
    Always,
    Never,
    /// Only once at least this many steps were recorded.
    MinSteps(usize),
}

/// One numbered section of the expert checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDimension {
    pub title: String,
    pub checks: Vec<String>,
}

impl AnalysisDimension {
    pub fn new<I, S>(title: impl Into<String>, checks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            checks: checks.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fixed text around the findings in the expert context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertTemplate {
    pub title: String,
    pub findings_heading: String,
    pub files_heading: String,
    pub request_heading: String,
    pub persona: String,
    pub dimensions: Vec<AnalysisDimension>,
    pub closing: Vec<String>,
}

/// Gate driven by a call policy and a checklist template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistGate {
    policy: ExpertCallPolicy,
    template: ExpertTemplate,
}

impl ChecklistGate {
    pub fn new(policy: ExpertCallPolicy, template: ExpertTemplate) -> Self {
        Self { policy, template }
    }

    /// Gate that always asks for expert review.
    pub fn always(template: ExpertTemplate) -> Self {
        Self::new(ExpertCallPolicy::Always, template)
    }

    pub fn policy(&self) -> ExpertCallPolicy {
        self.policy
    }

    pub fn template(&self) -> &ExpertTemplate {
        &self.template
    }
}

impl ExpertAnalysisGate for ChecklistGate {
    fn should_call(&self, consolidated: &ConsolidatedFindings) -> bool {
        match self.policy {
            ExpertCallPolicy::Always => true,
            ExpertCallPolicy::Never => false,
            ExpertCallPolicy::MinSteps(min) => consolidated.step_count() >= min,
        }
    }

    fn render_context(&self, consolidated: &ConsolidatedFindings) -> String {
        let t = &self.template;
        let files = if consolidated.relevant_files.is_empty() {
            NO_FILES_MARKER.to_string()
        } else {
            consolidated
                .relevant_files
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        // Writing into a String cannot fail.
        let mut out = String::new();
        let _ = writeln!(out, "{}", t.title);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", t.findings_heading);
        let _ = writeln!(out, "{}", consolidated.findings);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", t.files_heading);
        let _ = writeln!(out, "{}", files);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", t.request_heading);
        let _ = writeln!(out, "{}", t.persona);
        let _ = writeln!(out, "Please provide expert analysis covering:");

        for (i, dimension) in t.dimensions.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}. {}", i + 1, dimension.title);
            for check in &dimension.checks {
                let _ = writeln!(out, "   - {}", check);
            }
        }

        if !t.closing.is_empty() {
            let _ = writeln!(out);
            for line in &t.closing {
                let _ = writeln!(out, "{}", line);
            }
        }

        out
    }
}
