//! Findings Store
//!
//! Append-only log of what each step reported, plus the ordered set of files
//! seen so far. One store belongs to exactly one investigation; isolation
//! between investigations comes from each owning its own instance.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::confidence::Confidence;

/// Placeholder written when a step reports no findings text.
const EMPTY_STEP_FINDINGS: &str = "(no findings reported)";

/// One recorded step of an investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_number: u32,
    pub confidence: Confidence,
    pub actions_performed: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Accumulated evidence for one investigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedFindings {
    /// Per-step findings in step order, each behind a step marker.
    pub findings: String,
    /// Every file mentioned so far, first-seen order, no duplicates.
    pub relevant_files: IndexSet<String>,
    pub steps_taken: Vec<StepRecord>,
}

impl ConsolidatedFindings {
    pub fn is_empty(&self) -> bool {
        self.steps_taken.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.steps_taken.len()
    }

    pub fn latest_step(&self) -> Option<&StepRecord> {
        self.steps_taken.last()
    }
}

/// Marker that opens a step's contribution in the consolidated text.
pub fn step_marker(step_number: u32, confidence: Confidence) -> String {
    format!("--- Step {} ({}) ---", step_number, confidence)
}

/// Owner of a [`ConsolidatedFindings`] value.
///
/// There is no removal API: once appended, a step's findings stay for the
/// lifetime of the investigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingsStore {
    consolidated: ConsolidatedFindings,
}

impl FindingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one step's report.
    pub fn append(
        &mut self,
        step_number: u32,
        confidence: Confidence,
        findings_text: &str,
        files: &[String],
        actions_performed: Vec<String>,
    ) {
        let text = findings_text.trim();
        let text = if text.is_empty() { EMPTY_STEP_FINDINGS } else { text };

        let findings = &mut self.consolidated.findings;
        if !findings.is_empty() {
            findings.push_str("\n\n");
        }
        findings.push_str(&step_marker(step_number, confidence));
        findings.push('\n');
        findings.push_str(text);

        for file in files {
            let file = file.trim();
            if !file.is_empty() {
                self.consolidated.relevant_files.insert(file.to_string());
            }
        }

        self.consolidated.steps_taken.push(StepRecord {
            step_number,
            confidence,
            actions_performed,
            recorded_at: Utc::now(),
        });
    }

    /// Read-only view of the accumulated findings.
    pub fn view(&self) -> &ConsolidatedFindings {
        &self.consolidated
    }

    /// Owned copy of the accumulated findings.
    pub fn snapshot(&self) -> ConsolidatedFindings {
        self.consolidated.clone()
    }
}
