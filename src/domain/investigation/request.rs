//! ToolRequest - one validated step submission.
//!
//! Raw tool-call arguments are checked once, here. Every per-tool field is
//! resolved to its declared default at construction, so nothing downstream
//! looks up optional keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{InvestigationId, ValidationError};
use crate::domain::tools::ToolDefinition;

use super::confidence::Confidence;

/// Argument keys the engine itself understands.
pub mod keys {
    pub const PROMPT: &str = "prompt";
    pub const STEP_NUMBER: &str = "step_number";
    pub const TOTAL_STEPS: &str = "total_steps";
    pub const CONFIDENCE: &str = "confidence";
    pub const FINDINGS: &str = "findings";
    pub const FILES: &str = "files";
    pub const CONTINUATION_ID: &str = "continuation_id";
}

/// One step's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub prompt: String,
    pub step_number: u32,
    pub total_steps: u32,
    pub confidence: Confidence,
    pub findings: String,
    pub files: Vec<String>,
    pub continuation_id: Option<InvestigationId>,
    /// Tool-specific fields, already defaulted. Only prompt rendering reads them.
    pub domain_fields: IndexMap<String, String>,
}

impl ToolRequest {
    /// Creates a first-step request for a fresh investigation.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            step_number: 1,
            total_steps: 1,
            confidence: Confidence::default(),
            findings: String::new(),
            files: Vec::new(),
            continuation_id: None,
            domain_fields: IndexMap::new(),
        }
    }

    pub fn with_step(mut self, step_number: u32, total_steps: u32) -> Self {
        self.step_number = step_number;
        self.total_steps = total_steps;
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_findings(mut self, findings: impl Into<String>) -> Self {
        self.findings = findings.into();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_continuation(mut self, id: InvestigationId) -> Self {
        self.continuation_id = Some(id);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.domain_fields.insert(name.into(), value.into());
        self
    }

    /// Value of a tool-specific field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.domain_fields.get(name).map(String::as_str)
    }

    /// Checks the invariants every request must satisfy.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.prompt.trim().is_empty() {
            return Err(ValidationError::empty_field(keys::PROMPT));
        }
        if self.step_number < 1 {
            return Err(ValidationError::out_of_range(
                keys::STEP_NUMBER,
                1,
                i64::from(u32::MAX),
                i64::from(self.step_number),
            ));
        }
        if self.total_steps < 1 {
            return Err(ValidationError::out_of_range(
                keys::TOTAL_STEPS,
                1,
                i64::from(u32::MAX),
                i64::from(self.total_steps),
            ));
        }
        Ok(())
    }

    /// Builds a request from raw tool-call arguments.
    ///
    /// Defaults: `step_number` 1, `total_steps` the tool's declared phase
    /// count (never below `step_number`), `confidence` exploring, empty
    /// findings and files. Unknown keys are ignored.
    pub fn from_arguments(
        arguments: &Map<String, Value>,
        tool: &ToolDefinition,
    ) -> Result<Self, ValidationError> {
        let prompt = match arguments.get(keys::PROMPT) {
            None | Some(Value::Null) => return Err(ValidationError::missing_field(keys::PROMPT)),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(ValidationError::invalid_format(keys::PROMPT, "expected a string"))
            }
        };

        let step_number = optional_step(arguments, keys::STEP_NUMBER)?.unwrap_or(1);
        let total_steps = optional_step(arguments, keys::TOTAL_STEPS)?
            .unwrap_or_else(|| tool.policy().declared_steps().max(step_number));

        let confidence = match optional_string(arguments, keys::CONFIDENCE)? {
            Some(raw) => raw.parse()?,
            None => Confidence::default(),
        };

        let findings = optional_string(arguments, keys::FINDINGS)?.unwrap_or_default();
        let files = optional_files(arguments)?;

        let continuation_id = match optional_string(arguments, keys::CONTINUATION_ID)? {
            Some(raw) if !raw.trim().is_empty() => Some(InvestigationId::parse_continuation(&raw)?),
            _ => None,
        };

        let mut domain_fields = IndexMap::new();
        for spec in tool.domain_fields() {
            let value = match arguments.get(&spec.name) {
                None | Some(Value::Null) => spec.default.clone(),
                Some(Value::String(s)) if s.trim().is_empty() => spec.default.clone(),
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                Some(_) => {
                    return Err(ValidationError::invalid_format(
                        spec.name.clone(),
                        "expected a string",
                    ))
                }
            };
            domain_fields.insert(spec.name.clone(), value);
        }

        let request = Self {
            prompt,
            step_number,
            total_steps,
            confidence,
            findings,
            files,
            continuation_id,
            domain_fields,
        };
        request.validate()?;
        Ok(request)
    }
}

fn optional_string(
    arguments: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, ValidationError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::invalid_format(key, "expected a string")),
    }
}

fn optional_step(arguments: &Map<String, Value>, key: &str) -> Result<Option<u32>, ValidationError> {
    let value = match arguments.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    if let Some(n) = value.as_i64() {
        if n < 1 || n > i64::from(u32::MAX) {
            return Err(ValidationError::out_of_range(key, 1, i64::from(u32::MAX), n));
        }
        return Ok(Some(n as u32));
    }

    Err(ValidationError::invalid_format(key, "expected a positive integer"))
}

fn optional_files(arguments: &Map<String, Value>) -> Result<Vec<String>, ValidationError> {
    match arguments.get(keys::FILES) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if s.trim().is_empty() => None,
                Value::String(s) => Some(Ok(s.trim().to_string())),
                _ => Some(Err(ValidationError::invalid_format(
                    keys::FILES,
                    "expected an array of strings",
                ))),
            })
            .collect(),
        Some(_) => Err(ValidationError::invalid_format(
            keys::FILES,
            "expected an array of strings",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::catalog;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    #[test]
    fn missing_prompt_is_rejected() {
        let tool = catalog::tax_calculation_review::definition();
        let err = ToolRequest::from_arguments(&args(json!({"step_number": 1})), &tool).unwrap_err();

        assert_eq!(err, ValidationError::missing_field("prompt"));
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let tool = catalog::tax_calculation_review::definition();
        let err = ToolRequest::from_arguments(&args(json!({"prompt": "  "})), &tool).unwrap_err();

        assert_eq!(err, ValidationError::empty_field("prompt"));
    }

    #[test]
    fn step_zero_is_rejected() {
        let tool = catalog::tax_calculation_review::definition();
        let err = ToolRequest::from_arguments(
            &args(json!({"prompt": "p", "step_number": 0})),
            &tool,
        )
        .unwrap_err();

        assert_eq!(err.field(), "step_number");
    }

    #[test]
    fn non_integer_step_is_rejected() {
        let tool = catalog::tax_calculation_review::definition();
        let err = ToolRequest::from_arguments(
            &args(json!({"prompt": "p", "step_number": "two"})),
            &tool,
        )
        .unwrap_err();

        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn defaults_are_resolved_once() {
        let tool = catalog::tax_calculation_review::definition();
        let request =
            ToolRequest::from_arguments(&args(json!({"prompt": "Review brackets"})), &tool)
                .unwrap();

        assert_eq!(request.step_number, 1);
        assert_eq!(request.total_steps, tool.policy().declared_steps());
        assert_eq!(request.confidence, Confidence::Exploring);
        assert_eq!(request.field("tax_year"), Some("2024"));
        assert_eq!(request.field("calculation_type"), Some("federal"));
        assert!(request.continuation_id.is_none());
    }

    #[test]
    fn supplied_domain_fields_override_defaults() {
        let tool = catalog::tax_calculation_review::definition();
        let request = ToolRequest::from_arguments(
            &args(json!({"prompt": "p", "tax_year": 2023, "calculation_type": "payroll"})),
            &tool,
        )
        .unwrap();

        assert_eq!(request.field("tax_year"), Some("2023"));
        assert_eq!(request.field("calculation_type"), Some("payroll"));
    }

    #[test]
    fn parses_workflow_fields() {
        let tool = catalog::tax_calculation_review::definition();
        let id = InvestigationId::new();
        let request = ToolRequest::from_arguments(
            &args(json!({
                "prompt": "p",
                "step_number": 2,
                "total_steps": 3,
                "confidence": "medium",
                "findings": "AMT skipped",
                "files": ["src/amt.ts", "", "src/tax.ts"],
                "continuation_id": id.to_string(),
                "unrelated": true
            })),
            &tool,
        )
        .unwrap();

        assert_eq!(request.step_number, 2);
        assert_eq!(request.total_steps, 3);
        assert_eq!(request.confidence, Confidence::Medium);
        assert_eq!(request.findings, "AMT skipped");
        assert_eq!(request.files, vec!["src/amt.ts", "src/tax.ts"]);
        assert_eq!(request.continuation_id, Some(id));
    }

    #[test]
    fn files_must_be_strings() {
        let tool = catalog::tax_calculation_review::definition();
        let err = ToolRequest::from_arguments(
            &args(json!({"prompt": "p", "files": ["a.rs", 3]})),
            &tool,
        )
        .unwrap_err();

        assert_eq!(err.field(), "files");
    }

    #[test]
    fn domain_field_must_be_scalar() {
        let tool = catalog::financial_compliance_audit::definition();
        let err = ToolRequest::from_arguments(
            &args(json!({"prompt": "p", "audit_scope": ["a"]})),
            &tool,
        )
        .unwrap_err();

        assert_eq!(err.field(), "audit_scope");
    }

    #[test]
    fn builder_request_validates() {
        assert!(ToolRequest::new("look").validate().is_ok());
        assert!(ToolRequest::new("").validate().is_err());
        assert!(ToolRequest::new("x").with_step(0, 1).validate().is_err());
    }
}
