//! Tool definition - static configuration for one workflow tool.
//!
//! A tool is data, not a type: its declared fields, its phase table and its
//! expert gate. The single generic state machine in `investigation` is
//! parameterized by a value of this type.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::investigation::{
    argument_keys as keys, Confidence, ExpertAnalysisGate, StepPolicy, ToolRequest,
};

/// Tool-specific input field with its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Label used when the value is rendered into a prompt.
    pub label: String,
    pub description: String,
    pub default: String,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            description: description.into(),
            default: default.into(),
        }
    }
}

/// Catalog grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Compliance,
    Audit,
    Security,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Compliance => "compliance",
            ToolCategory::Audit => "audit",
            ToolCategory::Security => "security",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed text wrapped around the caller's prompt at every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    pub heading: String,
    /// Lines listed after the domain fields, e.g. platform and focus.
    pub fixed_lines: Vec<String>,
    pub request_heading: String,
    pub closing: String,
}

/// What `list_tools` reports for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolListing {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub category: ToolCategory,
    pub multi_tenant_aware: bool,
    pub input_schema: Value,
}

/// Definition of one guided investigation tool.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    name: String,
    display_name: String,
    description: String,
    category: ToolCategory,
    multi_tenant_aware: bool,
    prompt_description: String,
    fields: Vec<FieldSpec>,
    policy: StepPolicy,
    gate: Arc<dyn ExpertAnalysisGate>,
    prompt_context: PromptContext,
}

impl ToolDefinition {
    /// Creates a definition with no domain fields and a bare prompt context.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        category: ToolCategory,
        policy: StepPolicy,
        gate: Arc<dyn ExpertAnalysisGate>,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            name: name.into(),
            prompt_context: PromptContext {
                heading: format!("{} CONTEXT", display_name.to_uppercase()),
                fixed_lines: Vec::new(),
                request_heading: "REQUEST".to_string(),
                closing: String::new(),
            },
            display_name,
            description: description.into(),
            category,
            multi_tenant_aware: false,
            prompt_description: "What to investigate".to_string(),
            fields: Vec::new(),
            policy,
            gate,
        }
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_prompt_description(mut self, description: impl Into<String>) -> Self {
        self.prompt_description = description.into();
        self
    }

    pub fn with_prompt_context(mut self, context: PromptContext) -> Self {
        self.prompt_context = context;
        self
    }

    pub fn multi_tenant_aware(mut self, aware: bool) -> Self {
        self.multi_tenant_aware = aware;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> ToolCategory {
        self.category
    }

    pub fn is_multi_tenant_aware(&self) -> bool {
        self.multi_tenant_aware
    }

    pub fn domain_fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn policy(&self) -> &StepPolicy {
        &self.policy
    }

    pub fn gate(&self) -> &dyn ExpertAnalysisGate {
        self.gate.as_ref()
    }

    /// Fields a caller must always supply.
    pub fn required_fields(&self) -> &'static [&'static str] {
        &[keys::PROMPT]
    }

    /// JSON Schema for the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            keys::PROMPT.to_string(),
            json!({ "type": "string", "description": self.prompt_description }),
        );

        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                json!({
                    "type": "string",
                    "description": field.description,
                    "default": field.default
                }),
            );
        }

        properties.insert(
            keys::FILES.to_string(),
            json!({
                "type": "array",
                "items": { "type": "string" },
                "description": "Paths of files relevant to this step"
            }),
        );
        properties.insert(
            keys::STEP_NUMBER.to_string(),
            json!({ "type": "integer", "minimum": 1, "default": 1, "description": "Current step, starting at 1" }),
        );
        properties.insert(
            keys::TOTAL_STEPS.to_string(),
            json!({
                "type": "integer",
                "minimum": 1,
                "default": self.policy.declared_steps(),
                "description": "Estimated number of steps; may grow"
            }),
        );
        properties.insert(
            keys::CONFIDENCE.to_string(),
            json!({
                "type": "string",
                "enum": Confidence::ALL.iter().map(Confidence::as_str).collect::<Vec<_>>(),
                "default": Confidence::default().as_str()
            }),
        );
        properties.insert(
            keys::FINDINGS.to_string(),
            json!({ "type": "string", "description": "Evidence gathered in this step" }),
        );
        properties.insert(
            keys::CONTINUATION_ID.to_string(),
            json!({
                "type": "string",
                "format": "uuid",
                "description": "Investigation to continue; omit on step 1"
            }),
        );

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_fields()
        })
    }

    pub fn listing(&self) -> ToolListing {
        ToolListing {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            category: self.category,
            multi_tenant_aware: self.multi_tenant_aware,
            input_schema: self.input_schema(),
        }
    }

    /// Renders the per-step guidance: the tool's context header with every
    /// domain field, then the caller's prompt and the closing instruction.
    pub fn render_step_prompt(&self, request: &ToolRequest) -> String {
        let ctx = &self.prompt_context;
        let mut lines = vec![format!("{}:", ctx.heading)];

        for field in &self.fields {
            let value = request.field(&field.name).unwrap_or(field.default.as_str());
            lines.push(format!("- {}: {}", field.label, value));
        }
        lines.extend(ctx.fixed_lines.iter().map(|line| format!("- {}", line)));

        lines.push(String::new());
        lines.push(format!("{}:", ctx.request_heading));
        lines.push(request.prompt.clone());

        if !ctx.closing.is_empty() {
            lines.push(String::new());
            lines.push(ctx.closing.clone());
        }

        lines.join("\n")
    }
}
