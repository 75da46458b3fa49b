//! financial-compliance-audit
//!
//! SOX, GAAP/IFRS and audit-trail review of financial systems.

use std::sync::Arc;

use crate::domain::investigation::{AnalysisDimension, ChecklistGate, ExpertTemplate, StepPolicy};
use crate::domain::tools::{FieldSpec, PromptContext, ToolCategory, ToolDefinition};

pub const NAME: &str = "financial-compliance-audit";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        NAME,
        "Financial Compliance Audit",
        "Multi-step audit of financial compliance (SOX, GAAP). Covers internal \
         financial controls, audit trail completeness, reporting standards, \
         segregation of duties and organization-scoped compliance isolation.",
        ToolCategory::Audit,
        policy(),
        Arc::new(ChecklistGate::always(expert_template())),
    )
    .multi_tenant_aware(true)
    .with_prompt_description(
        "Describe the financial compliance area or specific compliance requirements to audit",
    )
    .with_field(FieldSpec::new(
        "compliance_standard",
        "Compliance Standard",
        "Primary compliance standard to validate against (SOX, GAAP, IFRS, etc.)",
        "SOX",
    ))
    .with_field(FieldSpec::new(
        "audit_scope",
        "Audit Scope",
        "Scope of audit (financial-controls, audit-trails, reporting, data-security)",
        "comprehensive",
    ))
    .with_field(FieldSpec::new(
        "organization_context",
        "Organization Context",
        "Organization type context (public-company, CPA-firm, financial-services)",
        "CPA-firm",
    ))
    .with_prompt_context(PromptContext {
        heading: "FINANCIAL COMPLIANCE AUDIT CONTEXT".to_string(),
        fixed_lines: vec![
            "Multi-tenant CPA Platform: AdvisorOS".to_string(),
            "Focus: Regulatory compliance, audit readiness, and financial controls".to_string(),
        ],
        request_heading: "COMPLIANCE AUDIT REQUEST".to_string(),
        closing: "Please begin the systematic financial compliance audit process with focus \
                  on regulatory requirements and multi-tenant architecture."
            .to_string(),
    })
}

fn policy() -> StepPolicy {
    StepPolicy::sequential(
        [
            vec![
                "Analyze financial data handling and storage mechanisms",
                "Review audit trail implementation and completeness",
                "Identify financial control points and validation logic",
            ],
            vec![
                "Validate SOX compliance requirements implementation",
                "Check internal financial controls and segregation of duties",
                "Review user access controls and authorization mechanisms",
            ],
            vec![
                "Test data retention and backup procedures",
                "Validate financial reporting accuracy and completeness",
                "Check compliance documentation and audit evidence",
            ],
            vec![
                "Analyze multi-tenant compliance isolation",
                "Test cross-organization access prevention",
                "Validate compliance reporting and monitoring capabilities",
            ],
        ],
        [
            "Generate comprehensive compliance assessment",
            "Document compliance gaps and recommendations",
            "Provide remediation roadmap and implementation guidance",
        ],
    )
}

fn expert_template() -> ExpertTemplate {
    ExpertTemplate {
        title: "FINANCIAL COMPLIANCE EXPERT ANALYSIS REQUEST".to_string(),
        findings_heading: "CONSOLIDATED AUDIT FINDINGS".to_string(),
        files_heading: "RELEVANT FINANCIAL SYSTEMS ANALYZED".to_string(),
        request_heading: "EXPERT COMPLIANCE ANALYSIS NEEDED".to_string(),
        persona: "You are a senior CPA with expertise in financial compliance, SOX regulations, and audit requirements."
            .to_string(),
        dimensions: vec![
            AnalysisDimension::new(
                "SOX COMPLIANCE VALIDATION",
                [
                    "Verify Sarbanes-Oxley compliance implementation",
                    "Validate internal financial controls effectiveness",
                    "Check audit trail completeness and integrity",
                ],
            ),
            AnalysisDimension::new(
                "FINANCIAL CONTROLS ASSESSMENT",
                [
                    "Evaluate segregation of duties implementation",
                    "Validate authorization and approval workflows",
                    "Check financial data access controls",
                ],
            ),
            AnalysisDimension::new(
                "AUDIT TRAIL COMPLIANCE",
                [
                    "Verify comprehensive change tracking",
                    "Validate data retention policies",
                    "Check audit evidence completeness",
                ],
            ),
            AnalysisDimension::new(
                "GAAP/IFRS ADHERENCE",
                [
                    "Validate financial reporting standards compliance",
                    "Check accounting principle implementations",
                    "Verify financial statement accuracy",
                ],
            ),
            AnalysisDimension::new(
                "MULTI-TENANT COMPLIANCE",
                [
                    "Validate organization-scoped financial controls",
                    "Check cross-tenant compliance isolation",
                    "Verify compliance reporting capabilities",
                ],
            ),
            AnalysisDimension::new(
                "REGULATORY RISK ASSESSMENT",
                [
                    "Identify compliance gaps and risks",
                    "Recommend remediation strategies",
                    "Provide implementation roadmap",
                ],
            ),
        ],
        closing: vec![
            "Focus on CPA platform compliance requirements and multi-tenant financial system architecture."
                .to_string(),
            "Provide specific recommendations for achieving and maintaining compliance.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::investigation::{ConsolidatedFindings, ExpertAnalysisGate};

    #[test]
    fn expert_checklist_has_six_dimensions() {
        let text = definition()
            .gate()
            .render_context(&ConsolidatedFindings::default());

        assert!(text.contains("6. REGULATORY RISK ASSESSMENT"));
        assert!(!text.contains("7."));
    }

    #[test]
    fn always_escalates() {
        assert!(definition().gate().should_call(&ConsolidatedFindings::default()));
    }
}
