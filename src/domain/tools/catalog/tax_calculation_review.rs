//! tax-calculation-review
//!
//! Walks a caller through validating tax calculation code against IRS
//! rules, edge cases and multi-tenant performance.

use std::sync::Arc;

use crate::domain::investigation::{AnalysisDimension, ChecklistGate, ExpertTemplate, StepPolicy};
use crate::domain::tools::{FieldSpec, PromptContext, ToolCategory, ToolDefinition};

pub const NAME: &str = "tax-calculation-review";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        NAME,
        "Tax Calculation Review",
        "Multi-step review of tax calculation logic in CPA software. Validates \
         calculations against IRS regulations, checks deductions, credits and \
         bracket thresholds, exercises edge cases such as AMT and multi-state \
         scenarios, and closes with performance and compliance recommendations.",
        ToolCategory::Compliance,
        policy(),
        Arc::new(ChecklistGate::always(expert_template())),
    )
    .multi_tenant_aware(true)
    .with_prompt_description("Describe the tax calculation logic or issue you want reviewed")
    .with_field(FieldSpec::new(
        "tax_year",
        "Tax Year",
        "Tax year for regulation compliance (e.g., 2024)",
        "2024",
    ))
    .with_field(FieldSpec::new(
        "calculation_type",
        "Calculation Type",
        "Type of tax calculation (federal, state, payroll, corporate, etc.)",
        "federal",
    ))
    .with_prompt_context(PromptContext {
        heading: "TAX CALCULATION REVIEW CONTEXT".to_string(),
        fixed_lines: vec![
            "Multi-tenant CPA Platform: AdvisorOS".to_string(),
            "Focus: Compliance, accuracy, and multi-tenant performance".to_string(),
        ],
        request_heading: "ANALYSIS REQUEST".to_string(),
        closing: "Please begin the systematic tax calculation review process.".to_string(),
    })
}

fn policy() -> StepPolicy {
    StepPolicy::sequential(
        [
            vec![
                "Analyze the tax calculation logic and implementation",
                "Review code for tax regulation compliance",
                "Identify the tax calculation components and flow",
            ],
            vec![
                "Validate calculations against IRS regulations and tax code",
                "Check for proper handling of deductions and credits",
                "Verify tax bracket calculations and thresholds",
            ],
            vec![
                "Test edge cases and boundary conditions",
                "Validate multi-state and special scenario handling",
                "Check AMT (Alternative Minimum Tax) calculations if applicable",
            ],
            vec![
                "Analyze performance and multi-tenant considerations",
                "Generate comprehensive test cases for validation",
                "Provide optimization recommendations and compliance summary",
            ],
        ],
        [
            "Finalize tax calculation review",
            "Generate compliance documentation",
            "Provide implementation recommendations",
        ],
    )
}

fn expert_template() -> ExpertTemplate {
    ExpertTemplate {
        title: "TAX CALCULATION EXPERT ANALYSIS REQUEST".to_string(),
        findings_heading: "CONSOLIDATED INVESTIGATION FINDINGS".to_string(),
        files_heading: "RELEVANT FILES ANALYZED".to_string(),
        request_heading: "EXPERT ANALYSIS NEEDED".to_string(),
        persona: "You are a senior CPA with expertise in tax software development and IRS regulations."
            .to_string(),
        dimensions: vec![
            AnalysisDimension::new(
                "TAX COMPLIANCE VALIDATION",
                [
                    "Verify calculations align with current IRS regulations",
                    "Validate tax bracket implementations",
                    "Check deduction and credit calculations",
                ],
            ),
            AnalysisDimension::new(
                "REGULATORY ADHERENCE",
                [
                    "Confirm compliance with tax year regulations",
                    "Validate business rule implementations",
                    "Check for required disclosures and warnings",
                ],
            ),
            AnalysisDimension::new(
                "EDGE CASE COVERAGE",
                [
                    "Identify potential calculation edge cases",
                    "Validate boundary condition handling",
                    "Check AMT and special scenario calculations",
                ],
            ),
            AnalysisDimension::new(
                "MULTI-TENANT CONSIDERATIONS",
                [
                    "Validate organization-scoped tax calculations",
                    "Check for data isolation in tax processing",
                    "Verify performance at scale",
                ],
            ),
            AnalysisDimension::new(
                "RECOMMENDATIONS",
                [
                    "Optimization opportunities",
                    "Compliance improvements",
                    "Testing strategies",
                    "Documentation needs",
                ],
            ),
        ],
        closing: vec![
            "Focus on CPA software development best practices and multi-tenant architecture considerations."
                .to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::investigation::ToolRequest;

    #[test]
    fn declares_four_phases_and_catch_all() {
        let tool = definition();

        assert_eq!(tool.policy().declared_steps(), 4);
        assert_eq!(
            tool.policy().required_actions(7, 7)[0],
            "Finalize tax calculation review"
        );
    }

    #[test]
    fn step_prompt_mentions_tax_context() {
        let request = ToolRequest::new("Check bracket rounding")
            .with_field("tax_year", "2024")
            .with_field("calculation_type", "payroll");

        let text = definition().render_step_prompt(&request);

        assert!(text.starts_with("TAX CALCULATION REVIEW CONTEXT:\n- Tax Year: 2024\n- Calculation Type: payroll"));
        assert!(text.contains("ANALYSIS REQUEST:\nCheck bracket rounding"));
    }
}
