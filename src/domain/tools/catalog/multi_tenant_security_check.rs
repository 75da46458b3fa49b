//! multi-tenant-security-check

use std::sync::Arc;

use crate::domain::investigation::{AnalysisDimension, ChecklistGate, ExpertTemplate, StepPolicy};
use crate::domain::tools::{FieldSpec, PromptContext, ToolCategory, ToolDefinition};

pub const NAME: &str = "multi-tenant-security-check";

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        NAME,
        "Multi-Tenant Security Check",
        "Multi-step security validation for organization isolation and RBAC. \
         Audits tenant filtering in queries, API tenant resolution, role \
         hierarchy, session and token handling, and cross-tenant access paths.",
        ToolCategory::Security,
        policy(),
        Arc::new(ChecklistGate::always(expert_template())),
    )
    .multi_tenant_aware(true)
    .with_prompt_description(
        "Describe the security concern or specific multi-tenant security area to audit",
    )
    .with_field(FieldSpec::new(
        "audit_focus",
        "Audit Focus",
        "Primary security focus (data-isolation, rbac-validation, api-security, database-security)",
        "comprehensive",
    ))
    .with_field(FieldSpec::new(
        "threat_model",
        "Threat Model",
        "Threat model context (insider-threat, external-attack, data-breach, privilege-escalation)",
        "comprehensive",
    ))
    .with_field(FieldSpec::new(
        "compliance_requirements",
        "Compliance Requirements",
        "Compliance requirements to validate (SOX, PCI-DSS, SOC2, GDPR)",
        "SOX",
    ))
    .with_prompt_context(PromptContext {
        heading: "MULTI-TENANT SECURITY AUDIT CONTEXT".to_string(),
        fixed_lines: vec![
            "Platform: AdvisorOS Multi-Tenant CPA Platform".to_string(),
            "Architecture: Next.js 15 + tRPC v10 + Prisma v5 + PostgreSQL + NextAuth.js".to_string(),
            "Focus: Organization isolation, RBAC validation, and CPA data security".to_string(),
        ],
        request_heading: "SECURITY AUDIT REQUEST".to_string(),
        closing: "Please begin the systematic multi-tenant security audit process with focus \
                  on organization isolation and CPA platform security requirements."
            .to_string(),
    })
}

fn policy() -> StepPolicy {
    StepPolicy::sequential(
        [
            vec![
                "Analyze database schema and organization relationships",
                "Review all Prisma queries for organizationId filtering",
                "Identify potential data isolation vulnerabilities",
            ],
            vec![
                "Test tRPC procedures for proper tenant validation",
                "Validate organizationProcedure usage across API routes",
                "Check middleware implementation for tenant resolution",
            ],
            vec![
                "Audit RBAC implementation and role hierarchy",
                "Test permission checking across different user roles",
                "Validate user authorization workflows and edge cases",
            ],
            vec![
                "Test session security and JWT token validation",
                "Validate cross-tenant access prevention mechanisms",
                "Check for potential privilege escalation vulnerabilities",
            ],
        ],
        [
            "Conduct penetration testing scenarios",
            "Generate comprehensive security assessment report",
            "Provide remediation recommendations and security improvements",
        ],
    )
}

fn expert_template() -> ExpertTemplate {
    ExpertTemplate {
        title: "MULTI-TENANT SECURITY EXPERT ANALYSIS REQUEST".to_string(),
        findings_heading: "CONSOLIDATED SECURITY AUDIT FINDINGS".to_string(),
        files_heading: "RELEVANT SECURITY COMPONENTS ANALYZED".to_string(),
        request_heading: "EXPERT SECURITY ANALYSIS NEEDED".to_string(),
        persona: "You are a senior security architect with expertise in multi-tenant SaaS security and CPA platform compliance."
            .to_string(),
        dimensions: vec![
            AnalysisDimension::new(
                "ORGANIZATION ISOLATION VALIDATION",
                [
                    "Verify organizationId filtering completeness",
                    "Identify potential data leakage vulnerabilities",
                    "Validate tenant isolation mechanisms",
                ],
            ),
            AnalysisDimension::new(
                "RBAC SECURITY ASSESSMENT",
                [
                    "Evaluate role hierarchy implementation (owner > admin > cpa > staff > client)",
                    "Validate permission checking mechanisms",
                    "Test privilege escalation prevention",
                ],
            ),
            AnalysisDimension::new(
                "API SECURITY VALIDATION",
                [
                    "Check tRPC procedure security implementation",
                    "Validate middleware tenant resolution",
                    "Test cross-tenant API access prevention",
                ],
            ),
            AnalysisDimension::new(
                "DATABASE SECURITY AUDIT",
                [
                    "Verify Prisma schema organization relationships",
                    "Validate composite indexing for security",
                    "Check data cascade and integrity controls",
                ],
            ),
            AnalysisDimension::new(
                "SESSION SECURITY ANALYSIS",
                [
                    "Evaluate JWT token security and claims validation",
                    "Test session isolation between organizations",
                    "Validate NextAuth.js multi-tenant configuration",
                ],
            ),
            AnalysisDimension::new(
                "CPA PLATFORM SPECIFIC SECURITY",
                [
                    "Validate financial data access controls",
                    "Check client confidentiality mechanisms",
                    "Verify tax data isolation and protection",
                ],
            ),
            AnalysisDimension::new(
                "COMPLIANCE SECURITY REQUIREMENTS",
                [
                    "Assess SOX security control requirements",
                    "Validate audit trail security",
                    "Check data retention and deletion security",
                ],
            ),
            AnalysisDimension::new(
                "PENETRATION TESTING RESULTS",
                [
                    "Identify exploitable vulnerabilities",
                    "Assess attack surface and risk levels",
                    "Recommend security hardening measures",
                ],
            ),
        ],
        closing: vec![
            "Provide specific recommendations for enhancing multi-tenant security architecture."
                .to_string(),
            "Focus on CPA platform requirements and regulatory compliance needs.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::investigation::ToolRequest;

    #[test]
    fn fields_default_as_declared() {
        let defaults: Vec<(String, String)> = definition()
            .domain_fields()
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect();

        assert_eq!(
            defaults,
            vec![
                ("audit_focus".to_string(), "comprehensive".to_string()),
                ("threat_model".to_string(), "comprehensive".to_string()),
                ("compliance_requirements".to_string(), "SOX".to_string()),
            ]
        );
    }

    #[test]
    fn step_prompt_lists_architecture() {
        let text = definition().render_step_prompt(&ToolRequest::new("Check org filter"));
        assert!(text.contains("- Architecture: Next.js 15"));
        assert!(text.contains("SECURITY AUDIT REQUEST:\nCheck org filter"));
    }
}
