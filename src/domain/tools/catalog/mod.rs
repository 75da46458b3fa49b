//! Bundled workflow tools.
//!
//! Each tool is pure data: fields, phase table, expert checklist.

pub mod financial_compliance_audit;
pub mod multi_tenant_security_check;
pub mod tax_calculation_review;

use super::ToolRegistry;

/// Registry holding every bundled tool.
pub fn default_registry() -> ToolRegistry {
    ToolRegistry::new()
        .with_tool(tax_calculation_review::definition())
        .with_tool(financial_compliance_audit::definition())
        .with_tool(multi_tenant_security_check::definition())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::investigation::{ConsolidatedFindings, ExpertAnalysisGate};

    #[test]
    fn default_registry_has_three_tools() {
        let registry = default_registry();

        assert_eq!(
            registry.tool_names(),
            vec![
                tax_calculation_review::NAME,
                financial_compliance_audit::NAME,
                multi_tenant_security_check::NAME,
            ]
        );
    }

    #[test]
    fn every_tool_escalates_to_expert_and_is_multi_tenant_aware() {
        let registry = default_registry();
        let empty = ConsolidatedFindings::default();

        for listing in registry.listings() {
            let tool = registry.get(&listing.name).unwrap();
            assert!(tool.gate().should_call(&empty), "{}", listing.name);
            assert!(listing.multi_tenant_aware);
            assert_eq!(tool.policy().declared_steps(), 4);
        }
    }
}
