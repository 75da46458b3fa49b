//! Tool Registry - lookup of workflow tools by name.
//!
//! Built once at startup and handed by reference to whoever serves tool
//! calls. There is no process-wide instance.
//!
//! # Example
//!
//! ```
//! use advisor_zen_tools::domain::tools::catalog;
//!
//! let registry = catalog::default_registry();
//! assert!(registry.get("tax-calculation-review").is_ok());
//! assert!(registry.get("unknown").is_err());
//! ```

use std::sync::Arc;

use indexmap::IndexMap;

use crate::domain::investigation::WorkflowError;

use super::{ToolDefinition, ToolListing};

/// Registered tools in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<ToolDefinition>>,
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any previous tool of the same name.
    pub fn register(&mut self, definition: ToolDefinition) {
        self.tools
            .insert(definition.name().to_string(), Arc::new(definition));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_tool(mut self, definition: ToolDefinition) -> Self {
        self.register(definition);
        self
    }

    /// Looks up a tool; unknown names are a not-found error.
    pub fn get(&self, name: &str) -> Result<Arc<ToolDefinition>, WorkflowError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| WorkflowError::ToolNotFound(name.to_string()))
    }

    /// Checks if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns all registered tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Name, description and input schema of every tool.
    pub fn listings(&self) -> Vec<ToolListing> {
        self.tools.values().map(|tool| tool.listing()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::catalog;

    #[test]
    fn new_registry_is_empty() {
        let registry = ToolRegistry::new();

        assert_eq!(registry.tool_count(), 0);
        assert!(registry.listings().is_empty());
    }

    #[test]
    fn register_adds_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(catalog::tax_calculation_review::definition());

        assert!(registry.has_tool("tax-calculation-review"));
        assert_eq!(registry.tool_count(), 1);
    }

    #[test]
    fn unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();

        let err = registry.get("nope").unwrap_err();
        assert_eq!(err, WorkflowError::ToolNotFound("nope".to_string()));
        assert!(err.is_not_found());
    }

    #[test]
    fn listings_keep_registration_order() {
        let registry = ToolRegistry::new()
            .with_tool(catalog::multi_tenant_security_check::definition())
            .with_tool(catalog::tax_calculation_review::definition());

        let names: Vec<String> = registry.listings().into_iter().map(|l| l.name).collect();
        assert_eq!(
            names,
            vec!["multi-tenant-security-check", "tax-calculation-review"]
        );
        assert_eq!(
            registry.tool_names(),
            vec!["multi-tenant-security-check", "tax-calculation-review"]
        );
    }

    #[test]
    fn re_registering_replaces() {
        let registry = ToolRegistry::new()
            .with_tool(catalog::tax_calculation_review::definition())
            .with_tool(catalog::tax_calculation_review::definition());

        assert_eq!(registry.tool_count(), 1);
    }
}
