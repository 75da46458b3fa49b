//! ListToolsHandler - Query handler for tool discovery.

use std::sync::Arc;

use crate::domain::tools::{ToolListing, ToolRegistry};

/// Handler for listing registered tools.
pub struct ListToolsHandler {
    registry: Arc<ToolRegistry>,
}

impl ListToolsHandler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Listings in registration order.
    pub fn handle(&self) -> Vec<ToolListing> {
        self.registry.listings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::catalog;

    #[test]
    fn lists_every_catalog_tool_with_schema() {
        let handler = ListToolsHandler::new(Arc::new(catalog::default_registry()));

        let listings = handler.handle();

        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].name, catalog::tax_calculation_review::NAME);
        for listing in &listings {
            assert_eq!(listing.input_schema["type"], "object");
            assert!(listing.multi_tenant_aware);
        }
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let handler = ListToolsHandler::new(Arc::new(ToolRegistry::new()));
        assert!(handler.handle().is_empty());
    }
}
