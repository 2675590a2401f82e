//! Fixed name → tool mapping exposed to the model.

use std::sync::Arc;

use super::stock::{BuyStocks, GetStockPrice};
use super::tool::Tool;
use crate::error::HitlError;
use crate::provider::ToolDefinition;

/// Ordered set of tools, looked up by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock registry: `get_stock_price` and `buy_stocks`.
    pub fn stock() -> Self {
        Self::new()
            .with_tool(Arc::new(GetStockPrice::new()))
            .with_tool(Arc::new(BuyStocks::new()))
    }

    /// Add a tool. A later tool with the same name replaces the earlier one.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
        self
    }

    /// Resolve a tool by name.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Tool>, HitlError> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| HitlError::UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Tool definitions in the shape providers send to the model.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_registry_lists_both_tools_in_order() {
        let registry = ToolRegistry::stock();
        assert_eq!(registry.names(), vec!["get_stock_price", "buy_stocks"]);
        let defs = registry.definitions();
        assert_eq!(defs[1].parameters["properties"]["quantity"]["type"], "integer");
    }

    #[test]
    fn unknown_name_is_unknown_tool() {
        let registry = ToolRegistry::stock();
        assert!(matches!(
            registry.get("sell_stocks"),
            Err(HitlError::UnknownTool(name)) if name == "sell_stocks"
        ));
    }
}
