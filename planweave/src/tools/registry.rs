use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
use crate::tools::r#trait::Tool;

/// Registry for a collection of tools, keyed by name.
///
/// Implements [`ToolSource`] so a populated registry can be handed directly to
/// the runner or coordinator. Registration replaces an existing tool with the
/// same name.
///
/// # Examples
///
/// ```no_run
/// use planweave::tools::{Tool, ToolRegistry};
///
/// # fn tools() -> Vec<Box<dyn Tool>> { vec![] }
/// let mut registry = ToolRegistry::new();
/// for tool in tools() {
///     registry.register(tool);
/// }
/// ```
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool. If a tool with the same name exists, it is replaced.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Lists all registered tools as [`ToolSpec`] objects.
    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true when no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolSource for ToolRegistry {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.list())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticTool {
        name: String,
        result: String,
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: self.name.clone(),
                description: None,
                input_schema: serde_json::json!({}),
            }
        }

        async fn call(&self, _args: Value) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent {
                text: self.result.clone(),
            })
        }
    }

    /// **Scenario**: An empty registry lists no tools and rejects calls with NotFound.
    #[tokio::test]
    async fn empty_registry_rejects_calls() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_tools().await.unwrap().is_empty());
        let err = registry
            .call_tool("missing", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(name) if name == "missing"));
    }

    /// **Scenario**: A registered tool is listed and callable by name.
    #[tokio::test]
    async fn registered_tool_listed_and_callable() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(StaticTool {
            name: "search".to_string(),
            result: "found it".to_string(),
        }));
        assert_eq!(registry.len(), 1);
        let specs = registry.list_tools().await.unwrap();
        assert_eq!(specs[0].name, "search");
        let out = registry
            .call_tool("search", serde_json::json!("query"))
            .await
            .unwrap();
        assert_eq!(out.text, "found it");
    }

    /// **Scenario**: Registering a tool with an existing name replaces the old tool.
    #[tokio::test]
    async fn register_same_name_replaces() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(StaticTool {
            name: "t".to_string(),
            result: "old".to_string(),
        }));
        registry.register(Box::new(StaticTool {
            name: "t".to_string(),
            result: "new".to_string(),
        }));
        assert_eq!(registry.len(), 1);
        let out = registry.call_tool("t", serde_json::json!({})).await.unwrap();
        assert_eq!(out.text, "new");
    }
}
