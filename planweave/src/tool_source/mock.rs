//! Mock ToolSource for tests and examples.
//!
//! Returns fixed text per tool name; configurable failing tools for retry and
//! failure-policy tests. Records every call (name and arguments) so tests can
//! assert attempt counts and substituted inputs without a real tool backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Mock tool source: per-tool fixed results, optional failing tools, call log.
///
/// **Interaction**: Implements [`ToolSource`]; used by the executor and
/// coordinator tests and by the mock example.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    results: HashMap<String, String>,
    failures: HashMap<String, String>,
    default_result: String,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockToolSource {
    /// Creates an empty mock; every call returns the default result ("ok").
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            results: HashMap::new(),
            failures: HashMap::new(),
            default_result: "ok".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock with one `search` tool returning a fixed result.
    pub fn search_example() -> Self {
        Self::new().with_tool_result("search", "Rust is a systems programming language.")
    }

    /// Registers a tool spec and a fixed result for it (builder).
    pub fn with_tool_result(mut self, name: &str, result: impl Into<String>) -> Self {
        self.tools.push(ToolSpec {
            name: name.to_string(),
            description: Some(format!("Mock tool {}", name)),
            input_schema: serde_json::json!({}),
        });
        self.results.insert(name.to_string(), result.into());
        self
    }

    /// Registers a tool that always fails with the given error text (builder).
    pub fn with_failing_tool(mut self, name: &str, error: impl Into<String>) -> Self {
        self.tools.push(ToolSpec {
            name: name.to_string(),
            description: Some(format!("Mock tool {}", name)),
            input_schema: serde_json::json!({}),
        });
        self.failures.insert(name.to_string(), error.into());
        self
    }

    /// Overrides the result returned for unknown tool names (builder).
    pub fn with_default_result(mut self, result: impl Into<String>) -> Self {
        self.default_result = result.into();
        self
    }

    /// Number of calls made to the given tool so far.
    pub fn attempts(&self, name: &str) -> usize {
        self.calls
            .lock()
            .expect("call log lock")
            .iter()
            .filter(|(n, _)| n == name)
            .count()
    }

    /// All recorded calls in order: (tool name, arguments).
    pub fn recorded_calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().expect("call log lock").clone()
    }
}

impl Default for MockToolSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.calls
            .lock()
            .expect("call log lock")
            .push((name.to_string(), arguments));

        if let Some(error) = self.failures.get(name) {
            return Err(ToolSourceError::Transport(error.clone()));
        }
        let text = self
            .results
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default_result.clone());
        Ok(ToolCallContent { text })
    }
}
