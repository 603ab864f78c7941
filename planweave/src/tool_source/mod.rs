//! Tool source abstraction: list tools and call a tool.
//!
//! The executor depends on `ToolSource` instead of a concrete tool registry,
//! so tests can substitute [`MockToolSource`] and callers can inject whatever
//! mapping they own ([`ToolRegistry`](crate::tools::ToolRegistry) is the
//! in-crate implementation). There is no process-wide registry.
//!
//! Inputs reach tools as JSON: a textual plan input arrives as a JSON string,
//! a structured plan input arrives as the JSON object the plan author wrote
//! (with placeholders already substituted in either case).

mod mock;

pub use mock::MockToolSource;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification: name, description for the planner prompt, argument schema.
///
/// **Interaction**: Returned by [`ToolSource::list_tools`]; rendered into the
/// planner prompt by [`PlanRunner`](crate::runner::PlanRunner) so the model
/// only plans with tools that exist.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name as used on a plan's evidence line.
    pub name: String,
    /// Human-readable description for the LLM.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
///
/// **Interaction**: Returned by [`ToolSource::call_tool`]; the executor stores
/// `text` as the step's evidence value.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    /// Result text.
    pub text: String,
}

/// Errors from listing or calling tools.
///
/// **Interaction**: Returned by [`ToolSource::list_tools`] and
/// [`ToolSource::call_tool`]; a per-attempt failure absorbed by the executor's
/// retry policy.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Tool source: list tools and call a tool.
///
/// The executor depends on this instead of a concrete registry. The runner
/// uses `list_tools()` to build the planner prompt; the executor uses
/// `call_tool(name, args)` once per attempt.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with JSON arguments.
    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}
