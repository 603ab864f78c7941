use async_trait::async_trait;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};

/// Represents a single tool that a plan step can invoke.
///
/// Each tool has a unique name, a specification (description and JSON schema
/// for the planner prompt), and implements the call logic. Tools are
/// registered with [`ToolRegistry`](crate::tools::ToolRegistry).
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use planweave::tools::Tool;
/// use planweave::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "echo".to_string(),
///             description: Some("Echoes its input".to_string()),
///             input_schema: serde_json::json!({}),
///         }
///     }
///
///     async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
///         Ok(ToolCallContent {
///             text: args.as_str().unwrap_or_default().to_string(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    ///
    /// Must be unique within a registry; plans reference the tool by this name
    /// on their evidence lines.
    fn name(&self) -> &str;

    /// Returns the specification for this tool.
    ///
    /// The spec is rendered into the planner prompt so the model knows the
    /// tool exists and how to shape its input.
    fn spec(&self) -> ToolSpec;

    /// Executes the tool with the given arguments.
    ///
    /// Arguments arrive as JSON: a textual plan input as a JSON string, a
    /// structured plan input as the object the plan author wrote, placeholders
    /// already substituted.
    ///
    /// # Errors
    ///
    /// Returns [`ToolSourceError`] for invalid arguments, execution errors, or
    /// transport failures; each error counts as one failed attempt under the
    /// executor's retry policy.
    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError>;
}
