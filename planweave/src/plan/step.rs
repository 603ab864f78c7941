//! Plan step types: one planned action and its authored input.

use serde::{Deserialize, Serialize};

/// The tool input as authored in the plan.
///
/// Text inputs are substituted by whole-string replacement of each placeholder
/// token; structured inputs (a JSON object payload) are substituted per string
/// leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepInput {
    /// A literal text input, e.g. `search[what is rust]`.
    Text(String),
    /// A key/value payload, e.g. `http_get[{"url": "#E1"}]`.
    Structured(serde_json::Value),
}

impl StepInput {
    /// Renders the input for logging and evidence records.
    pub fn display_string(&self) -> String {
        match self {
            StepInput::Text(s) => s.clone(),
            StepInput::Structured(v) => v.to_string(),
        }
    }
}

/// One planned action: evidence placeholder, rationale, tool, input.
///
/// Created once by [`parse_plan`](crate::plan::parse_plan); immutable
/// thereafter. The `id` doubles as the step's evidence slot name and as the
/// token later steps embed to reference its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Placeholder id, unique within a plan (e.g. `#E1`).
    pub id: String,
    /// Free-text rationale; logged, never machine-consumed.
    pub description: String,
    /// Name of the tool to invoke.
    pub tool_name: String,
    /// The authored input, containing zero or more placeholder references.
    pub raw_input: StepInput,
}
