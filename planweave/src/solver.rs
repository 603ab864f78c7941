//! Solver boundary: turn the task and accumulated evidence into the answer.
//!
//! The coordinator hands `(task, ordered evidence)` to a [`Solver`] once every
//! level completed; the solver's output is returned verbatim as the run's
//! final result. [`LlmSolver`] is the LLM-backed implementation; tests inject
//! their own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::evidence::Evidence;
use crate::llm::{LlmClient, LlmError};
use crate::message::Message;
use crate::plan::SOLVER_SYSTEM;

/// Synthesis boundary: task + ordered evidence → final answer.
///
/// **Interaction**: Called exactly once per successful run by
/// [`ExecutionCoordinator`](crate::coordinator::ExecutionCoordinator).
#[async_trait]
pub trait Solver: Send + Sync {
    /// Produces the final answer from the task and the full evidence list.
    async fn solve(&self, task: &str, evidence: &Evidence) -> Result<String, LlmError>;
}

/// Renders the solver's user message: the task followed by each evidence
/// entry (id, tool, input, value) in execution order.
pub(crate) fn render_solver_message(task: &str, evidence: &Evidence) -> String {
    let mut out = format!("Task: {}\n\nEvidence:", task);
    if evidence.is_empty() {
        out.push_str("\n(none)");
    }
    for entry in evidence.entries() {
        out.push_str(&format!(
            "\n\n{} = {}[{}]\n{}",
            entry.step_id, entry.tool_name, entry.input, entry.value
        ));
    }
    out
}

/// LLM-backed solver: formats the evidence under [`SOLVER_SYSTEM`] and
/// returns the model's reply.
pub struct LlmSolver {
    llm: Arc<dyn LlmClient>,
}

impl LlmSolver {
    /// Creates a solver over the given LLM client.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Solver for LlmSolver {
    async fn solve(&self, task: &str, evidence: &Evidence) -> Result<String, LlmError> {
        let messages = vec![
            Message::system(SOLVER_SYSTEM),
            Message::user(render_solver_message(task, evidence)),
        ];
        let response = self.llm.invoke(&messages).await?;
        Ok(response.content)
    }
}
