//! LLM client abstraction for the planner and solver boundaries.
//!
//! The scheduling core never talks to a model directly; it depends on a
//! callable that maps messages to assistant text. The planner call produces
//! the raw plan text consumed by [`parse_plan`](crate::plan::parse_plan); the
//! solver call turns the accumulated evidence into the final answer.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use thiserror::Error;

use crate::message::Message;

/// Error from the planner/solver boundary.
///
/// **Interaction**: Returned by [`LlmClient::invoke`]; mapped into
/// [`PlanRunError::Llm`](crate::coordinator::PlanRunError::Llm) by the runner
/// and coordinator.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The call failed (network, API error, bad response shape).
    #[error("llm call failed: {0}")]
    CallFailed(String),
}

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    /// Tokens in the prompt (input).
    pub prompt_tokens: u32,
    /// Tokens in the completion (output).
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

/// Response from an LLM completion: assistant text plus optional usage.
#[derive(Debug)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Token usage for this call, when the backend reports it.
    pub usage: Option<LlmUsage>,
}

/// LLM client: given messages, returns assistant text.
///
/// Implementations: [`MockLlm`] (scripted, for tests and examples) and
/// [`ChatOpenAI`] (OpenAI-compatible API).
///
/// **Interaction**: Called once per run by [`PlanRunner`](crate::runner::PlanRunner)
/// to obtain the plan, and once by [`LlmSolver`](crate::solver::LlmSolver) to
/// synthesize the answer.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError>;
}
