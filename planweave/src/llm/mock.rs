//! Mock LLM for tests and examples.
//!
//! Returns scripted assistant text. A plan-then-solve run makes two LLM calls
//! (planner, then solver), so the mock supports a response script consumed in
//! order; the last entry repeats once the script is exhausted.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, LlmResponse};
use crate::message::Message;

/// Mock LLM: fixed or scripted assistant text.
///
/// Use [`MockLlm::with_response`] for a single fixed reply, or
/// [`MockLlm::with_script`] when successive calls must differ (e.g. first call
/// returns the plan text, second call returns the solver answer).
///
/// **Interaction**: Implements [`LlmClient`]; used by `PlanRunner` and
/// `LlmSolver` in tests and the mock example.
pub struct MockLlm {
    responses: Vec<String>,
    call_count: AtomicUsize,
    cycle: bool,
}

impl MockLlm {
    /// Creates a mock that returns the same content on every call.
    pub fn with_response(content: impl Into<String>) -> Self {
        Self {
            responses: vec![content.into()],
            call_count: AtomicUsize::new(0),
            cycle: false,
        }
    }

    /// Creates a mock that returns each response in order; the last repeats.
    pub fn with_script(responses: Vec<String>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
            cycle: false,
        }
    }

    /// Creates a mock that cycles through the responses forever (e.g. a
    /// plan/answer pair served across repeated runs).
    pub fn with_cycle(responses: Vec<String>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
            cycle: true,
        }
    }

    /// Number of `invoke` calls made so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, LlmError> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        let index = if self.cycle && !self.responses.is_empty() {
            n % self.responses.len()
        } else {
            n
        };
        let content = self
            .responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .ok_or_else(|| LlmError::CallFailed("mock has no scripted responses".to_string()))?;
        Ok(LlmResponse {
            content,
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: A fixed-response mock returns the same content on repeated calls.
    #[tokio::test]
    async fn fixed_response_repeats() {
        let llm = MockLlm::with_response("hello");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "hello");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "hello");
        assert_eq!(llm.calls(), 2);
    }

    /// **Scenario**: A scripted mock returns responses in order, then repeats the last.
    #[tokio::test]
    async fn script_consumed_in_order_then_last_repeats() {
        let llm = MockLlm::with_script(vec!["plan".to_string(), "answer".to_string()]);
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "plan");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "answer");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "answer");
    }

    /// **Scenario**: An empty script is a call failure, not a panic.
    #[tokio::test]
    async fn empty_script_errors() {
        let llm = MockLlm::with_script(vec![]);
        let err = llm.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, LlmError::CallFailed(_)));
    }

    /// **Scenario**: A cycling mock wraps around its script.
    #[tokio::test]
    async fn cycle_wraps_around() {
        let llm = MockLlm::with_cycle(vec!["plan".to_string(), "answer".to_string()]);
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "plan");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "answer");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "plan");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "answer");
    }
}
