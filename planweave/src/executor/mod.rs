//! Tool executor: dispatch one level's steps concurrently.
//!
//! Every step in a level is spawned as its own task; the call returns only
//! once all of them reached a terminal state (spawn-all, join-all: the level
//! barrier). Each step is attempted up to `tool_call_max_retries` times,
//! immediately, with an optional per-call deadline; a timeout counts as a
//! failed attempt. Every attempt is logged with the step id, tool name, and
//! truncated input/outcome.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::plan::StepInput;
use crate::tool_source::{ToolSource, ToolSourceError};

/// Terminal state of one step's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StepStatus {
    /// The tool returned a value within the attempt budget.
    Succeeded,
    /// Every attempt failed; the last error is captured.
    Failed,
}

/// One step of a level, input already substituted.
#[derive(Debug, Clone)]
pub struct ReadyStep {
    /// The step's placeholder id.
    pub step_id: String,
    /// Tool to invoke.
    pub tool_name: String,
    /// Substituted input.
    pub input: StepInput,
}

/// Per-step outcome of a level dispatch.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// The step's placeholder id.
    pub step_id: String,
    /// Tool that was invoked.
    pub tool_name: String,
    /// The substituted input as dispatched (display form).
    pub input: String,
    /// Terminal state.
    pub status: StepStatus,
    /// Tool output on success; last error text on failure.
    pub output: String,
    /// Number of attempts made.
    pub attempts: u32,
}

/// Truncates a string for logging, appending "..." if longer than max_len.
pub(crate) fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Executes one level's steps concurrently against an injected tool source.
///
/// **Interaction**: Created and driven by
/// [`ExecutionCoordinator`](crate::coordinator::ExecutionCoordinator); one
/// call per level, results collected after the join barrier.
pub struct ToolExecutor {
    tools: Arc<dyn ToolSource>,
    max_attempts: u32,
    timeout: Option<Duration>,
    log_max_chars: usize,
}

impl ToolExecutor {
    /// Creates an executor over the given tool source and config.
    pub fn new(tools: Arc<dyn ToolSource>, config: &SchedulerConfig) -> Self {
        Self {
            tools,
            max_attempts: config.tool_call_max_retries,
            timeout: config.tool_call_timeout_secs.map(Duration::from_secs),
            log_max_chars: config.log_response_max_chars,
        }
    }

    /// Dispatches all steps of a level concurrently and joins them.
    ///
    /// Results come back in the level's step order regardless of completion
    /// order. Siblings always run to completion; a failure never cancels the
    /// rest of the level.
    pub async fn execute_level(&self, ready: Vec<ReadyStep>) -> Vec<ExecutionResult> {
        let mut handles = Vec::with_capacity(ready.len());
        for step in ready {
            let tools = Arc::clone(&self.tools);
            let max_attempts = self.max_attempts;
            let timeout = self.timeout;
            let log_max_chars = self.log_max_chars;
            let step_id = step.step_id.clone();
            let tool_name = step.tool_name.clone();
            let input_display = step.input.display_string();
            let handle = tokio::spawn(async move {
                run_step(tools, step, max_attempts, timeout, log_max_chars).await
            });
            handles.push((step_id, tool_name, input_display, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (step_id, tool_name, input, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(step_id = %step_id, error = %e, "step task join failed");
                    results.push(ExecutionResult {
                        step_id,
                        tool_name,
                        input,
                        status: StepStatus::Failed,
                        output: format!("step task join failed: {}", e),
                        attempts: 0,
                    });
                }
            }
        }
        results
    }
}

/// Runs one step: attempt loop with optional deadline, immediate retries.
async fn run_step(
    tools: Arc<dyn ToolSource>,
    step: ReadyStep,
    max_attempts: u32,
    timeout: Option<Duration>,
    log_max_chars: usize,
) -> ExecutionResult {
    let args = match &step.input {
        StepInput::Text(s) => Value::String(s.clone()),
        StepInput::Structured(v) => v.clone(),
    };
    let input_display = step.input.display_string();

    let mut last_error = "no attempts were made".to_string();
    for attempt in 1..=max_attempts {
        debug!(
            step_id = %step.step_id,
            tool = %step.tool_name,
            attempt,
            input = %truncate_for_log(&input_display, log_max_chars),
            "dispatching tool call"
        );

        let call = tools.call_tool(&step.tool_name, args.clone());
        let outcome = match timeout {
            Some(deadline) => match tokio::time::timeout(deadline, call).await {
                Ok(result) => result,
                Err(_) => Err(ToolSourceError::Transport(format!(
                    "tool call timed out after {}s",
                    deadline.as_secs()
                ))),
            },
            None => call.await,
        };

        match outcome {
            Ok(content) => {
                debug!(
                    step_id = %step.step_id,
                    tool = %step.tool_name,
                    attempt,
                    output = %truncate_for_log(&content.text, log_max_chars),
                    "tool call succeeded"
                );
                return ExecutionResult {
                    step_id: step.step_id,
                    tool_name: step.tool_name,
                    input: input_display,
                    status: StepStatus::Succeeded,
                    output: content.text,
                    attempts: attempt,
                };
            }
            Err(e) => {
                warn!(
                    step_id = %step.step_id,
                    tool = %step.tool_name,
                    attempt,
                    error = %e,
                    "tool call failed"
                );
                last_error = e.to_string();
            }
        }
    }

    ExecutionResult {
        step_id: step.step_id,
        tool_name: step.tool_name,
        input: input_display,
        status: StepStatus::Failed,
        output: last_error,
        attempts: max_attempts,
    }
}
