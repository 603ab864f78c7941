//! Scheduler configuration surface.
//!
//! Loading (files, env) is the caller's job; the core only reads this struct.
//! All fields deserialize with defaults so callers can overlay a partial TOML
//! or JSON table onto `SchedulerConfig::default()`.

use serde::{Deserialize, Serialize};

fn default_tool_call_max_retries() -> u32 {
    3
}

fn default_raise_tool_call_error() -> bool {
    true
}

fn default_log_response_max_chars() -> usize {
    1000
}

fn default_max_history() -> usize {
    15
}

/// Configuration read by the scheduling core.
///
/// **Interaction**: Consumed by [`ToolExecutor`](crate::executor::ToolExecutor)
/// (retries, timeout, log truncation), [`ExecutionCoordinator`](crate::coordinator::ExecutionCoordinator)
/// (failure policy), and [`PlanRunner`](crate::runner::PlanRunner) (history bound).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum attempts per tool call before the step is marked Failed.
    #[serde(default = "default_tool_call_max_retries")]
    pub tool_call_max_retries: u32,
    /// When true (default), a Failed step aborts the remaining levels.
    /// When false, the error text becomes that step's evidence and execution continues.
    #[serde(default = "default_raise_tool_call_error")]
    pub raise_tool_call_error: bool,
    /// Maximum characters of tool input/output included in log events.
    #[serde(default = "default_log_response_max_chars")]
    pub log_response_max_chars: usize,
    /// Maximum conversation messages retained by the runner between runs.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Optional per-tool-call deadline in seconds; a timeout counts as a failed attempt.
    #[serde(default)]
    pub tool_call_timeout_secs: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tool_call_max_retries: default_tool_call_max_retries(),
            raise_tool_call_error: default_raise_tool_call_error(),
            log_response_max_chars: default_log_response_max_chars(),
            max_history: default_max_history(),
            tool_call_timeout_secs: None,
        }
    }
}
