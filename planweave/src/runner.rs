//! Plan runner: one-call API over the whole pipeline.
//!
//! `run(task)` asks the planner LLM for a complete plan (the available tools
//! are rendered into the system prompt), parses and validates it, executes the
//! levels through an [`ExecutionCoordinator`], and solves from the evidence.
//! The runner keeps a bounded conversation history (`max_history` messages)
//! across runs so follow-up tasks can build on earlier answers; the scheduling
//! core below it is stateless per run.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::coordinator::{ExecutionCoordinator, PlanOutcome, PlanRunError};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::plan::{parse_plan, PLANNER_SYSTEM};
use crate::solver::LlmSolver;
use crate::tool_source::{ToolSource, ToolSpec};

/// Renders the planner system prompt with the tool list appended.
fn render_planner_system(specs: &[ToolSpec]) -> String {
    let mut out = PLANNER_SYSTEM.to_string();
    if specs.is_empty() {
        return out;
    }
    out.push_str("\nAvailable tools:\n");
    for spec in specs {
        match &spec.description {
            Some(desc) => out.push_str(&format!("- {}: {}\n", spec.name, desc)),
            None => out.push_str(&format!("- {}\n", spec.name)),
        }
    }
    out
}

/// Plan-ahead runner: planner LLM → parser → coordinator → solver.
///
/// **Interaction**: The embedding application constructs one runner per
/// conversation with its [`LlmClient`], [`ToolSource`], and
/// [`SchedulerConfig`], then calls [`PlanRunner::run`] per user task.
pub struct PlanRunner {
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    config: SchedulerConfig,
    history: Vec<Message>,
}

impl PlanRunner {
    /// Creates a runner with the given LLM, tool source, and config.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<dyn ToolSource>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            llm,
            tools,
            config,
            history: Vec::new(),
        }
    }

    /// The retained conversation history (bounded by `max_history`).
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Plans, executes, and solves one task.
    ///
    /// # Errors
    ///
    /// Any [`PlanRunError`]: planner/parse/validation failures surface before
    /// execution; tool failures follow the configured policy; a solver failure
    /// surfaces after all levels completed.
    pub async fn run(&mut self, task: &str) -> Result<PlanOutcome, PlanRunError> {
        let specs = self.tools.list_tools().await?;
        let mut messages = vec![Message::system(render_planner_system(&specs))];
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(task));

        let response = self.llm.invoke(&messages).await?;
        debug!(plan = %response.content, "planner returned plan text");
        let steps = parse_plan(&response.content)?;
        info!(steps = steps.len(), "plan parsed");

        let solver = Arc::new(LlmSolver::new(Arc::clone(&self.llm)));
        let mut coordinator =
            ExecutionCoordinator::new(Arc::clone(&self.tools), solver, self.config.clone());
        let outcome = coordinator.execute(task, steps).await?;

        self.history.push(Message::user(task));
        self.history.push(Message::assistant(outcome.answer.clone()));
        if self.history.len() > self.config.max_history {
            let excess = self.history.len() - self.config.max_history;
            self.history.drain(..excess);
        }

        Ok(outcome)
    }
}
