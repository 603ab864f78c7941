//! Execution coordinator: the level loop and failure policy.
//!
//! Drives one plan execution as a state machine:
//! `NotStarted → Leveling → Executing(0) → … → Executing(N-1) → Solving → Done`,
//! with `Failed` reachable from any executing state. Levels never overlap:
//! the next level starts only after every result of the current level is
//! collected, so evidence written by level k is visible to every read in
//! level k+1 without extra locking.
//!
//! Failure policy: with `raise_tool_call_error` (default) a Failed step aborts
//! the run after its siblings finish, and the error carries the partial
//! evidence for diagnostics. In degraded-continue mode the failure text
//! becomes that step's evidence, so downstream steps receive it as input.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::evidence::{Evidence, EvidenceEntry};
use crate::executor::{ExecutionResult, ReadyStep, StepStatus, ToolExecutor};
use crate::graph::{build_graph, levels, ValidationError};
use crate::llm::LlmError;
use crate::plan::{ParseError, PlanStep};
use crate::solver::Solver;
use crate::substitute::{substitute, ContractViolation};
use crate::tool_source::ToolSource;

/// Coordinator state over one plan execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No plan accepted yet.
    NotStarted,
    /// Building the graph and computing levels.
    Leveling,
    /// Running level k.
    Executing(usize),
    /// All levels done; synthesizing the answer.
    Solving,
    /// Run finished with an answer.
    Done,
    /// Run aborted.
    Failed,
}

/// Errors from one plan-execute-solve run.
///
/// Parse and validation failures surface before any tool is invoked; a fatal
/// tool failure carries the partial evidence collected so far.
#[derive(Debug, Error)]
pub enum PlanRunError {
    /// Plan text was unusable.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Plan was parsed but structurally invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A step failed after exhausting retries (fail-fast mode only).
    #[error("tool call failed for step {step_id} ({tool_name}): {error}")]
    ToolExecution {
        /// The failed step's placeholder id.
        step_id: String,
        /// Tool that failed.
        tool_name: String,
        /// Last attempt's error text.
        error: String,
        /// Evidence accumulated before the abort, for diagnostics.
        evidence: Evidence,
    },
    /// Internal scheduling contract broken (a bug, not a user error).
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    /// Planner or solver boundary failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// Listing tools for the planner prompt failed.
    #[error("tool listing failed: {0}")]
    ToolListing(#[from] crate::tool_source::ToolSourceError),
}

/// Result of a completed run: the solver's answer plus everything collected
/// on the way.
#[derive(Debug)]
pub struct PlanOutcome {
    /// The solver's output, verbatim.
    pub answer: String,
    /// Full evidence map in execution order.
    pub evidence: Evidence,
    /// Per-step execution results across all levels.
    pub results: Vec<ExecutionResult>,
}

/// Drives the level loop for one plan execution.
///
/// Owns the evidence map and level cursor exclusively for the duration of a
/// run; create one coordinator per execution.
pub struct ExecutionCoordinator {
    executor: ToolExecutor,
    solver: Arc<dyn Solver>,
    config: SchedulerConfig,
    phase: Phase,
}

impl ExecutionCoordinator {
    /// Creates a coordinator over the given tool source, solver, and config.
    pub fn new(
        tools: Arc<dyn ToolSource>,
        solver: Arc<dyn Solver>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            executor: ToolExecutor::new(tools, &config),
            solver,
            config,
            phase: Phase::NotStarted,
        }
    }

    /// The coordinator's current (or terminal) phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Executes the parsed plan for the given task and returns the solved outcome.
    ///
    /// # Errors
    ///
    /// [`PlanRunError::Validation`] before any tool runs;
    /// [`PlanRunError::ToolExecution`] on a fatal step failure (with partial
    /// evidence); [`PlanRunError::Llm`] when the solver call fails.
    pub async fn execute(
        &mut self,
        task: &str,
        steps: Vec<PlanStep>,
    ) -> Result<PlanOutcome, PlanRunError> {
        self.set_phase(Phase::Leveling);
        let graph = match build_graph(steps) {
            Ok(graph) => graph,
            Err(e) => {
                self.set_phase(Phase::Failed);
                return Err(e.into());
            }
        };
        let level_plan = levels(&graph);
        info!(
            steps = graph.len(),
            levels = level_plan.len(),
            "plan validated and leveled"
        );

        let mut evidence = Evidence::new();
        let mut all_results: Vec<ExecutionResult> = Vec::new();

        for (k, level) in level_plan.iter().enumerate() {
            self.set_phase(Phase::Executing(k));

            let mut ready = Vec::with_capacity(level.len());
            for id in level {
                let step = match graph.step(id) {
                    Some(step) => step,
                    None => {
                        self.set_phase(Phase::Failed);
                        return Err(ContractViolation {
                            placeholder: id.clone(),
                        }
                        .into());
                    }
                };
                let input = match substitute(&step.raw_input, &evidence) {
                    Ok(input) => input,
                    Err(e) => {
                        self.set_phase(Phase::Failed);
                        return Err(e.into());
                    }
                };
                ready.push(ReadyStep {
                    step_id: step.id.clone(),
                    tool_name: step.tool_name.clone(),
                    input,
                });
            }

            let results = self.executor.execute_level(ready).await;

            // Record every sibling before deciding the abort, so the partial
            // evidence reflects the full level.
            let mut fatal: Option<(String, String, String)> = None;
            for result in &results {
                match result.status {
                    StepStatus::Succeeded => {
                        evidence.record(EvidenceEntry {
                            step_id: result.step_id.clone(),
                            tool_name: result.tool_name.clone(),
                            input: result.input.clone(),
                            value: result.output.clone(),
                        });
                    }
                    StepStatus::Failed if self.config.raise_tool_call_error => {
                        if fatal.is_none() {
                            fatal = Some((
                                result.step_id.clone(),
                                result.tool_name.clone(),
                                result.output.clone(),
                            ));
                        }
                    }
                    StepStatus::Failed => {
                        warn!(
                            step_id = %result.step_id,
                            tool = %result.tool_name,
                            "recording failure as evidence (degraded-continue)"
                        );
                        evidence.record(EvidenceEntry {
                            step_id: result.step_id.clone(),
                            tool_name: result.tool_name.clone(),
                            input: result.input.clone(),
                            value: result.output.clone(),
                        });
                    }
                }
            }
            all_results.extend(results);

            if let Some((step_id, tool_name, error)) = fatal {
                self.set_phase(Phase::Failed);
                return Err(PlanRunError::ToolExecution {
                    step_id,
                    tool_name,
                    error,
                    evidence,
                });
            }
        }

        self.set_phase(Phase::Solving);
        let answer = match self.solver.solve(task, &evidence).await {
            Ok(answer) => answer,
            Err(e) => {
                self.set_phase(Phase::Failed);
                return Err(e.into());
            }
        };
        self.set_phase(Phase::Done);

        Ok(PlanOutcome {
            answer,
            evidence,
            results: all_results,
        })
    }

    fn set_phase(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "coordinator transition");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{PlanStep, StepInput};
    use crate::solver::Solver;
    use crate::tool_source::MockToolSource;
    use async_trait::async_trait;

    /// Solver that returns a fixed answer; solving itself is tested in `solver`.
    struct StaticSolver(&'static str);

    #[async_trait]
    impl Solver for StaticSolver {
        async fn solve(&self, _task: &str, _evidence: &Evidence) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn text_step(id: &str, tool: &str, input: &str) -> PlanStep {
        PlanStep {
            id: id.to_string(),
            description: String::new(),
            tool_name: tool.to_string(),
            raw_input: StepInput::Text(input.to_string()),
        }
    }

    fn coordinator(
        tools: Arc<MockToolSource>,
        config: SchedulerConfig,
    ) -> ExecutionCoordinator {
        ExecutionCoordinator::new(tools, Arc::new(StaticSolver("answer")), config)
    }

    /// **Scenario**: A two-level plan executes, accumulates evidence in order, and solves.
    #[tokio::test]
    async fn two_level_plan_runs_to_done() {
        let tools = Arc::new(
            MockToolSource::new()
                .with_tool_result("search", "rust is a language")
                .with_tool_result("summarize", "short summary"),
        );
        let mut coordinator = coordinator(Arc::clone(&tools), SchedulerConfig::default());
        let outcome = coordinator
            .execute(
                "what is rust",
                vec![
                    text_step("#E1", "search", "what is rust"),
                    text_step("#E2", "summarize", "condense: #E1"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(outcome.answer, "answer");
        assert_eq!(outcome.evidence.len(), 2);
        assert_eq!(outcome.evidence.value("#E1"), Some("rust is a language"));
        assert_eq!(*coordinator.phase(), Phase::Done);

        // #E2 must have seen #E1's value, not the placeholder.
        let calls = tools.recorded_calls();
        let summarize_call = calls.iter().find(|(n, _)| n == "summarize").unwrap();
        assert_eq!(
            summarize_call.1,
            serde_json::Value::String("condense: rust is a language".to_string())
        );
    }

    /// **Scenario**: A structurally invalid plan fails before any tool is invoked.
    #[tokio::test]
    async fn validation_failure_runs_no_tools() {
        let tools = Arc::new(MockToolSource::new().with_tool_result("search", "x"));
        let mut coordinator = coordinator(Arc::clone(&tools), SchedulerConfig::default());
        let err = coordinator
            .execute("task", vec![text_step("#E1", "search", "uses #E7")])
            .await
            .unwrap_err();
        assert!(matches!(err, PlanRunError::Validation(_)));
        assert!(tools.recorded_calls().is_empty());
        assert_eq!(*coordinator.phase(), Phase::Failed);
    }

    /// **Scenario**: Fail-fast: X fails while sibling Y succeeds; the error carries
    /// Y's evidence and the next level is never dispatched.
    #[tokio::test]
    async fn fail_fast_aborts_after_level_barrier() {
        let tools = Arc::new(
            MockToolSource::new()
                .with_failing_tool("broken", "boom")
                .with_tool_result("search", "sibling result")
                .with_tool_result("summarize", "never used"),
        );
        let mut coordinator = coordinator(Arc::clone(&tools), SchedulerConfig::default());
        let err = coordinator
            .execute(
                "task",
                vec![
                    text_step("#E1", "broken", "x"),
                    text_step("#E2", "search", "y"),
                    text_step("#E3", "summarize", "join #E1 #E2"),
                ],
            )
            .await
            .unwrap_err();

        match err {
            PlanRunError::ToolExecution {
                step_id,
                tool_name,
                error,
                evidence,
            } => {
                assert_eq!(step_id, "#E1");
                assert_eq!(tool_name, "broken");
                assert!(error.contains("boom"));
                assert_eq!(evidence.value("#E2"), Some("sibling result"));
                assert!(!evidence.contains("#E1"));
            }
            other => panic!("expected ToolExecution, got {:?}", other),
        }
        assert_eq!(tools.attempts("summarize"), 0, "level 1 must never start");
        assert_eq!(*coordinator.phase(), Phase::Failed);
    }

    /// **Scenario**: Degraded-continue: the failure text becomes evidence and the
    /// dependent step receives it as input.
    #[tokio::test]
    async fn degraded_continue_propagates_error_text() {
        let tools = Arc::new(
            MockToolSource::new()
                .with_failing_tool("broken", "boom")
                .with_tool_result("summarize", "made do"),
        );
        let config = SchedulerConfig {
            raise_tool_call_error: false,
            ..SchedulerConfig::default()
        };
        let mut coordinator = coordinator(Arc::clone(&tools), config);
        let outcome = coordinator
            .execute(
                "task",
                vec![
                    text_step("#E1", "broken", "x"),
                    text_step("#E2", "summarize", "given #E1"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(outcome.answer, "answer");
        let e1 = outcome.evidence.value("#E1").unwrap();
        assert!(e1.contains("boom"));

        let calls = tools.recorded_calls();
        let summarize_call = calls.iter().find(|(n, _)| n == "summarize").unwrap();
        let input = summarize_call.1.as_str().unwrap();
        assert!(input.contains("boom"), "downstream input: {}", input);
        assert_eq!(*coordinator.phase(), Phase::Done);
    }

    /// **Scenario**: An unknown tool name follows the normal failure policy.
    /// MockToolSource answers any name, so this uses an empty registry for NotFound.
    #[tokio::test]
    async fn unknown_tool_is_policy_failure() {
        let registry = crate::tools::ToolRegistry::new();
        let mut coordinator = ExecutionCoordinator::new(
            Arc::new(registry),
            Arc::new(StaticSolver("answer")),
            SchedulerConfig::default(),
        );
        let err = coordinator
            .execute("task", vec![text_step("#E1", "ghost", "x")])
            .await
            .unwrap_err();
        match err {
            PlanRunError::ToolExecution { tool_name, error, .. } => {
                assert_eq!(tool_name, "ghost");
                assert!(error.contains("not found"), "{}", error);
            }
            other => panic!("expected ToolExecution, got {:?}", other),
        }
    }

    /// **Scenario**: An empty step list solves immediately with empty evidence.
    #[tokio::test]
    async fn empty_plan_solves_with_no_evidence() {
        let tools = Arc::new(MockToolSource::new());
        let mut coordinator = coordinator(tools, SchedulerConfig::default());
        let outcome = coordinator.execute("task", vec![]).await.unwrap();
        assert!(outcome.evidence.is_empty());
        assert_eq!(outcome.answer, "answer");
        assert_eq!(*coordinator.phase(), Phase::Done);
    }
}
