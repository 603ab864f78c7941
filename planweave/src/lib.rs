//! # Planweave
//!
//! A plan-ahead agent core in Rust. Instead of interleaving reasoning and
//! action, a Planweave run first obtains a **complete plan** from the LLM,
//! resolves the plan's internal references into a dependency DAG, executes
//! independent steps **concurrently level-by-level**, and finally synthesizes
//! the answer from the accumulated evidence.
//!
//! ## Design principles
//!
//! - **Plan once, then execute**: the plan is immutable after parsing; there
//!   is no re-planning mid-run.
//! - **Validated before dispatched**: undefined references, self-references,
//!   and cycles are rejected before any tool is invoked.
//! - **Level barrier**: steps of one level run as concurrent tasks; the next
//!   level starts only after every sibling reached a terminal state, so
//!   evidence reads are race-free by construction.
//! - **Explicit boundaries**: the LLM ([`LlmClient`]), the tools
//!   ([`ToolSource`]), and the solver ([`Solver`]) are injected trait objects;
//!   tests swap in [`MockLlm`] and [`MockToolSource`].
//!
//! ## Pipeline
//!
//! raw plan text → [`parse_plan`] → [`build_graph`] → [`levels`] →
//! [`ExecutionCoordinator`] (substitute → dispatch level → collect evidence)
//! → [`Solver`] → final answer. [`PlanRunner`] wires the whole pipeline
//! behind one `run(task)` call.
//!
//! ## Main modules
//!
//! - [`plan`]: [`PlanStep`], [`StepInput`], [`parse_plan`], planner/solver prompts.
//! - [`graph`]: [`ExecutionGraph`], [`build_graph`], [`levels`].
//! - [`substitute`]: placeholder replacement against the evidence map.
//! - [`evidence`]: [`Evidence`], [`EvidenceEntry`].
//! - [`executor`]: [`ToolExecutor`], [`ExecutionResult`], retry policy.
//! - [`coordinator`]: [`ExecutionCoordinator`], [`Phase`], [`PlanRunError`].
//! - [`solver`]: [`Solver`], [`LlmSolver`].
//! - [`runner`]: [`PlanRunner`].
//! - [`llm`]: [`LlmClient`], [`MockLlm`], [`ChatOpenAI`].
//! - [`tool_source`]: [`ToolSource`], [`ToolSpec`], [`MockToolSource`].
//! - [`tools`]: [`Tool`], [`ToolRegistry`].
//! - [`config`]: [`SchedulerConfig`].
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use planweave::{MockLlm, MockToolSource, PlanRunner, SchedulerConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let llm = Arc::new(MockLlm::with_script(vec![
//!     "Plan: Look it up.\n#E1 = search[what is rust]".to_string(),
//!     "Rust is a systems programming language.".to_string(),
//! ]));
//! let tools = Arc::new(MockToolSource::search_example());
//!
//! let mut runner = PlanRunner::new(llm, tools, SchedulerConfig::default());
//! let outcome = runner.run("what is rust").await.unwrap();
//! println!("{}", outcome.answer);
//! # }
//! ```
//!
//! Run the mock example: `cargo run -p planweave-examples --example plan_solve_mock`

pub mod config;
pub mod coordinator;
pub mod evidence;
pub mod executor;
pub mod graph;
pub mod llm;
pub mod message;
pub mod plan;
pub mod runner;
pub mod solver;
pub mod substitute;
pub mod tool_source;
pub mod tools;

pub use config::SchedulerConfig;
pub use coordinator::{ExecutionCoordinator, Phase, PlanOutcome, PlanRunError};
pub use evidence::{Evidence, EvidenceEntry};
pub use executor::{ExecutionResult, ReadyStep, StepStatus, ToolExecutor};
pub use graph::{build_graph, levels, placeholder_tokens, ExecutionGraph, ValidationError};
pub use llm::{ChatOpenAI, LlmClient, LlmError, LlmResponse, LlmUsage, MockLlm};
pub use message::Message;
pub use plan::{parse_plan, ParseError, PlanStep, StepInput, PLANNER_SYSTEM, SOLVER_SYSTEM};
pub use runner::PlanRunner;
pub use solver::{LlmSolver, Solver};
pub use substitute::{substitute, ContractViolation};
pub use tool_source::{MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{Tool, ToolRegistry};

/// When running `cargo test -p planweave`, initializes tracing from `RUST_LOG`
/// so that unit tests in `src/**` can print logs with `--nocapture`.
#[cfg(test)]
mod test_logging {
    use ctor::ctor;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::Layer;

    #[ctor]
    fn init() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_filter(filter),
            )
            .try_init();
    }
}
