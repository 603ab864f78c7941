//! Plan types, parser, and planner/solver prompts.
//!
//! A plan is the complete, immutable list of steps produced by the reasoning
//! LLM before any execution begins. Each step names an evidence placeholder
//! (`#E1`), a tool, and an input that may embed earlier placeholders.
//!
//! [`parse_plan`] turns raw plan text into `Vec<PlanStep>`;
//! [`build_graph`](crate::graph::build_graph) then resolves the placeholder
//! references into a dependency DAG.

mod parser;
mod prompt;
mod step;

pub use parser::{parse_plan, ParseError};
pub use prompt::{PLANNER_SYSTEM, SOLVER_SYSTEM};
pub use step::{PlanStep, StepInput};
