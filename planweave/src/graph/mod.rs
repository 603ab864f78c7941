//! Dependency graph: reference resolution, validation, and level scheduling.
//!
//! [`build_graph`] scans each step's input for placeholder tokens and turns
//! the parsed plan into a validated [`ExecutionGraph`] (acyclic, referentially
//! complete). [`levels`] partitions the graph into ordered execution levels:
//! every step lands strictly after all of its dependencies, and steps within a
//! level are independent and may run concurrently.

mod build;
mod level;

pub use build::{build_graph, placeholder_tokens, ExecutionGraph, ValidationError};
pub use level::levels;
