//! Reference resolution and graph validation.
//!
//! Scans each step's authored input for placeholder tokens (`#E1`-style),
//! builds dependency edges, and validates the result: every referenced id
//! must name a step, no step may reference itself, and the edges must form a
//! DAG. A cycle is reported with its full path so the caller can see at least
//! one offending member.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::plan::{PlanStep, StepInput};

/// The parsed plan is structurally invalid; surfaced before any execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A step's input embeds a placeholder that no step defines.
    #[error("step {from} references undefined id {to}")]
    UndefinedReference { from: String, to: String },
    /// A step's input embeds its own placeholder.
    #[error("step {0} references itself")]
    SelfReference(String),
    /// The reference edges contain a cycle; the path names its members.
    #[error("plan contains a dependency cycle: {0}")]
    CyclicPlan(String),
}

/// Matches placeholder tokens (`#` + identifier) inside step inputs.
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#[A-Za-z][A-Za-z0-9_]*").expect("valid regex literal"))
}

/// Returns the placeholder tokens embedded in a step input, in order of first
/// occurrence, deduplicated.
///
/// Text inputs are scanned as one string; structured inputs are scanned per
/// string leaf (array elements and object values, recursively).
pub fn placeholder_tokens(input: &StepInput) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut seen = HashSet::new();
    match input {
        StepInput::Text(text) => scan_text(text, &mut tokens, &mut seen),
        StepInput::Structured(value) => scan_value(value, &mut tokens, &mut seen),
    }
    tokens
}

fn scan_text(text: &str, tokens: &mut Vec<String>, seen: &mut HashSet<String>) {
    for m in placeholder_re().find_iter(text) {
        if seen.insert(m.as_str().to_string()) {
            tokens.push(m.as_str().to_string());
        }
    }
}

fn scan_value(value: &serde_json::Value, tokens: &mut Vec<String>, seen: &mut HashSet<String>) {
    match value {
        serde_json::Value::String(s) => scan_text(s, tokens, seen),
        serde_json::Value::Array(items) => {
            for item in items {
                scan_value(item, tokens, seen);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values() {
                scan_value(item, tokens, seen);
            }
        }
        _ => {}
    }
}

/// The validated dependency DAG over a plan's steps.
///
/// Edges follow the completion order convention: `(from, to)` means `from`
/// must complete before `to` can run.
///
/// **Interaction**: Produced by [`build_graph`]; consumed by
/// [`levels`](crate::graph::levels) and the coordinator.
#[derive(Debug, Clone)]
pub struct ExecutionGraph {
    steps: Vec<PlanStep>,
    edges: Vec<(String, String)>,
    deps: HashMap<String, Vec<String>>,
}

impl ExecutionGraph {
    /// All steps in original plan order.
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Looks up a step by its placeholder id.
    pub fn step(&self, id: &str) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// All dependency edges `(prerequisite, dependent)`.
    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// The prerequisite ids of the given step (empty when unknown or independent).
    pub fn dependencies(&self, id: &str) -> &[String] {
        self.deps.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Number of steps in the graph.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the graph holds no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Resolves references and validates the plan into an [`ExecutionGraph`].
///
/// # Errors
///
/// [`ValidationError::UndefinedReference`] names both the referencing step and
/// the missing id; [`ValidationError::SelfReference`] and
/// [`ValidationError::CyclicPlan`] reject degenerate dependency shapes. On
/// success the graph is guaranteed acyclic and fully resolvable.
pub fn build_graph(steps: Vec<PlanStep>) -> Result<ExecutionGraph, ValidationError> {
    let ids: HashSet<&str> = steps.iter().map(|s| s.id.as_str()).collect();

    let mut edges: Vec<(String, String)> = Vec::new();
    let mut deps: HashMap<String, Vec<String>> = HashMap::new();

    for step in &steps {
        for token in placeholder_tokens(&step.raw_input) {
            if token == step.id {
                return Err(ValidationError::SelfReference(step.id.clone()));
            }
            if !ids.contains(token.as_str()) {
                return Err(ValidationError::UndefinedReference {
                    from: step.id.clone(),
                    to: token,
                });
            }
            let entry = deps.entry(step.id.clone()).or_default();
            if !entry.contains(&token) {
                entry.push(token.clone());
                edges.push((token, step.id.clone()));
            }
        }
    }

    check_acyclic(&steps, &edges)?;

    Ok(ExecutionGraph { steps, edges, deps })
}

/// Depth-first cycle check with an explicit visiting stack; the first cycle
/// found is reported with its full path.
fn check_acyclic<'a>(
    steps: &'a [PlanStep],
    edges: &'a [(String, String)],
) -> Result<(), ValidationError> {
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, to) in edges {
        dependents.entry(from.as_str()).or_default().push(to.as_str());
    }

    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Visiting,
        Visited,
    }

    fn visit<'a>(
        node: &'a str,
        dependents: &HashMap<&'a str, Vec<&'a str>>,
        states: &mut HashMap<&'a str, State>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        states.insert(node, State::Visiting);
        stack.push(node);

        if let Some(next) = dependents.get(node) {
            for &n in next {
                match states.get(n) {
                    Some(State::Visiting) => {
                        let start = stack.iter().position(|&s| s == n).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            stack[start..].iter().map(|s| s.to_string()).collect();
                        cycle.push(n.to_string());
                        return Some(cycle);
                    }
                    Some(State::Visited) => {}
                    None => {
                        if let Some(cycle) = visit(n, dependents, states, stack) {
                            return Some(cycle);
                        }
                    }
                }
            }
        }

        stack.pop();
        states.insert(node, State::Visited);
        None
    }

    let mut states: HashMap<&str, State> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();
    for step in steps {
        if states.contains_key(step.id.as_str()) {
            continue;
        }
        if let Some(cycle) = visit(&step.id, &dependents, &mut states, &mut stack) {
            return Err(ValidationError::CyclicPlan(cycle.join(" -> ")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::StepInput;

    fn step(id: &str, input: StepInput) -> PlanStep {
        PlanStep {
            id: id.to_string(),
            description: String::new(),
            tool_name: "tool".to_string(),
            raw_input: input,
        }
    }

    fn text_step(id: &str, input: &str) -> PlanStep {
        step(id, StepInput::Text(input.to_string()))
    }

    /// **Scenario**: Token scan finds each placeholder once, in order of first occurrence.
    #[test]
    fn placeholder_tokens_text_dedup_in_order() {
        let input = StepInput::Text("merge #E2 with #E1 and #E2 again".to_string());
        assert_eq!(placeholder_tokens(&input), ["#E2", "#E1"]);
    }

    /// **Scenario**: Token scan descends into structured string leaves, arrays included.
    #[test]
    fn placeholder_tokens_structured_leaves() {
        let input = StepInput::Structured(serde_json::json!({
            "url": "#E1",
            "headers": {"auth": "#E2"},
            "parts": ["#E3", 42, null]
        }));
        let tokens = placeholder_tokens(&input);
        assert_eq!(tokens.len(), 3);
        for t in ["#E1", "#E2", "#E3"] {
            assert!(tokens.contains(&t.to_string()), "missing {}", t);
        }
    }

    /// **Scenario**: A valid diamond builds with both edges into the join step.
    #[test]
    fn build_graph_diamond() {
        let graph = build_graph(vec![
            text_step("#E1", "left"),
            text_step("#E2", "right"),
            text_step("#E3", "join #E1 #E2"),
        ])
        .unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependencies("#E3"), ["#E1", "#E2"]);
        assert!(graph.dependencies("#E1").is_empty());
        assert_eq!(graph.edges().len(), 2);
    }

    /// **Scenario**: A reference to an undefined id names both the referencing and missing ids.
    #[test]
    fn build_graph_undefined_reference() {
        let err = build_graph(vec![text_step("#E1", "use #E9")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UndefinedReference {
                from: "#E1".to_string(),
                to: "#E9".to_string()
            }
        );
    }

    /// **Scenario**: A step embedding its own id is a self-reference.
    #[test]
    fn build_graph_self_reference() {
        let err = build_graph(vec![text_step("#E1", "again #E1")]).unwrap_err();
        assert_eq!(err, ValidationError::SelfReference("#E1".to_string()));
    }

    /// **Scenario**: A two-step cycle is rejected and the error names a cycle member.
    #[test]
    fn build_graph_two_step_cycle() {
        let err = build_graph(vec![
            text_step("#E1", "needs #E2"),
            text_step("#E2", "needs #E1"),
        ])
        .unwrap_err();
        match err {
            ValidationError::CyclicPlan(path) => {
                assert!(path.contains("#E1"), "{}", path);
                assert!(path.contains("#E2"), "{}", path);
            }
            other => panic!("expected CyclicPlan, got {:?}", other),
        }
    }

    /// **Scenario**: A cycle buried in a larger graph is still found.
    #[test]
    fn build_graph_cycle_in_subgraph() {
        let err = build_graph(vec![
            text_step("#E1", "independent"),
            text_step("#E2", "needs #E3"),
            text_step("#E3", "needs #E4"),
            text_step("#E4", "needs #E2"),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::CyclicPlan(_)));
    }

    /// **Scenario**: Repeated references to the same step produce a single edge.
    #[test]
    fn build_graph_dedups_repeated_references() {
        let graph = build_graph(vec![
            text_step("#E1", "base"),
            text_step("#E2", "#E1 and #E1 once more"),
        ])
        .unwrap();
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.dependencies("#E2"), ["#E1"]);
    }
}
