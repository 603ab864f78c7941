//! Level scheduling: partition the DAG into ordered execution levels.
//!
//! Iterative Kahn-style leveling over in-degree counts. Level 0 holds exactly
//! the steps with no dependencies; completing a level decrements the in-degree
//! of its dependents, and steps reaching zero form the next level. Within a
//! level, order is the original plan order (deterministic logging; correctness
//! does not depend on it).

use std::collections::HashMap;

use super::build::ExecutionGraph;

/// Computes the execution levels of a validated graph.
///
/// The graph is acyclic by construction, so every step is placed in exactly
/// one level and the number of levels equals the longest dependency chain.
pub fn levels(graph: &ExecutionGraph) -> Vec<Vec<String>> {
    let mut in_degree: HashMap<&str, usize> = graph
        .steps()
        .iter()
        .map(|s| (s.id.as_str(), graph.dependencies(&s.id).len()))
        .collect();

    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, to) in graph.edges() {
        dependents.entry(from.as_str()).or_default().push(to.as_str());
    }

    let mut leveled: Vec<Vec<String>> = Vec::new();
    let mut placed = 0usize;

    while placed < graph.len() {
        // Plan order makes the within-level order stable.
        let current: Vec<&str> = graph
            .steps()
            .iter()
            .map(|s| s.id.as_str())
            .filter(|id| in_degree.get(id) == Some(&0))
            .collect();
        debug_assert!(!current.is_empty(), "validated graph must always progress");

        for id in &current {
            in_degree.remove(id);
            if let Some(next) = dependents.get(id) {
                for n in next {
                    if let Some(d) = in_degree.get_mut(n) {
                        *d -= 1;
                    }
                }
            }
        }

        placed += current.len();
        leveled.push(current.into_iter().map(|s| s.to_string()).collect());
    }

    leveled
}
