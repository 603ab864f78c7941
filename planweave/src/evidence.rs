//! Evidence: the insertion-ordered map from step id to resolved value.
//!
//! Grows monotonically during a run: once a step's value is recorded it is
//! never overwritten. Later levels read earlier entries through the
//! substitutor; the solver receives the full ordered list at the end.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One resolved step: id, tool, the substituted input that was sent, and the
/// value (tool output, or error text in degraded-continue mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// The step's placeholder id.
    pub step_id: String,
    /// Tool that produced the value.
    pub tool_name: String,
    /// The substituted input as dispatched.
    pub input: String,
    /// Resolved value (or error text, per the failure policy).
    pub value: String,
}

/// Insertion-ordered, insert-once evidence map.
///
/// **Interaction**: Owned exclusively by one
/// [`ExecutionCoordinator`](crate::coordinator::ExecutionCoordinator) per run;
/// read by the [substitutor](crate::substitute::substitute) and the
/// [`Solver`](crate::solver::Solver) boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    entries: Vec<EvidenceEntry>,
}

impl Evidence {
    /// Creates an empty evidence map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a step's value. Returns false (and keeps the first value) when
    /// the id is already present; the map never overwrites.
    pub fn record(&mut self, entry: EvidenceEntry) -> bool {
        if self.contains(&entry.step_id) {
            warn!(step_id = %entry.step_id, "evidence already recorded, keeping first value");
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Looks up a step's value by id.
    pub fn value(&self, step_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.step_id == step_id)
            .map(|e| e.value.as_str())
    }

    /// True when the given step id has a recorded value.
    pub fn contains(&self, step_id: &str) -> bool {
        self.entries.iter().any(|e| e.step_id == step_id)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[EvidenceEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, value: &str) -> EvidenceEntry {
        EvidenceEntry {
            step_id: id.to_string(),
            tool_name: "tool".to_string(),
            input: "input".to_string(),
            value: value.to_string(),
        }
    }

    /// **Scenario**: Recorded entries are retrievable by id and kept in insertion order.
    #[test]
    fn record_and_lookup_in_order() {
        let mut evidence = Evidence::new();
        assert!(evidence.record(entry("#E1", "one")));
        assert!(evidence.record(entry("#E2", "two")));
        assert_eq!(evidence.value("#E1"), Some("one"));
        assert_eq!(evidence.value("#E2"), Some("two"));
        assert_eq!(evidence.len(), 2);
        let ids: Vec<&str> = evidence.entries().iter().map(|e| e.step_id.as_str()).collect();
        assert_eq!(ids, ["#E1", "#E2"]);
    }

    /// **Scenario**: A second record for the same id is refused; the first value wins.
    #[test]
    fn record_never_overwrites() {
        let mut evidence = Evidence::new();
        assert!(evidence.record(entry("#E1", "first")));
        assert!(!evidence.record(entry("#E1", "second")));
        assert_eq!(evidence.value("#E1"), Some("first"));
        assert_eq!(evidence.len(), 1);
    }

    /// **Scenario**: Lookup of an unknown id returns None.
    #[test]
    fn missing_id_is_none() {
        let evidence = Evidence::new();
        assert!(evidence.is_empty());
        assert_eq!(evidence.value("#E1"), None);
        assert!(!evidence.contains("#E1"));
    }
}
