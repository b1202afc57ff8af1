//! Core types for declarative state reconciliation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DirectoryError;

/// Declared properties of an entity, keyed by attribute name
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// One declaratively-managed unit (a label, a project field, a view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identity used to match desired against actual
    pub key: String,
    /// Desired properties
    #[serde(default)]
    pub attributes: Attributes,
}

impl Entity {
    /// Create an entity with no attributes
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Get an attribute as a string slice, if it is a JSON string
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_str())
    }
}

/// An entity as currently observed on the remote resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualEntity {
    pub key: String,
    #[serde(default)]
    pub attributes: Attributes,
    /// Opaque handle required for update/delete calls
    pub remote_id: String,
}

impl ActualEntity {
    pub fn new(key: impl Into<String>, remote_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            attributes: Attributes::new(),
            remote_id: remote_id.into(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }
}

/// The kind of mutation applied to one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Error kind recorded for a failed entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Validation,
    Conflict,
    NotFound,
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Transport => "transport",
            FailureKind::Validation => "validation",
            FailureKind::Conflict => "conflict",
            FailureKind::NotFound => "not found",
            FailureKind::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

/// Why an entity operation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&DirectoryError> for FailureReason {
    fn from(err: &DirectoryError) -> Self {
        Self {
            kind: err.kind(),
            message: err.message().to_string(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Terminal outcome of one entity in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Created,
    Updated,
    /// Already matched the declared state
    Skipped,
    Deleted,
    Failed { reason: FailureReason },
}

impl Outcome {
    /// Check if the outcome represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the outcome represents a change on the remote
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Deleted)
    }
}

/// Result entry for a single entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityOutcome {
    pub key: String,
    pub outcome: Outcome,
    /// Remote id of the entity after the run, when known
    pub remote_id: Option<String>,
    /// True when an update hit "not found" and the entity was created instead
    pub recovered: bool,
}

/// Aggregate counts for a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCounts {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl ResultCounts {
    /// Number of entities a mutation was attempted for
    ///
    /// Always equals `to_create + to_update + to_delete` of the applied plan.
    pub fn applied(&self) -> usize {
        self.created + self.updated + self.deleted + self.failed
    }

    /// Total number of entities in the run, in-sync ones included
    pub fn total(&self) -> usize {
        self.applied() + self.skipped
    }

    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn add(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Deleted => self.deleted += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Outcome of applying a plan. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    outcomes: Vec<EntityOutcome>,
    counts: ResultCounts,
}

impl ReconciliationResult {
    pub(crate) fn from_outcomes(outcomes: Vec<EntityOutcome>) -> Self {
        let mut counts = ResultCounts::default();
        for entry in &outcomes {
            counts.add(&entry.outcome);
        }
        Self { outcomes, counts }
    }

    /// Every entity outcome, in processing order
    pub fn outcomes(&self) -> &[EntityOutcome] {
        &self.outcomes
    }

    pub fn counts(&self) -> ResultCounts {
        self.counts
    }

    /// Entries that failed, with their reasons
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FailureReason)> {
        self.outcomes.iter().filter_map(|e| match &e.outcome {
            Outcome::Failed { reason } => Some((e.key.as_str(), reason)),
            _ => None,
        })
    }

    /// Look up the outcome for a key
    pub fn get(&self, key: &str) -> Option<&EntityOutcome> {
        self.outcomes.iter().find(|e| e.key == key)
    }

    pub fn is_success(&self) -> bool {
        self.counts.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_builder() {
        let e = Entity::new("bug").with("color", "d73a4a");
        assert_eq!(e.key, "bug");
        assert_eq!(e.attr_str("color"), Some("d73a4a"));
        assert_eq!(e.attributes.get("color"), Some(&json!("d73a4a")));
        assert_eq!(e.attr_str("missing"), None);
    }

    #[test]
    fn test_counts_from_outcomes() {
        let failed = Outcome::Failed {
            reason: FailureReason {
                kind: FailureKind::Validation,
                message: "bad color".into(),
            },
        };
        let result = ReconciliationResult::from_outcomes(vec![
            entry("a", Outcome::Created),
            entry("b", Outcome::Skipped),
            entry("c", failed),
            entry("d", Outcome::Deleted),
        ]);

        let counts = result.counts();
        assert_eq!(counts.created, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.deleted, 1);
        assert_eq!(counts.applied(), 3);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.total_changes(), 2);
        assert!(!result.is_success());

        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "c");
        assert_eq!(failures[0].1.to_string(), "validation: bad color");
    }

    fn entry(key: &str, outcome: Outcome) -> EntityOutcome {
        EntityOutcome {
            key: key.into(),
            outcome,
            remote_id: None,
            recovered: false,
        }
    }
}
