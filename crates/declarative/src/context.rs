//! Progress callback trait
//!
//! Lets callers render progress without the reconciler depending on a
//! specific terminal UI.

use crate::types::{Operation, Outcome};

/// Progress callback for apply operations
///
/// Implement this trait to receive progress updates during apply.
pub trait ProgressCallback {
    /// Called before the entities of one operation kind are processed
    fn on_phase_start(&mut self, op: Operation, count: usize);

    /// Called when starting to apply a single entity
    fn on_entity_start(&mut self, op: Operation, key: &str);

    /// Called when an entity reaches its terminal outcome
    fn on_entity_complete(&mut self, key: &str, outcome: &Outcome);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&mut self, _op: Operation, _count: usize) {}
    fn on_entity_start(&mut self, _op: Operation, _key: &str) {}
    fn on_entity_complete(&mut self, _key: &str, _outcome: &Outcome) {}
}
