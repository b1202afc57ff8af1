//! # Declarative
//!
//! Idempotent reconciliation of declared entities against a remote
//! directory.
//!
//! Given the desired set of named entities (labels, project fields, views)
//! and the set currently present on a remote resource, the crate computes
//! the minimal set of create/update/delete operations and applies them one
//! at a time, recording a per-entity outcome. Re-running with unchanged
//! inputs yields only skipped entries.
//!
//! ## Core Concepts
//!
//! - **Entity**: a declared unit identified by a stable key, with attributes
//! - **ActualEntity**: the same unit as observed remotely, plus a remote id
//! - **ReconciliationPlan**: creates, updates, deletes and in-sync keys,
//!   partitioned by key
//! - **ReconciliationResult**: per-entity outcomes and aggregate counts
//! - **RemoteDirectory**: the collaborator that lists and mutates entities
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{Entity, apply_simple, compute_plan};
//!
//! let desired = vec![
//!     Entity::new("bug").with("color", "d73a4a"),
//!     Entity::new("feature").with("color", "0052cc"),
//! ];
//! let actual = directory.list()?;
//!
//! let plan = compute_plan(&desired, &actual, false)?;
//! let result = apply_simple(&plan, &directory);
//! println!("{} created, {} failed", result.counts().created, result.counts().failed);
//! ```
//!
//! ## Failure Policy
//!
//! Planning errors ([`PlanError`]) abort before anything is mutated.
//! Errors raised while applying are isolated per entity: each one becomes a
//! `Failed` outcome and the run continues.

pub mod context;
pub mod diff;
pub mod directory;
pub mod error;
pub mod executor;
pub mod planner;
pub mod types;

// Re-export main types at crate root
pub use context::{NoProgress, ProgressCallback};
pub use diff::{AttributeChange, changed_attributes};
pub use directory::RemoteDirectory;
pub use error::{DirectoryError, PlanError, Side};
pub use executor::{apply, apply_simple};
pub use planner::{DeletePolicy, ReconciliationPlan, compute_plan, compute_plan_with};
pub use types::{
    ActualEntity, Attributes, Entity, EntityOutcome, FailureKind, FailureReason, Operation,
    Outcome, ReconciliationResult, ResultCounts,
};
