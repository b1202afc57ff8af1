//! Apply engine - converges a remote directory to a computed plan

use crate::context::{NoProgress, ProgressCallback};
use crate::directory::RemoteDirectory;
use crate::planner::ReconciliationPlan;
use crate::types::{EntityOutcome, FailureReason, Operation, Outcome, ReconciliationResult};

/// Apply a plan against a remote directory
///
/// Creates run first, then updates, then deletes, each list in the order
/// given. Calls are sequential. A failure on one entity is recorded and
/// processing continues with the next one; nothing is retried, except that
/// an update answered with "not found" is attempted once as a create.
///
/// Keys in `plan.in_sync` are recorded as skipped without touching the
/// remote.
pub fn apply<D, P>(plan: &ReconciliationPlan, client: &D, progress: &mut P) -> ReconciliationResult
where
    D: RemoteDirectory + ?Sized,
    P: ProgressCallback + ?Sized,
{
    let mut outcomes = Vec::with_capacity(plan.total_changes() + plan.in_sync.len());

    if !plan.to_create.is_empty() {
        progress.on_phase_start(Operation::Create, plan.to_create.len());
        for entity in &plan.to_create {
            progress.on_entity_start(Operation::Create, &entity.key);
            let entry = match client.create(entity) {
                Ok(remote_id) => done(&entity.key, Outcome::Created, Some(remote_id)),
                Err(e) => failed(&entity.key, &e),
            };
            progress.on_entity_complete(&entry.key, &entry.outcome);
            outcomes.push(entry);
        }
    }

    if !plan.to_update.is_empty() {
        progress.on_phase_start(Operation::Update, plan.to_update.len());
        for (desired, current) in &plan.to_update {
            progress.on_entity_start(Operation::Update, &desired.key);
            let entry = match client.update(&current.remote_id, desired) {
                Ok(()) => done(
                    &desired.key,
                    Outcome::Updated,
                    Some(current.remote_id.clone()),
                ),
                Err(e) if e.is_not_found() => {
                    log::warn!(
                        "'{}' vanished before it could be updated, creating it instead",
                        desired.key
                    );
                    progress.on_entity_start(Operation::Create, &desired.key);
                    match client.create(desired) {
                        Ok(remote_id) => EntityOutcome {
                            recovered: true,
                            ..done(&desired.key, Outcome::Created, Some(remote_id))
                        },
                        Err(e) => failed(&desired.key, &e),
                    }
                }
                Err(e) => failed(&desired.key, &e),
            };
            progress.on_entity_complete(&entry.key, &entry.outcome);
            outcomes.push(entry);
        }
    }

    if !plan.to_delete.is_empty() {
        progress.on_phase_start(Operation::Delete, plan.to_delete.len());
        for current in &plan.to_delete {
            progress.on_entity_start(Operation::Delete, &current.key);
            let entry = match client.delete(&current.remote_id) {
                Ok(()) => done(&current.key, Outcome::Deleted, None),
                Err(e) if e.is_not_found() => {
                    log::info!("'{}' was already gone", current.key);
                    done(&current.key, Outcome::Deleted, None)
                }
                Err(e) => failed(&current.key, &e),
            };
            progress.on_entity_complete(&entry.key, &entry.outcome);
            outcomes.push(entry);
        }
    }

    for key in &plan.in_sync {
        outcomes.push(done(key, Outcome::Skipped, None));
    }

    ReconciliationResult::from_outcomes(outcomes)
}

/// Apply without progress reporting
pub fn apply_simple<D>(plan: &ReconciliationPlan, client: &D) -> ReconciliationResult
where
    D: RemoteDirectory + ?Sized,
{
    apply(plan, client, &mut NoProgress)
}

fn done(key: &str, outcome: Outcome, remote_id: Option<String>) -> EntityOutcome {
    EntityOutcome {
        key: key.to_string(),
        outcome,
        remote_id,
        recovered: false,
    }
}

fn failed(key: &str, err: &crate::error::DirectoryError) -> EntityOutcome {
    log::debug!("'{key}' failed: {err}");
    done(
        key,
        Outcome::Failed {
            reason: FailureReason::from(err),
        },
        None,
    )
}
