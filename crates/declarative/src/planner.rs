//! Reconciliation planner - computes the minimal set of mutations

use crate::diff;
use crate::error::{PlanError, Side};
use crate::types::{ActualEntity, Entity};
use std::collections::{HashMap, HashSet};

/// Which actual entities absent from the desired set get deleted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Leave unknown actual entities alone
    #[default]
    Keep,
    /// Delete every actual entity that is not desired
    Unlisted,
    /// Delete only these keys, and only when they are not also desired
    Listed(Vec<String>),
}

impl DeletePolicy {
    fn selects(&self, key: &str) -> bool {
        match self {
            DeletePolicy::Keep => false,
            DeletePolicy::Unlisted => true,
            DeletePolicy::Listed(keys) => keys.iter().any(|k| k == key),
        }
    }
}

/// The mutations needed to converge actual state to desired state
///
/// The four lists partition by key: no key appears in more than one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Desired entities with no actual counterpart
    pub to_create: Vec<Entity>,
    /// Desired entities whose declared attributes differ, paired with the
    /// actual entity they replace
    pub to_update: Vec<(Entity, ActualEntity)>,
    /// Actual entities selected for removal by the delete policy
    pub to_delete: Vec<ActualEntity>,
    /// Keys of desired entities that already match
    pub in_sync: Vec<String>,
}

impl ReconciliationPlan {
    /// Number of mutations the plan would issue
    pub fn total_changes(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }

    /// Check if applying the plan would change nothing
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }

    /// Every key the plan mentions, in create/update/delete/in-sync order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.to_create
            .iter()
            .map(|e| e.key.as_str())
            .chain(self.to_update.iter().map(|(e, _)| e.key.as_str()))
            .chain(self.to_delete.iter().map(|a| a.key.as_str()))
            .chain(self.in_sync.iter().map(String::as_str))
    }
}

/// Compute a plan, deleting unlisted actual entities only when asked to
///
/// Pure and deterministic. Fails when either input holds a duplicate key.
pub fn compute_plan(
    desired: &[Entity],
    actual: &[ActualEntity],
    delete_unlisted: bool,
) -> Result<ReconciliationPlan, PlanError> {
    let policy = if delete_unlisted {
        DeletePolicy::Unlisted
    } else {
        DeletePolicy::Keep
    };
    compute_plan_with(desired, actual, &policy)
}

/// Compute a plan under an explicit delete policy
pub fn compute_plan_with(
    desired: &[Entity],
    actual: &[ActualEntity],
    policy: &DeletePolicy,
) -> Result<ReconciliationPlan, PlanError> {
    let mut by_key: HashMap<&str, &ActualEntity> = HashMap::with_capacity(actual.len());
    for entity in actual {
        if by_key.insert(entity.key.as_str(), entity).is_some() {
            return Err(PlanError::DuplicateKey {
                key: entity.key.clone(),
                side: Side::Actual,
            });
        }
    }

    let mut desired_keys: HashSet<&str> = HashSet::with_capacity(desired.len());
    let mut plan = ReconciliationPlan::default();

    for entity in desired {
        if !desired_keys.insert(entity.key.as_str()) {
            return Err(PlanError::DuplicateKey {
                key: entity.key.clone(),
                side: Side::Desired,
            });
        }

        match by_key.get(entity.key.as_str()) {
            None => plan.to_create.push(entity.clone()),
            Some(current) if diff::matches(entity, current) => {
                plan.in_sync.push(entity.key.clone());
            }
            Some(current) => plan.to_update.push((entity.clone(), (*current).clone())),
        }
    }

    plan.to_delete = actual
        .iter()
        .filter(|a| !desired_keys.contains(a.key.as_str()) && policy.selects(&a.key))
        .cloned()
        .collect();

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_policy_ignores_desired_keys() {
        let desired = vec![Entity::new("question")];
        let actual = vec![
            ActualEntity::new("question", "1"),
            ActualEntity::new("invalid", "2"),
            ActualEntity::new("help wanted", "3"),
        ];
        let policy = DeletePolicy::Listed(vec!["question".into(), "invalid".into()]);

        let plan = compute_plan_with(&desired, &actual, &policy).unwrap();
        let deleted: Vec<_> = plan.to_delete.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(deleted, vec!["invalid"]);
        assert_eq!(plan.in_sync, vec!["question".to_string()]);
    }

    #[test]
    fn test_listed_policy_missing_key_is_noop() {
        let policy = DeletePolicy::Listed(vec!["wontfix".into()]);
        let plan = compute_plan_with(&[], &[ActualEntity::new("bug", "1")], &policy).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_duplicate_desired_key() {
        let desired = vec![Entity::new("bug"), Entity::new("bug")];
        let err = compute_plan(&desired, &[], false).unwrap_err();
        assert_eq!(
            err,
            PlanError::DuplicateKey {
                key: "bug".into(),
                side: Side::Desired
            }
        );
    }

    #[test]
    fn test_keys_order() {
        let desired = vec![
            Entity::new("new"),
            Entity::new("changed").with("color", "000000"),
            Entity::new("same"),
        ];
        let actual = vec![
            ActualEntity::new("changed", "1").with("color", "ffffff"),
            ActualEntity::new("same", "2"),
            ActualEntity::new("old", "3"),
        ];
        let plan = compute_plan(&desired, &actual, true).unwrap();
        let keys: Vec<_> = plan.keys().collect();
        assert_eq!(keys, vec!["new", "changed", "old", "same"]);
        assert_eq!(plan.total_changes(), 3);
    }
}
