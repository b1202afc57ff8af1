//! End-to-end reconciliation against an in-memory directory

use declarative::{
    ActualEntity, DirectoryError, Entity, FailureKind, Outcome, PlanError, RemoteDirectory, Side,
    apply_simple, compute_plan,
};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory directory with scriptable per-key failures
#[derive(Default)]
struct FakeDirectory {
    items: RefCell<Vec<ActualEntity>>,
    next_id: RefCell<u32>,
    fail_create: HashMap<String, DirectoryError>,
    fail_update: HashMap<String, DirectoryError>,
    calls: RefCell<Vec<String>>,
}

impl FakeDirectory {
    fn with_items(items: Vec<ActualEntity>) -> Self {
        Self {
            items: RefCell::new(items),
            next_id: RefCell::new(100),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl RemoteDirectory for FakeDirectory {
    fn list(&self) -> Result<Vec<ActualEntity>, DirectoryError> {
        Ok(self.items.borrow().clone())
    }

    fn create(&self, entity: &Entity) -> Result<String, DirectoryError> {
        self.calls.borrow_mut().push(format!("create {}", entity.key));
        if let Some(err) = self.fail_create.get(&entity.key) {
            return Err(err.clone());
        }
        let mut next = self.next_id.borrow_mut();
        *next += 1;
        let id = next.to_string();
        self.items.borrow_mut().push(ActualEntity {
            key: entity.key.clone(),
            attributes: entity.attributes.clone(),
            remote_id: id.clone(),
        });
        Ok(id)
    }

    fn update(&self, remote_id: &str, entity: &Entity) -> Result<(), DirectoryError> {
        self.calls.borrow_mut().push(format!("update {}", entity.key));
        if let Some(err) = self.fail_update.get(&entity.key) {
            return Err(err.clone());
        }
        let mut items = self.items.borrow_mut();
        let item = items
            .iter_mut()
            .find(|i| i.remote_id == remote_id)
            .ok_or_else(|| DirectoryError::NotFound(remote_id.to_string()))?;
        item.attributes.extend(entity.attributes.clone());
        Ok(())
    }

    fn delete(&self, remote_id: &str) -> Result<(), DirectoryError> {
        self.calls.borrow_mut().push(format!("delete {remote_id}"));
        self.items.borrow_mut().retain(|i| i.remote_id != remote_id);
        Ok(())
    }
}

fn labels() -> Vec<Entity> {
    vec![
        Entity::new("bug").with("color", "d73a4a"),
        Entity::new("feature").with("color", "0052cc"),
    ]
}

#[test]
fn test_worked_example_update_and_create() {
    let actual = vec![ActualEntity::new("bug", "1").with("color", "ffffff")];
    let plan = compute_plan(&labels(), &actual, false).unwrap();

    assert_eq!(plan.to_create.len(), 1);
    assert_eq!(plan.to_create[0].key, "feature");
    assert_eq!(plan.to_update.len(), 1);
    assert_eq!(plan.to_update[0].0.attr_str("color"), Some("d73a4a"));
    assert_eq!(plan.to_update[0].1.remote_id, "1");
    assert!(plan.to_delete.is_empty());
}

#[test]
fn test_worked_example_delete_unlisted() {
    let actual = vec![
        ActualEntity::new("bug", "1").with("color", "d73a4a"),
        ActualEntity::new("legacy", "2").with("color", "000000"),
    ];
    let plan = compute_plan(&labels(), &actual, true).unwrap();

    assert_eq!(plan.to_create.len(), 1);
    assert_eq!(plan.to_create[0].key, "feature");
    assert!(plan.to_update.is_empty());
    assert_eq!(plan.to_delete.len(), 1);
    assert_eq!(plan.to_delete[0].key, "legacy");
    assert_eq!(plan.in_sync, vec!["bug".to_string()]);
}

#[test]
fn test_second_run_is_all_skipped() {
    let dir = FakeDirectory::with_items(vec![
        ActualEntity::new("bug", "1").with("color", "ffffff"),
        ActualEntity::new("legacy", "2").with("color", "000000"),
    ]);

    let first = compute_plan(&labels(), &dir.list().unwrap(), false).unwrap();
    let result = apply_simple(&first, &dir);
    assert_eq!(result.counts().created, 1);
    assert_eq!(result.counts().updated, 1);

    let second = compute_plan(&labels(), &dir.list().unwrap(), false).unwrap();
    assert!(second.to_create.is_empty());
    assert!(second.to_update.is_empty());
    assert!(second.to_delete.is_empty());

    let calls_before = dir.calls().len();
    let rerun = apply_simple(&second, &dir);
    assert_eq!(dir.calls().len(), calls_before);
    assert_eq!(rerun.counts().skipped, 2);
    assert!(
        rerun
            .outcomes()
            .iter()
            .all(|e| e.outcome == Outcome::Skipped)
    );
}

#[test]
fn test_keep_policy_never_deletes() {
    let actual: Vec<_> = (0..25)
        .map(|i| ActualEntity::new(format!("stale-{i}"), i.to_string()))
        .collect();
    let plan = compute_plan(&labels(), &actual, false).unwrap();
    assert!(plan.to_delete.is_empty());
    assert_eq!(plan.to_create.len(), 2);
}

#[test]
fn test_plan_partitions_by_key() {
    let desired = vec![
        Entity::new("a").with("v", 1),
        Entity::new("b").with("v", 2),
        Entity::new("c").with("v", 3),
    ];
    let actual = vec![
        ActualEntity::new("b", "2").with("v", 2),
        ActualEntity::new("c", "3").with("v", 30),
        ActualEntity::new("d", "4").with("v", 4),
    ];
    let plan = compute_plan(&desired, &actual, true).unwrap();

    let mut keys: Vec<_> = plan.keys().collect();
    let len = keys.len();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), len, "a key appeared in more than one list");
    assert_eq!(keys, vec!["a", "b", "c", "d"]);

    assert_eq!(plan.to_create[0].key, "a");
    assert_eq!(plan.in_sync, vec!["b".to_string()]);
    assert_eq!(plan.to_update[0].0.key, "c");
    assert_eq!(plan.to_delete[0].key, "d");
}

#[test]
fn test_duplicate_actual_key_aborts() {
    let actual = vec![ActualEntity::new("bug", "1"), ActualEntity::new("bug", "2")];
    let err = compute_plan(&labels(), &actual, false).unwrap_err();
    assert_eq!(
        err,
        PlanError::DuplicateKey {
            key: "bug".into(),
            side: Side::Actual
        }
    );
}

#[test]
fn test_validation_failure_is_isolated() {
    let mut dir = FakeDirectory::with_items(vec![
        ActualEntity::new("docs", "1").with("color", "ffffff"),
        ActualEntity::new("ok", "2").with("color", "111111"),
    ]);
    dir.fail_create.insert(
        "bad".into(),
        DirectoryError::Validation("color is invalid".into()),
    );

    let desired = vec![
        Entity::new("first").with("color", "aaaaaa"),
        Entity::new("bad").with("color", "zzzzzz"),
        Entity::new("last").with("color", "bbbbbb"),
        Entity::new("docs").with("color", "006b75"),
        Entity::new("ok").with("color", "111111"),
    ];
    let plan = compute_plan(&desired, &dir.list().unwrap(), false).unwrap();
    let result = apply_simple(&plan, &dir);

    assert_eq!(result.get("first").unwrap().outcome, Outcome::Created);
    assert_eq!(result.get("last").unwrap().outcome, Outcome::Created);
    assert_eq!(result.get("docs").unwrap().outcome, Outcome::Updated);
    assert_eq!(result.get("ok").unwrap().outcome, Outcome::Skipped);
    match &result.get("bad").unwrap().outcome {
        Outcome::Failed { reason } => {
            assert_eq!(reason.kind, FailureKind::Validation);
            assert_eq!(reason.message, "color is invalid");
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let counts = result.counts();
    assert_eq!(counts.applied(), plan.total_changes());
    assert_eq!(counts.skipped, plan.in_sync.len());
}

#[test]
fn test_update_not_found_falls_back_to_single_create() {
    let dir = FakeDirectory::with_items(vec![ActualEntity::new("bug", "1").with("color", "ffffff")]);
    let plan = compute_plan(&labels()[..1], &dir.list().unwrap(), false).unwrap();

    // deleted out-of-band between list() and apply()
    dir.items.borrow_mut().clear();

    let result = apply_simple(&plan, &dir);
    assert_eq!(
        dir.calls(),
        vec!["update bug".to_string(), "create bug".to_string()]
    );
    let entry = result.get("bug").unwrap();
    assert_eq!(entry.outcome, Outcome::Created);
    assert!(entry.recovered);
    assert_eq!(entry.remote_id.as_deref(), Some("101"));
}

#[test]
fn test_operations_run_create_update_delete_in_order() {
    let dir = FakeDirectory::with_items(vec![
        ActualEntity::new("old", "9"),
        ActualEntity::new("bug", "1").with("color", "ffffff"),
    ]);
    let desired = vec![
        Entity::new("zeta"),
        Entity::new("bug").with("color", "d73a4a"),
        Entity::new("alpha"),
    ];
    let plan = compute_plan(&desired, &dir.list().unwrap(), true).unwrap();
    apply_simple(&plan, &dir);

    assert_eq!(
        dir.calls(),
        vec![
            "create zeta".to_string(),
            "create alpha".to_string(),
            "update bug".to_string(),
            "delete 9".to_string(),
        ]
    );
}

#[test]
fn test_conflict_on_create_is_not_retried() {
    let mut dir = FakeDirectory::with_items(Vec::new());
    dir.fail_create.insert(
        "bug".into(),
        DirectoryError::Conflict("already_exists".into()),
    );
    dir.fail_update
        .insert("bug".into(), DirectoryError::Validation("unused".into()));

    let plan = compute_plan(&labels()[..1], &[], false).unwrap();
    let result = apply_simple(&plan, &dir);
    assert_eq!(dir.calls(), vec!["create bug".to_string()]);
    assert_eq!(result.counts().failed, 1);
}
