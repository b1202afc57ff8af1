//! Attribute-level diff between a desired and an actual entity

use crate::types::{ActualEntity, Entity};
use serde::{Deserialize, Serialize};

/// One declared attribute whose actual value differs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name
    pub name: String,
    /// Value on the remote, `None` when the attribute is missing there
    pub current: Option<serde_json::Value>,
    /// Declared value
    pub desired: serde_json::Value,
}

/// Compute the declared attributes that differ from the actual entity
///
/// Shallow comparison: each declared attribute is compared with `==`
/// against the attribute of the same name. Attributes only present on the
/// actual side are ignored, and a declared attribute missing on the actual
/// side counts as changed.
pub fn changed_attributes(desired: &Entity, actual: &ActualEntity) -> Vec<AttributeChange> {
    desired
        .attributes
        .iter()
        .filter_map(|(name, want)| {
            let have = actual.attributes.get(name);
            if have == Some(want) {
                None
            } else {
                Some(AttributeChange {
                    name: name.clone(),
                    current: have.cloned(),
                    desired: want.clone(),
                })
            }
        })
        .collect()
}

/// Whether every declared attribute matches the actual entity
pub fn matches(desired: &Entity, actual: &ActualEntity) -> bool {
    desired
        .attributes
        .iter()
        .all(|(name, want)| actual.attributes.get(name) == Some(want))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_attributes_reports_only_declared() {
        let desired = Entity::new("bug").with("color", "d73a4a");
        let actual = ActualEntity::new("bug", "1")
            .with("color", "ffffff")
            .with("description", "Something is broken");

        let changes = changed_attributes(&desired, &actual);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name, "color");
        assert_eq!(changes[0].current, Some(json!("ffffff")));
        assert_eq!(changes[0].desired, json!("d73a4a"));
    }

    #[test]
    fn test_missing_actual_attribute_is_a_change() {
        let desired = Entity::new("bug").with("description", "");
        let actual = ActualEntity::new("bug", "1");

        let changes = changed_attributes(&desired, &actual);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].current, None);
        assert!(!matches(&desired, &actual));
    }

    #[test]
    fn test_nested_values_compare_by_value() {
        let options = json!([{ "name": "High", "color": "RED" }]);
        let desired = Entity::new("Priority").with("options", options.clone());
        let actual = ActualEntity::new("Priority", "F_1").with("options", options);
        assert!(matches(&desired, &actual));

        let reordered = ActualEntity::new("Priority", "F_1").with(
            "options",
            json!([{ "name": "Low", "color": "GREEN" }, { "name": "High", "color": "RED" }]),
        );
        assert!(!matches(&desired, &reordered));
    }

    #[test]
    fn test_no_declared_attributes_always_matches() {
        let desired = Entity::new("Some issue");
        let actual = ActualEntity::new("Some issue", "12").with("state", "OPEN");
        assert!(matches(&desired, &actual));
        assert!(changed_attributes(&desired, &actual).is_empty());
    }
}
