//! Project views, compared but never mutated
//!
//! The GraphQL API has no mutation for creating or editing views, so the
//! views plan only drives a printed setup guide.

use declarative::{ActualEntity, Entity};
use ghkit::{Project, ProjectField};
use std::collections::HashSet;

use crate::manifest::{BoardManifest, ViewSpec};

/// Desired views keyed by name, compared on layout
pub fn desired(manifest: &BoardManifest) -> Vec<Entity> {
    manifest
        .views
        .iter()
        .map(|v| Entity::new(&v.name).with("layout", v.layout.as_graphql()))
        .collect()
}

/// Views currently saved on the project
///
/// View names are not unique on GitHub; the first view with a name wins.
pub fn actual(project: &Project) -> Vec<ActualEntity> {
    let mut seen = HashSet::new();
    project
        .views
        .iter()
        .filter(|v| seen.insert(v.name.as_str()))
        .map(|v| ActualEntity::new(&v.name, &v.id).with("layout", v.layout.as_str()))
        .collect()
}

/// Fields a view refers to (group by, sort by, visible) that the project
/// does not have
pub fn missing_fields<'v>(view: &'v ViewSpec, fields: &[ProjectField]) -> Vec<&'v str> {
    let mut missing = Vec::new();
    let referenced = view
        .group_by
        .iter()
        .chain(view.sort_by.iter())
        .chain(view.fields.iter());
    for name in referenced {
        if !fields.iter().any(|f| f.name == *name) && !missing.contains(&name.as_str()) {
            missing.push(name.as_str());
        }
    }
    missing
}
