//! Custom project fields as reconcilable entities
//!
//! Key is the field name. Attributes are `data_type` and, for single-select
//! fields, `options` (ordered `{name, color, description}` objects). Built-in
//! fields such as Title, Assignees or Status are never listed, so pruning
//! cannot touch them.

use declarative::{ActualEntity, DirectoryError, Entity, RemoteDirectory};
use ghkit::{BUILTIN_FIELDS, Client, FieldDataType, FieldInput, FieldOption, Project, ProjectField};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

use super::directory_error;
use crate::manifest::{BoardManifest, FieldSpec};

pub struct FieldDirectory<'a> {
    client: &'a Client,
    owner: &'a str,
    number: u64,
    project: Project,
    /// Data type per field id, as of the last `list()`
    known_types: RefCell<HashMap<String, FieldDataType>>,
}

impl<'a> FieldDirectory<'a> {
    /// Resolve the project so mutations can address it by node id
    pub fn connect(client: &'a Client, owner: &'a str, number: u64) -> ghkit::Result<Self> {
        let project = client.project(owner, number)?;
        log::debug!("project '{}' is {}", project.title, project.id);
        Ok(Self {
            client,
            owner,
            number,
            project,
            known_types: RefCell::default(),
        })
    }

    /// Project as resolved by `connect`
    pub fn project(&self) -> &Project {
        &self.project
    }
}

/// Desired fields declared by the manifest
pub fn desired(manifest: &BoardManifest) -> anyhow::Result<Vec<Entity>> {
    manifest.fields.iter().map(entity).collect()
}

fn entity(spec: &FieldSpec) -> anyhow::Result<Entity> {
    let data_type = spec.data_type()?;
    let mut entity = Entity::new(&spec.name).with("data_type", data_type.to_string());
    if data_type == FieldDataType::SingleSelect {
        let options: Vec<Value> = spec
            .options
            .iter()
            .map(|o| json!({ "name": o.name, "color": o.color, "description": o.description }))
            .collect();
        entity = entity.with("options", options);
    }
    Ok(entity)
}

fn actual(field: &ProjectField) -> ActualEntity {
    let mut entity =
        ActualEntity::new(&field.name, &field.id).with("data_type", field.data_type.to_string());
    if field.data_type == FieldDataType::SingleSelect {
        let options: Vec<Value> = field
            .options
            .iter()
            .map(|o| json!({ "name": o.name, "color": o.color, "description": o.description }))
            .collect();
        entity = entity.with("options", options);
    }
    entity
}

fn input(entity: &Entity) -> Result<FieldInput, DirectoryError> {
    let data_type = entity
        .attr_str("data_type")
        .unwrap_or_default()
        .parse::<FieldDataType>()
        .map_err(DirectoryError::Validation)?;
    let options = match entity.attributes.get("options") {
        Some(value) => serde_json::from_value::<Vec<FieldOption>>(value.clone())
            .map_err(|e| DirectoryError::Validation(format!("bad options: {e}")))?,
        None => Vec::new(),
    };
    Ok(FieldInput {
        name: entity.key.clone(),
        data_type,
        options,
    })
}

impl RemoteDirectory for FieldDirectory<'_> {
    fn list(&self) -> Result<Vec<ActualEntity>, DirectoryError> {
        let project = self
            .client
            .project(self.owner, self.number)
            .map_err(directory_error)?;
        let custom: Vec<&ProjectField> = project
            .fields
            .iter()
            .filter(|f| f.data_type.is_creatable() && !BUILTIN_FIELDS.contains(&f.name.as_str()))
            .collect();

        let mut known = self.known_types.borrow_mut();
        known.clear();
        known.extend(custom.iter().map(|f| (f.id.clone(), f.data_type)));

        Ok(custom.into_iter().map(actual).collect())
    }

    fn create(&self, entity: &Entity) -> Result<String, DirectoryError> {
        let field = self
            .client
            .create_field(&self.project.id, &input(entity)?)
            .map_err(directory_error)?;
        Ok(field.id)
    }

    fn update(&self, remote_id: &str, entity: &Entity) -> Result<(), DirectoryError> {
        let input = input(entity)?;
        if let Some(current) = self.known_types.borrow().get(remote_id)
            && *current != input.data_type
        {
            return Err(DirectoryError::Validation(format!(
                "cannot change field '{}' from {current} to {}; delete it first or rename it",
                entity.key, input.data_type
            )));
        }
        self.client
            .update_field(remote_id, &input)
            .map_err(directory_error)
    }

    fn delete(&self, remote_id: &str) -> Result<(), DirectoryError> {
        self.client.delete_field(remote_id).map_err(directory_error)
    }
}
