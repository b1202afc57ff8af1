//! Repository labels as reconcilable entities
//!
//! Key is the label name, attributes are `color` (lower-case hex) and
//! `description` (empty when unset). The remote id is the label's current
//! name, since the REST API addresses labels by name.

use declarative::{ActualEntity, DirectoryError, Entity, RemoteDirectory};
use ghkit::{Client, Label, LabelInput};

use super::directory_error;
use crate::manifest::BoardManifest;

pub struct LabelDirectory<'a> {
    client: &'a Client,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> LabelDirectory<'a> {
    pub fn new(client: &'a Client, owner: &'a str, repo: &'a str) -> Self {
        Self {
            client,
            owner,
            repo,
        }
    }
}

/// Desired labels declared by the manifest
pub fn desired(manifest: &BoardManifest) -> Vec<Entity> {
    manifest
        .labels
        .iter()
        .map(|l| {
            Entity::new(&l.name)
                .with("color", l.color.to_lowercase())
                .with("description", l.description.as_str())
        })
        .collect()
}

fn actual(label: Label) -> ActualEntity {
    ActualEntity::new(&label.name, &label.name)
        .with("color", label.color.to_lowercase())
        .with("description", label.description.unwrap_or_default())
}

fn input(entity: &Entity) -> LabelInput {
    LabelInput {
        name: entity.key.clone(),
        color: entity.attr_str("color").unwrap_or_default().to_string(),
        description: entity.attr_str("description").unwrap_or_default().to_string(),
    }
}

impl RemoteDirectory for LabelDirectory<'_> {
    fn list(&self) -> Result<Vec<ActualEntity>, DirectoryError> {
        let labels = self
            .client
            .list_labels(self.owner, self.repo)
            .map_err(directory_error)?;
        log::debug!("{} labels on {}/{}", labels.len(), self.owner, self.repo);
        Ok(labels.into_iter().map(actual).collect())
    }

    fn create(&self, entity: &Entity) -> Result<String, DirectoryError> {
        let label = self
            .client
            .create_label(self.owner, self.repo, &input(entity))
            .map_err(directory_error)?;
        Ok(label.name)
    }

    fn update(&self, remote_id: &str, entity: &Entity) -> Result<(), DirectoryError> {
        self.client
            .update_label(self.owner, self.repo, remote_id, &input(entity))
            .map_err(directory_error)?;
        Ok(())
    }

    fn delete(&self, remote_id: &str) -> Result<(), DirectoryError> {
        self.client
            .delete_label(self.owner, self.repo, remote_id)
            .map_err(directory_error)
    }
}
