//! Sample issues as reconcilable entities
//!
//! Issues are create-only: the key is the exact title and no attribute is
//! compared, so an issue that already exists is always in sync. The remote
//! id is the issue number.

use declarative::{ActualEntity, DirectoryError, Entity, RemoteDirectory};
use ghkit::{Client, IssueInput};
use std::collections::HashSet;

use super::directory_error;
use crate::manifest::IssueSpec;

pub struct IssueDirectory<'a> {
    client: &'a Client,
    owner: &'a str,
    repo: &'a str,
    /// How many existing issues to scan for titles
    limit: usize,
    /// Specs looked up by title on create
    specs: &'a [IssueSpec],
}

impl<'a> IssueDirectory<'a> {
    pub fn new(
        client: &'a Client,
        owner: &'a str,
        repo: &'a str,
        limit: usize,
        specs: &'a [IssueSpec],
    ) -> Self {
        Self {
            client,
            owner,
            repo,
            limit,
            specs,
        }
    }
}

/// One title-only entity per spec
pub fn desired(specs: &[IssueSpec]) -> Vec<Entity> {
    specs.iter().map(|s| Entity::new(&s.title)).collect()
}

/// True when gh returned as many issues as asked for, so more may exist
fn listing_truncated(listed: usize, limit: usize) -> bool {
    limit > 0 && listed >= limit
}

impl RemoteDirectory for IssueDirectory<'_> {
    fn list(&self) -> Result<Vec<ActualEntity>, DirectoryError> {
        let mut issues = self
            .client
            .list_issues(self.owner, self.repo, self.limit)
            .map_err(directory_error)?;
        if listing_truncated(issues.len(), self.limit) {
            log::warn!(
                "{}/{} has at least {} issues; older ones were not checked for duplicate titles (raise --limit)",
                self.owner,
                self.repo,
                self.limit
            );
        }

        // Repositories may hold several issues with one title; the oldest wins
        issues.sort_by_key(|i| i.number);
        let mut seen = HashSet::new();
        Ok(issues
            .into_iter()
            .filter(|i| seen.insert(i.title.clone()))
            .map(|i| ActualEntity::new(i.title, i.number.to_string()))
            .collect())
    }

    fn create(&self, entity: &Entity) -> Result<String, DirectoryError> {
        let spec = self
            .specs
            .iter()
            .find(|s| s.title == entity.key)
            .ok_or_else(|| {
                DirectoryError::Validation(format!("no issue declared as '{}'", entity.key))
            })?;
        let input = IssueInput {
            title: spec.title.clone(),
            body: spec.body.clone(),
            labels: spec.labels.clone(),
            assignees: spec.assignees.clone(),
            milestone: spec.milestone.clone(),
        };
        let issue = self
            .client
            .create_issue(self.owner, self.repo, &input)
            .map_err(directory_error)?;
        log::info!("created issue #{} {}", issue.number, issue.url);
        Ok(issue.number.to_string())
    }

    fn update(&self, remote_id: &str, entity: &Entity) -> Result<(), DirectoryError> {
        Err(DirectoryError::Validation(format!(
            "issue #{remote_id} '{}' is never edited",
            entity.key
        )))
    }

    fn delete(&self, remote_id: &str) -> Result<(), DirectoryError> {
        Err(DirectoryError::Validation(format!(
            "issue #{remote_id} is never deleted"
        )))
    }
}
