//! Sample issues and epic linkage
//!
//! Top-level issues are created first. Every epic created by this run then
//! gets one sub-issue per subtask, and its task list is rewritten to link
//! them. Epics that already existed are left alone.

use anyhow::{Context as AnyhowContext, Result};
use declarative::{DeletePolicy, Outcome, ReconciliationResult, RemoteDirectory};
use std::collections::HashMap;

use super::{Reconciled, Session};
use crate::Context;
use crate::cli::IssuesArgs;
use crate::epic;
use crate::manifest::IssueSpec;
use crate::resource::{IssueDirectory, issues};
use crate::ui;

/// Create the manifest's sample issues
///
/// Returns the number of issues (and epic rewrites) that failed.
pub fn run(ctx: &Context, session: &Session, args: IssuesArgs) -> Result<usize> {
    let settings = &session.settings;
    let specs = &session.manifest.issues;
    ui::header("Sample issues");
    ui::kv("Repository", &settings.repo_slug());

    let directory = IssueDirectory::new(
        &session.client,
        &settings.owner,
        &settings.repo,
        args.limit,
        specs,
    );
    let top = super::reconcile(
        ctx,
        "issue",
        &directory,
        &issues::desired(specs),
        &DeletePolicy::Keep,
        args.dry_run,
    )?;
    let mut failures = top.failures();

    let Some(result) = &top.result else {
        for spec in specs.iter().filter(|s| s.is_epic()) {
            if top.plan.to_create.iter().any(|e| e.key == spec.title) {
                ui::dim(&format!(
                    "{} would get {}",
                    spec.title,
                    ui::plural(spec.subtasks.len(), "sub-issue")
                ));
            }
        }
        return Ok(failures);
    };

    for spec in specs.iter().filter(|s| s.is_epic()) {
        match created_number(result, &spec.title) {
            Some(number) => failures += link_epic(ctx, session, spec, number, args.limit)?,
            None => log::info!("'{}' was not created in this run, sub-issues untouched", spec.title),
        }
    }
    Ok(failures)
}

/// Issue number of `title` when this run created it
fn created_number(result: &ReconciliationResult, title: &str) -> Option<u64> {
    let entry = result.get(title)?;
    if !matches!(entry.outcome, Outcome::Created) {
        return None;
    }
    entry.remote_id.as_deref()?.parse().ok()
}

/// Create the sub-issues of `epic` and link them from its task list
fn link_epic(
    ctx: &Context,
    session: &Session,
    epic: &IssueSpec,
    number: u64,
    limit: usize,
) -> Result<usize> {
    let settings = &session.settings;
    ui::section(&format!("Epic #{number}: {}", epic.title));

    let subs: Vec<IssueSpec> = epic
        .subtasks
        .iter()
        .map(|title| epic::sub_issue(epic, number, title))
        .collect();
    let directory =
        IssueDirectory::new(&session.client, &settings.owner, &settings.repo, limit, &subs);
    let reconciled = super::reconcile(
        ctx,
        "sub-issue",
        &directory,
        &issues::desired(&subs),
        &DeletePolicy::Keep,
        false,
    )?;
    let mut failures = reconciled.failures();

    let existing = existing_numbers(&directory, &reconciled)?;
    let result = reconciled.result.as_ref();
    let lookup = |title: &str| {
        result
            .and_then(|r| r.get(title))
            .and_then(|e| e.remote_id.clone())
            .or_else(|| existing.get(title).cloned())
    };

    let Some(tasks) = task_numbers(&epic.subtasks, lookup) else {
        ui::warn(&format!(
            "Task list of #{number} left as is; re-run once every sub-issue exists"
        ));
        return Ok(failures);
    };

    let body = epic::rewrite_task_list(&epic.body, &epic.task_heading, &tasks);
    match session
        .client
        .edit_issue_body(&settings.owner, &settings.repo, number, &body)
    {
        Ok(()) => ui::success(&format!(
            "Linked {} from #{number}",
            ui::plural(tasks.len(), "sub-issue")
        )),
        Err(e) => {
            ui::error(&format!("Could not update #{number}: {e}"));
            failures += 1;
        }
    }
    Ok(failures)
}

/// Numbers of sub-issues that were already in sync, keyed by title
fn existing_numbers(
    directory: &IssueDirectory<'_>,
    reconciled: &Reconciled,
) -> Result<HashMap<String, String>> {
    if reconciled.plan.in_sync.is_empty() {
        return Ok(HashMap::new());
    }
    let actual = directory
        .list()
        .context("Failed to list existing sub-issues")?;
    Ok(actual.into_iter().map(|a| (a.key, a.remote_id)).collect())
}

/// Pair every subtask with its issue number, or `None` if any is unknown
fn task_numbers<F>(subtasks: &[String], lookup: F) -> Option<Vec<(String, u64)>>
where
    F: Fn(&str) -> Option<String>,
{
    subtasks
        .iter()
        .map(|title| {
            let number = lookup(title)?.parse().ok()?;
            Some((title.clone(), number))
        })
        .collect()
}
