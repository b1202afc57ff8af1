//! Command implementations
//!
//! Reconciling commands share one flow: list the remote, plan against the
//! manifest, print the plan, and apply it unless this is a dry run.

pub mod fields;
pub mod issues;
pub mod labels;
pub mod setup;
pub mod validate;
pub mod views;

use anyhow::{Context as AnyhowContext, Result, bail};
use declarative::{
    DeletePolicy, Entity, ReconciliationPlan, ReconciliationResult, RemoteDirectory, apply,
    compute_plan_with,
};
use std::path::Path;

use crate::Context;
use crate::config::Settings;
use crate::manifest::BoardManifest;
use crate::report::{self, ConsoleProgress};
use crate::ui;

/// Everything a reconciling command needs
pub struct Session {
    pub settings: Settings,
    pub manifest: BoardManifest,
    pub client: ghkit::Client,
}

impl Session {
    /// Read settings from the environment and load the manifest
    ///
    /// `manifest` (from `--manifest`) takes precedence over `BOARD_MANIFEST`.
    pub fn load(manifest: Option<&Path>) -> Result<Self> {
        let settings = Settings::from_env()?;
        let path = manifest.or(settings.manifest_path.as_deref());
        let manifest = BoardManifest::load(path)?;
        let client = settings.client();
        Ok(Self {
            settings,
            manifest,
            client,
        })
    }
}

/// A plan and, unless it was a dry run, the result of applying it
pub struct Reconciled {
    pub plan: ReconciliationPlan,
    pub result: Option<ReconciliationResult>,
}

impl Reconciled {
    pub fn failures(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.counts().failed)
    }
}

/// List, plan, print, and apply unless `dry_run`
///
/// Listing and planning errors abort the command. Per-entity failures end
/// up in the result.
pub fn reconcile<D>(
    ctx: &Context,
    noun: &str,
    directory: &D,
    desired: &[Entity],
    policy: &DeletePolicy,
    dry_run: bool,
) -> Result<Reconciled>
where
    D: RemoteDirectory + ?Sized,
{
    let actual = directory
        .list()
        .with_context(|| format!("Failed to list existing {noun}s"))?;
    log::info!("{} declared, {} found", desired.len(), actual.len());

    let plan = compute_plan_with(desired, &actual, policy)
        .with_context(|| format!("Failed to plan {noun}s"))?;
    report::print_plan(noun, &plan);
    if ctx.verbose > 0 {
        for key in &plan.in_sync {
            ui::dim(&format!("= {key}"));
        }
    }

    if dry_run {
        ui::info("Dry run, nothing was changed");
        return Ok(Reconciled { plan, result: None });
    }
    let result = apply(&plan, directory, &mut ConsoleProgress::new(ctx.quiet));
    // an empty plan was already reported as in sync
    if !plan.is_empty() {
        report::print_result(noun, &result);
    }
    Ok(Reconciled {
        plan,
        result: Some(result),
    })
}

/// Turn a failure count into the command's exit status
pub fn finish(failures: usize) -> Result<()> {
    if failures == 0 {
        Ok(())
    } else {
        bail!("{} failed", ui::plural(failures, "operation"))
    }
}

/// Load a session, run `command` with it, and fail on any entity failure
pub fn with_session<F>(manifest: Option<&Path>, command: F) -> Result<()>
where
    F: FnOnce(&Session) -> Result<usize>,
{
    let session = Session::load(manifest)?;
    finish(command(&session)?)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use ghkit::backend::CommandOutput;
    use ghkit::testing::{CallLog, Scripted};

    pub fn ctx() -> Context {
        Context {
            verbose: 0,
            quiet: true,
        }
    }

    /// Session over a scripted gh and an inline manifest
    pub fn session(
        manifest: &str,
        responses: Vec<CommandOutput>,
    ) -> (Session, CallLog) {
        let settings = Settings::from_lookup(|name| match name {
            "GITHUB_OWNER" => Some("acme".to_string()),
            "REPO_NAME" => Some("widgets".to_string()),
            _ => None,
        })
        .unwrap();
        let (client, calls) = Scripted::client(responses);
        let session = Session {
            settings,
            manifest: BoardManifest::parse(manifest).unwrap(),
            client,
        };
        (session, calls)
    }
}
