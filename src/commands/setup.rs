use anyhow::{Result, bail};
use std::path::Path;

use super::{Session, fields, issues, labels, validate, views};
use crate::Context;
use crate::cli::{FieldsArgs, IssuesArgs, LabelsArgs, SetupArgs, ViewsArgs};
use crate::ui;

const STEPS: usize = 5;

/// Validate, then provision fields, labels, issues and views in order
///
/// A failed validation stops before anything is changed. Failures of
/// individual entities are reported after every step ran.
pub fn run(ctx: &Context, manifest: Option<&Path>, args: SetupArgs) -> Result<()> {
    ui::step(1, STEPS, "Validating environment");
    if !validate::check(ctx, manifest)? {
        bail!("Validation failed; nothing was changed");
    }

    let session = Session::load(manifest)?;
    let mut failures = 0;

    ui::step(2, STEPS, "Project fields");
    failures += fields::run(
        ctx,
        &session,
        FieldsArgs {
            dry_run: args.dry_run,
            prune: false,
        },
    )?;

    ui::step(3, STEPS, "Repository labels");
    failures += labels::run(
        ctx,
        &session,
        LabelsArgs {
            dry_run: args.dry_run,
            ..LabelsArgs::default()
        },
    )?;

    ui::step(4, STEPS, "Sample issues");
    failures += issues::run(
        ctx,
        &session,
        IssuesArgs {
            dry_run: args.dry_run,
            ..IssuesArgs::default()
        },
    )?;

    ui::step(5, STEPS, "Project views");
    failures += views::run(ctx, &session, ViewsArgs::default())?;

    println!();
    if failures == 0 {
        ui::success(&format!(
            "Board ready: {}",
            session.settings.project_url()
        ));
    }
    super::finish(failures)
}
