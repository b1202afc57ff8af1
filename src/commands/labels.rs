use anyhow::Result;
use colored::Colorize;
use declarative::DeletePolicy;

use super::Session;
use crate::Context;
use crate::cli::LabelsArgs;
use crate::manifest::{BoardManifest, LabelSpec};
use crate::resource::{LabelDirectory, labels};
use crate::ui;

/// Label categories, by the prefix before `:`
const CATEGORIES: &[&str] = &["type", "priority", "component", "status", "effort"];

/// Reconcile the repository labels with the manifest
///
/// Returns the number of labels that failed.
pub fn run(ctx: &Context, session: &Session, args: LabelsArgs) -> Result<usize> {
    let settings = &session.settings;
    ui::header("Repository labels");
    ui::kv("Repository", &settings.repo_slug());

    let directory = LabelDirectory::new(&session.client, &settings.owner, &settings.repo);
    let desired = labels::desired(&session.manifest);
    let policy = delete_policy(&args, &session.manifest);
    if let DeletePolicy::Listed(retired) = &policy {
        log::info!("retired labels: {}", retired.join(", "));
    }

    let reconciled = super::reconcile(ctx, "label", &directory, &desired, &policy, args.dry_run)?;
    if !ctx.quiet {
        print_catalog(&session.manifest.labels);
    }
    Ok(reconciled.failures())
}

/// `--prune` deletes everything undeclared, otherwise only retired labels
/// go unless `--keep-retired`
fn delete_policy(args: &LabelsArgs, manifest: &BoardManifest) -> DeletePolicy {
    if args.prune {
        DeletePolicy::Unlisted
    } else if args.keep_retired || manifest.retired_labels.is_empty() {
        DeletePolicy::Keep
    } else {
        DeletePolicy::Listed(manifest.retired_labels.clone())
    }
}

/// Group labels by category, in `CATEGORIES` order with `other` last
fn by_category(labels: &[LabelSpec]) -> Vec<(&'static str, Vec<&LabelSpec>)> {
    let category_of = |label: &LabelSpec| {
        label
            .name
            .split_once(':')
            .and_then(|(prefix, _)| CATEGORIES.iter().find(|c| **c == prefix.trim()))
            .copied()
            .unwrap_or("other")
    };

    CATEGORIES
        .iter()
        .copied()
        .chain(std::iter::once("other"))
        .map(|category| {
            let members: Vec<&LabelSpec> =
                labels.iter().filter(|l| category_of(l) == category).collect();
            (category, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

fn print_catalog(labels: &[LabelSpec]) {
    ui::section("Label catalog");
    for (category, members) in by_category(labels) {
        println!("  {}", category.bold());
        for label in members {
            println!(
                "    {} {} {}",
                format!("#{}", label.color).dimmed(),
                label.name,
                label.description.dimmed()
            );
        }
    }
}
