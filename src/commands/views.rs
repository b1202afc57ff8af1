use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use declarative::{ReconciliationPlan, compute_plan};
use ghkit::{FieldDataType, ProjectField};

use super::Session;
use crate::Context;
use crate::cli::ViewsArgs;
use crate::manifest::ViewSpec;
use crate::report;
use crate::resource::views;
use crate::ui;

/// Compare the project's views with the manifest and print a setup guide
///
/// Views cannot be created through the API, so nothing is mutated.
pub fn run(ctx: &Context, session: &Session, args: ViewsArgs) -> Result<usize> {
    let settings = &session.settings;
    ui::header("Project views");

    let project = session
        .client
        .project(&settings.owner, settings.project_number)
        .with_context(|| {
            format!(
                "Could not open project #{} of {}",
                settings.project_number, settings.owner
            )
        })?;

    if !ctx.quiet {
        print_fields(&project.fields);
    }

    let plan = compute_plan(
        &views::desired(&session.manifest),
        &views::actual(&project),
        false,
    )
    .context("Failed to plan views")?;
    report::print_plan("view", &plan);

    let pending = pending_views(&plan);
    let guided: Vec<&ViewSpec> = session
        .manifest
        .views
        .iter()
        .filter(|v| args.all || pending.contains(&v.name.as_str()))
        .collect();

    if !guided.is_empty() {
        ui::section("Setup guide");
        for view in guided {
            print_guide(view, &project.fields);
        }
    }

    println!();
    ui::info(&format!("Open the board at {}", project.url));
    Ok(0)
}

/// Views that are missing or have the wrong layout
fn pending_views(plan: &ReconciliationPlan) -> Vec<&str> {
    plan.to_create
        .iter()
        .map(|e| e.key.as_str())
        .chain(plan.to_update.iter().map(|(e, _)| e.key.as_str()))
        .collect()
}

fn print_fields(fields: &[ProjectField]) {
    ui::section("Available fields");
    for field in fields {
        if field.data_type == FieldDataType::System {
            println!("  {}", field.name);
        } else {
            println!("  {} {}", field.name, format!("({})", field.data_type).dimmed());
        }
        if !field.options.is_empty() {
            let names: Vec<&str> = field.options.iter().map(|o| o.name.as_str()).collect();
            ui::dim(&format!("  {}", names.join(", ")));
        }
    }
}

fn print_guide(view: &ViewSpec, fields: &[ProjectField]) {
    println!();
    println!("  {} {}", view.name.bold(), format!("[{}]", view.layout).dimmed());
    if !view.description.is_empty() {
        ui::dim(&view.description);
    }
    if let Some(group_by) = &view.group_by {
        ui::kv("Group by", group_by);
    }
    if let Some(sort_by) = &view.sort_by {
        ui::kv("Sort by", sort_by);
    }
    if let Some(filter) = &view.filter {
        ui::kv("Filter", filter);
    }
    if !view.fields.is_empty() {
        ui::kv("Fields", &view.fields.join(", "));
    }
    let missing = views::missing_fields(view, fields);
    if !missing.is_empty() {
        ui::warn(&format!(
            "Not on the project yet: {} (run `ghboard fields` first)",
            missing.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use declarative::{ActualEntity, Entity};
    use ghkit::backend::CommandOutput;

    #[test]
    fn test_pending_views() {
        let plan = compute_plan(
            &[
                Entity::new("Board").with("layout", "BOARD_LAYOUT"),
                Entity::new("Backlog").with("layout", "TABLE_LAYOUT"),
                Entity::new("Roadmap").with("layout", "ROADMAP_LAYOUT"),
            ],
            &[
                ActualEntity::new("Backlog", "V1").with("layout", "TABLE_LAYOUT"),
                ActualEntity::new("Roadmap", "V2").with("layout", "TABLE_LAYOUT"),
            ],
            false,
        )
        .unwrap();
        assert_eq!(pending_views(&plan), vec!["Board", "Roadmap"]);
    }

    #[test]
    fn test_views_only_reads_the_project() {
        let (session, calls) = fixtures::session(
            r#"
[[views]]
name = "Backlog"
layout = "table"
"#,
            vec![CommandOutput::ok(
                r#"{"data":{"repositoryOwner":{"projectV2":{
                    "id":"PVT_1","title":"Board","url":"https://github.com/users/acme/projects/1",
                    "viewerCanUpdate":true,
                    "fields":{"nodes":[{"id":"F0","name":"Title","dataType":"TITLE"}]},
                    "views":{"nodes":[{"id":"V1","name":"View 1","layout":"TABLE_LAYOUT"}]}
                }}}}"#,
            )],
        );
        let failures = run(&fixtures::ctx(), &session, ViewsArgs { all: true }).unwrap();
        assert_eq!(failures, 0);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
