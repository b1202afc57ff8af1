use anyhow::{Context as AnyhowContext, Result};
use declarative::DeletePolicy;

use super::Session;
use crate::Context;
use crate::cli::FieldsArgs;
use crate::resource::{FieldDirectory, fields};
use crate::ui;

/// Reconcile the manifest's custom fields on the project
///
/// Returns the number of fields that failed.
pub fn run(ctx: &Context, session: &Session, args: FieldsArgs) -> Result<usize> {
    let settings = &session.settings;
    ui::header("Project fields");

    let desired = fields::desired(&session.manifest)?;
    let directory =
        FieldDirectory::connect(&session.client, &settings.owner, settings.project_number)
            .with_context(|| {
                format!(
                    "Could not open project #{} of {}",
                    settings.project_number, settings.owner
                )
            })?;
    ui::kv("Project", &directory.project().title);
    ui::kv("URL", &directory.project().url);

    let policy = if args.prune {
        DeletePolicy::Unlisted
    } else {
        DeletePolicy::Keep
    };
    let reconciled = super::reconcile(ctx, "field", &directory, &desired, &policy, args.dry_run)?;
    Ok(reconciled.failures())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use ghkit::backend::CommandOutput;

    const MANIFEST: &str = r#"
[[fields]]
name = "Priority"
type = "single_select"
options = [
  { name = "High", color = "RED" },
  { name = "Low", color = "GREEN" },
]

[[fields]]
name = "Estimation"
type = "number"
"#;

    fn project(fields: &str) -> CommandOutput {
        CommandOutput::ok(format!(
            r#"{{"data":{{"repositoryOwner":{{"projectV2":{{
                "id":"PVT_1","title":"Board","url":"https://github.com/users/acme/projects/1",
                "viewerCanUpdate":true,
                "fields":{{"nodes":[{fields}]}},
                "views":{{"nodes":[]}}
            }}}}}}}}"#
        ))
    }

    #[test]
    fn test_creates_missing_and_skips_matching() {
        let existing = r#"
            {"id":"F0","name":"Title","dataType":"TITLE"},
            {"id":"F1","name":"Estimation","dataType":"NUMBER"}"#;
        let (session, calls) = fixtures::session(
            MANIFEST,
            vec![
                project(existing),
                project(existing),
                CommandOutput::ok(
                    r#"{"data":{"createProjectV2Field":{"projectV2Field":{"id":"F2","name":"Priority","dataType":"SINGLE_SELECT","options":[]}}}}"#,
                ),
            ],
        );

        let failures = run(&fixtures::ctx(), &session, FieldsArgs::default()).unwrap();
        assert_eq!(failures, 0);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        let body = calls[2].stdin.as_deref().unwrap();
        assert!(body.contains("createProjectV2Field"));
        assert!(body.contains("\"Priority\""));
    }

    #[test]
    fn test_dry_run_does_not_mutate() {
        let (session, calls) = fixtures::session(MANIFEST, vec![project(""), project("")]);
        let args = FieldsArgs {
            dry_run: true,
            prune: true,
        };
        assert_eq!(run(&fixtures::ctx(), &session, args).unwrap(), 0);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_project_is_fatal() {
        let (session, _) = fixtures::session(
            MANIFEST,
            vec![CommandOutput::ok(
                r#"{"data":{"repositoryOwner":{"projectV2":null}},"errors":[{"type":"NOT_FOUND","message":"Could not resolve to a ProjectV2 with the number 1."}]}"#,
            )],
        );
        let err = run(&fixtures::ctx(), &session, FieldsArgs::default()).unwrap_err();
        assert!(err.to_string().contains("Could not open project #1 of acme"));
    }
}
