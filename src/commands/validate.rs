//! Pre-flight checks: gh, credentials, settings, repository, project
//!
//! Every check runs even after an earlier one failed, so a single pass
//! lists everything to fix. Checks that depend on valid settings are
//! skipped when settings are invalid.

use anyhow::{Context as AnyhowContext, Result, bail};
use chrono::{DateTime, Utc};
use colored::Colorize;
use ghkit::{Client, Error, ErrorCategory};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::Context;
use crate::config::{self, Settings};
use crate::manifest::BoardManifest;
use crate::ui;

/// Written next to the working directory after a successful validation
pub const REPORT_FILE: &str = ".validation-report.json";

const MIN_GH_VERSION: semver::Version = semver::Version::new(2, 0, 0);

struct Issue {
    category: &'static str,
    summary: String,
    detail: Option<String>,
    fix: Option<String>,
    fix_cmd: Option<String>,
}

impl Issue {
    fn new(category: &'static str, summary: impl Into<String>) -> Self {
        Self {
            category,
            summary: summary.into(),
            detail: None,
            fix: None,
            fix_cmd: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    fn fix_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.fix_cmd = Some(cmd.into());
        self
    }

    /// Issue for a failed gh call, with the category's advice
    fn from_error(category: &'static str, summary: impl Into<String>, err: &Error) -> Self {
        let issue = Self::new(category, summary)
            .detail(err.to_string())
            .fix(err.category().advice());
        match err.category() {
            ErrorCategory::Auth => issue.fix_cmd("gh auth login --scopes repo,project"),
            _ => issue,
        }
    }
}

/// Snapshot written to [`REPORT_FILE`]
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub timestamp: DateTime<Utc>,
    pub gh_version: String,
    pub login: String,
    pub owner: String,
    pub owner_type: ghkit::OwnerType,
    pub repository: String,
    pub project_number: u64,
    pub project_title: String,
    pub project_url: String,
}

/// Facts gathered by passing checks, needed for the report
#[derive(Default)]
struct Findings {
    gh_version: Option<semver::Version>,
    login: Option<String>,
    repository: Option<String>,
    project: Option<(String, String)>,
}

/// Run the checks and fail when any of them does not pass
pub fn run(ctx: &Context, manifest: Option<&Path>) -> Result<()> {
    if check(ctx, manifest)? {
        Ok(())
    } else {
        bail!("Validation failed")
    }
}

/// Run every check, print a summary and write the report when all pass
///
/// Returns whether every check passed.
pub fn check(ctx: &Context, manifest: Option<&Path>) -> Result<bool> {
    ui::header("Validation");

    let mut issues: Vec<Issue> = Vec::new();
    let mut findings = Findings::default();

    let settings = check_settings(&mut issues);
    let client = settings.as_ref().map_or_else(
        || {
            Client::new(
                config::DEFAULT_GH_PATH,
                Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            )
        },
        Settings::client,
    );

    if check_gh(&client, &mut issues, &mut findings) {
        check_account(&client, &mut issues, &mut findings);
        if let Some(settings) = &settings {
            check_repository(&client, settings, &mut issues, &mut findings);
            check_project(&client, settings, &mut issues, &mut findings);
        }
    }
    let manifest_path = manifest.or_else(|| settings.as_ref()?.manifest_path.as_deref());
    check_manifest(manifest_path, &mut issues);

    println!();
    if !issues.is_empty() {
        print_issue_summary(&issues);
        return Ok(false);
    }

    if let Some(settings) = &settings
        && let Some(report) = build_report(settings, findings)
    {
        write_report(Path::new(REPORT_FILE), &report)?;
        if ctx.verbose > 0 {
            ui::dim(&format!("report written to {REPORT_FILE}"));
        }
    }
    ui::success("Everything is ready");
    Ok(true)
}

// ============================================================================
// Checks
// ============================================================================

fn check_settings(issues: &mut Vec<Issue>) -> Option<Settings> {
    ui::section("Configuration");

    match Settings::from_env() {
        Ok(settings) => {
            ui::check(true, "GITHUB_OWNER", &settings.owner);
            ui::check(true, "REPO_NAME", &settings.repo);
            ui::kv("Owner type", &settings.owner_type.to_string());
            ui::kv("Project number", &settings.project_number.to_string());
            ui::kv("Timeout", &format!("{}s", settings.timeout.as_secs()));
            ui::kv("gh", &settings.gh_path);
            Some(settings)
        }
        Err(e) => {
            ui::check(false, "Settings", "invalid");
            issues.push(
                Issue::new("Configuration", "Settings are incomplete or invalid")
                    .detail(e.to_string())
                    .fix("Set the variables in the environment or in .env"),
            );
            None
        }
    }
}

/// Returns whether gh is usable at all
fn check_gh(client: &Client, issues: &mut Vec<Issue>, findings: &mut Findings) -> bool {
    ui::section("GitHub CLI");

    match client.gh_version() {
        Ok(version) if version >= MIN_GH_VERSION => {
            ui::check(true, "gh", &version.to_string());
            findings.gh_version = Some(version);
        }
        Ok(version) => {
            ui::check(false, "gh", &version.to_string());
            issues.push(
                Issue::new("GitHub CLI", format!("gh {version} is too old"))
                    .detail(format!("ghboard needs gh {MIN_GH_VERSION} or newer"))
                    .fix("Upgrade the GitHub CLI"),
            );
        }
        Err(e) => {
            ui::check(false, "gh", "not usable");
            issues.push(Issue::from_error("GitHub CLI", "gh could not be run", &e));
            return false;
        }
    }

    match client.auth_status() {
        Ok(()) => {
            ui::check(true, "Authentication", "logged in");
            true
        }
        Err(e) => {
            ui::check(false, "Authentication", "not logged in");
            issues.push(Issue::from_error("GitHub CLI", "gh is not authenticated", &e));
            false
        }
    }
}

fn check_account(client: &Client, issues: &mut Vec<Issue>, findings: &mut Findings) {
    match client.viewer() {
        Ok(user) => {
            ui::check(true, "Account", &user.login);
            findings.login = Some(user.login);
        }
        Err(e) => {
            ui::check(false, "Account", "unknown");
            issues.push(Issue::from_error("GitHub CLI", "Could not read the account", &e));
        }
    }
}

fn check_repository(
    client: &Client,
    settings: &Settings,
    issues: &mut Vec<Issue>,
    findings: &mut Findings,
) {
    ui::section("Repository");
    let slug = settings.repo_slug();

    match client.repository(&settings.owner, &settings.repo) {
        Ok(repo) if repo.can_write() => {
            ui::check(true, &repo.full_name, "write access");
            findings.repository = Some(repo.full_name);
        }
        Ok(repo) => {
            ui::check(false, &repo.full_name, "read-only");
            issues.push(
                Issue::new("Repository", format!("No write access to {slug}"))
                    .detail("Creating labels and issues needs push or admin permission")
                    .fix("Ask a repository admin for write access"),
            );
        }
        Err(e) => {
            ui::check(false, &slug, "unreachable");
            issues.push(Issue::from_error(
                "Repository",
                format!("Could not access {slug}"),
                &e,
            ));
        }
    }
}

fn check_project(
    client: &Client,
    settings: &Settings,
    issues: &mut Vec<Issue>,
    findings: &mut Findings,
) {
    ui::section("Project");
    let label = format!("#{}", settings.project_number);

    match client.project(&settings.owner, settings.project_number) {
        Ok(project) if project.viewer_can_update => {
            ui::check(true, &label, &project.title);
            findings.project = Some((project.title, project.url));
        }
        Ok(project) => {
            ui::check(false, &label, "read-only");
            issues.push(
                Issue::new("Project", format!("Cannot edit project '{}'", project.title))
                    .fix("Ask the project owner for write access"),
            );
        }
        Err(e) => {
            ui::check(false, &label, "unreachable");
            let mut issue = Issue::from_error(
                "Project",
                format!("Could not open project {label} of {}", settings.owner),
                &e,
            );
            if e.category() == ErrorCategory::NotFound {
                issue = issue.fix(format!(
                    "Create the project, then set PROJECT_NUMBER ({})",
                    settings.project_url()
                ));
            }
            issues.push(issue);
        }
    }
}

fn check_manifest(path: Option<&Path>, issues: &mut Vec<Issue>) {
    ui::section("Manifest");
    let source = path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string());

    match BoardManifest::load(path) {
        Ok(manifest) => ui::check(
            true,
            &source,
            &format!(
                "{}, {}, {}, {}",
                ui::plural(manifest.labels.len(), "label"),
                ui::plural(manifest.fields.len(), "field"),
                ui::plural(manifest.views.len(), "view"),
                ui::plural(manifest.issues.len(), "issue")
            ),
        ),
        Err(e) => {
            ui::check(false, &source, "invalid");
            issues.push(
                Issue::new("Manifest", "The board manifest is invalid")
                    .detail(format!("{e:#}"))
                    .fix("Fix the manifest and re-run"),
            );
        }
    }
}

// ============================================================================
// Report
// ============================================================================

fn build_report(settings: &Settings, findings: Findings) -> Option<ValidationReport> {
    let (project_title, project_url) = findings.project?;
    Some(ValidationReport {
        timestamp: Utc::now(),
        gh_version: findings.gh_version?.to_string(),
        login: findings.login?,
        owner: settings.owner.clone(),
        owner_type: settings.owner_type,
        repository: findings.repository?,
        project_number: settings.project_number,
        project_title,
        project_url,
    })
}

/// Write `report` as pretty JSON
pub fn write_report(path: &Path, report: &ValidationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn print_issue_summary(issues: &[Issue]) {
    let count = issues.len();
    let label = if count == 1 { "Issue" } else { "Issues" };
    ui::header(&format!("{count} {label} Found"));

    for (i, issue) in issues.iter().enumerate() {
        let num = i + 1;
        println!(
            "  {}  {} {}",
            format!("{num}.").bold(),
            issue.summary,
            format!("[{}]", issue.category).dimmed()
        );
        if let Some(detail) = &issue.detail {
            for line in detail.lines() {
                println!("      {}", line.dimmed());
            }
        }
        if let Some(fix) = &issue.fix {
            println!("      {} {}", "Fix:".cyan(), fix);
        }
        if let Some(cmd) = &issue.fix_cmd {
            println!("      {} {}", "$".dimmed(), cmd.bold());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghkit::testing::Scripted;
    use ghkit::backend::CommandOutput;
    use tempfile::TempDir;

    fn settings() -> Settings {
        Settings::from_lookup(|name| match name {
            "GITHUB_OWNER" => Some("acme".to_string()),
            "REPO_NAME" => Some("widgets".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_old_gh_is_an_issue() {
        let (client, _) = Scripted::client(vec![
            CommandOutput::ok("gh version 1.14.0 (2021-08-04)\n"),
            CommandOutput::ok(""),
        ]);
        let mut issues = Vec::new();
        let mut findings = Findings::default();
        assert!(check_gh(&client, &mut issues, &mut findings));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].summary.contains("1.14.0"));
        assert!(findings.gh_version.is_none());
    }

    #[test]
    fn test_missing_login_stops_gh_checks() {
        let (client, _) = Scripted::client(vec![
            CommandOutput::ok("gh version 2.45.0 (2024-03-04)\n"),
            CommandOutput::failed("You are not logged into any GitHub hosts."),
        ]);
        let mut issues = Vec::new();
        let mut findings = Findings::default();
        assert!(!check_gh(&client, &mut issues, &mut findings));
        assert_eq!(issues[0].fix_cmd.as_deref(), Some("gh auth login --scopes repo,project"));
    }

    #[test]
    fn test_read_only_repository() {
        let (client, _) = Scripted::client(vec![CommandOutput::ok(
            r#"{"full_name":"acme/widgets","permissions":{"admin":false,"push":false,"pull":true}}"#,
        )]);
        let mut issues = Vec::new();
        let mut findings = Findings::default();
        check_repository(&client, &settings(), &mut issues, &mut findings);
        assert_eq!(issues.len(), 1);
        assert!(findings.repository.is_none());
    }

    #[test]
    fn test_missing_project_points_at_project_url() {
        let (client, _) = Scripted::client(vec![CommandOutput::ok(
            r#"{"data":{"repositoryOwner":{"projectV2":null}},"errors":[{"type":"NOT_FOUND","message":"Could not resolve to a ProjectV2 with the number 1."}]}"#,
        )]);
        let mut issues = Vec::new();
        let mut findings = Findings::default();
        check_project(&client, &settings(), &mut issues, &mut findings);
        assert!(
            issues[0]
                .fix
                .as_deref()
                .unwrap()
                .contains("https://github.com/users/acme/projects/1")
        );
    }

    #[test]
    fn test_report_needs_every_finding() {
        let mut findings = Findings {
            gh_version: Some(semver::Version::new(2, 45, 0)),
            login: Some("ana".into()),
            repository: Some("acme/widgets".into()),
            project: None,
        };
        assert!(build_report(&settings(), findings).is_none());

        findings = Findings {
            gh_version: Some(semver::Version::new(2, 45, 0)),
            login: Some("ana".into()),
            repository: Some("acme/widgets".into()),
            project: Some(("Board".into(), "https://example.test".into())),
        };
        let report = build_report(&settings(), findings).unwrap();
        assert_eq!(report.gh_version, "2.45.0");
        assert_eq!(report.project_title, "Board");
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(REPORT_FILE);
        let report = ValidationReport {
            timestamp: Utc::now(),
            gh_version: "2.45.0".into(),
            login: "ana".into(),
            owner: "acme".into(),
            owner_type: ghkit::OwnerType::Org,
            repository: "acme/widgets".into(),
            project_number: 3,
            project_title: "Board".into(),
            project_url: "https://github.com/orgs/acme/projects/3".into(),
        };
        write_report(&path, &report).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["owner_type"], "org");
        assert_eq!(written["project_number"], 3);
        assert!(written["timestamp"].as_str().unwrap().contains('T'));
    }
}
