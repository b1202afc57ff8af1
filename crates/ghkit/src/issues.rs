//! Issue operations through `gh issue`.

use crate::Client;
use crate::error::{Error, Result};
use crate::types::{IssueInput, IssueSummary};

impl Client {
    /// List up to `limit` issues of a repository, open and closed.
    pub fn list_issues(&self, owner: &str, repo: &str, limit: usize) -> Result<Vec<IssueSummary>> {
        let args = strings(&[
            "issue",
            "list",
            "--repo",
            &format!("{owner}/{repo}"),
            "--state",
            "all",
            "--limit",
            &limit.to_string(),
            "--json",
            "number,title,state,url",
        ]);
        let stdout = self.run_checked(&args, None)?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Create an issue. The body is passed on stdin.
    pub fn create_issue(&self, owner: &str, repo: &str, issue: &IssueInput) -> Result<IssueSummary> {
        let mut args = strings(&[
            "issue",
            "create",
            "--repo",
            &format!("{owner}/{repo}"),
            "--title",
            &issue.title,
            "--body-file",
            "-",
        ]);
        for label in &issue.labels {
            args.push("--label".to_string());
            args.push(label.clone());
        }
        for assignee in &issue.assignees {
            args.push("--assignee".to_string());
            args.push(assignee.clone());
        }
        if let Some(milestone) = &issue.milestone {
            args.push("--milestone".to_string());
            args.push(milestone.clone());
        }

        let stdout = self.run_checked(&args, Some(issue.body.as_bytes()))?;
        let url = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| line.starts_with("https://"))
            .ok_or_else(|| Error::UnexpectedResponse(format!("no issue URL in: {stdout}")))?;

        Ok(IssueSummary {
            number: issue_number(url)?,
            title: issue.title.clone(),
            state: "OPEN".to_string(),
            url: url.to_string(),
        })
    }

    /// Replace the body of an existing issue.
    pub fn edit_issue_body(&self, owner: &str, repo: &str, number: u64, body: &str) -> Result<()> {
        let args = strings(&[
            "issue",
            "edit",
            &number.to_string(),
            "--repo",
            &format!("{owner}/{repo}"),
            "--body-file",
            "-",
        ]);
        self.run_checked(&args, Some(body.as_bytes()))?;
        Ok(())
    }
}

/// Issue number from a URL such as `https://github.com/o/r/issues/42`.
pub fn issue_number(url: &str) -> Result<u64> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Error::UnexpectedResponse(format!("cannot read issue number from '{url}'")))
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}
