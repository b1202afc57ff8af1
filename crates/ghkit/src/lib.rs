//! # ghkit
//!
//! Typed access to GitHub through the `gh` command-line client.
//!
//! This crate provides:
//! - REST calls built as a discrete `gh api` argv
//! - GraphQL calls sent as a JSON body on stdin
//! - Typed operations for labels, project fields and views, and issues
//! - Error classification (not found, validation, conflict, auth, timeout)
//!
//! ## Example
//!
//! ```no_run
//! use ghkit::Client;
//! use std::time::Duration;
//!
//! let client = Client::new("gh", Duration::from_secs(30));
//! for label in client.list_labels("acme", "widgets").expect("listing failed") {
//!     println!("{} #{}", label.name, label.color);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod issues;
pub mod labels;
pub mod projects;
pub mod queries;
pub mod request;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use request::{GraphQlRequest, Method, RestRequest};
pub use types::{
    BUILTIN_FIELDS, FieldDataType, FieldInput, FieldOption, IssueInput, IssueSummary, Label, LabelInput,
    OPTION_COLORS, OwnerType, Permissions, Project, ProjectField, ProjectView, Repository, User,
};

use backend::{Backend, CommandOutput, gh::GhBackend};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// High-level client for GitHub operations.
///
/// The client wraps a backend and turns typed requests into gh
/// invocations, classifying failures into [`Error`] variants.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a client running the real gh binary at `gh_path`.
    pub fn new(gh_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            backend: Box::new(GhBackend::new(gh_path, timeout)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Run gh and return its stdout, classifying a non-zero exit.
    pub fn run_checked(&self, args: &[String], stdin: Option<&[u8]>) -> Result<String> {
        let output = self.backend.run(args, stdin)?;
        check(&output, args)?;
        Ok(output.stdout)
    }

    /// Execute a REST request and parse the JSON response.
    ///
    /// Empty responses (204 No Content) come back as `Value::Null`.
    pub fn rest(&self, request: &RestRequest) -> Result<Value> {
        let stdout = self.run_checked(&request.to_args(), None)?;
        if stdout.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Execute a REST request and deserialize the response.
    pub fn rest_as<T: DeserializeOwned>(&self, request: &RestRequest) -> Result<T> {
        Ok(serde_json::from_value(self.rest(request)?)?)
    }

    /// Execute a paginated REST list request.
    pub fn rest_list<T: DeserializeOwned>(&self, request: &RestRequest) -> Result<Vec<T>> {
        let request = request.clone().paginated();
        let stdout = self.run_checked(&request.to_args(), None)?;
        stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Error::from))
            .collect()
    }

    /// Execute a GraphQL request and return its `data` member.
    ///
    /// GraphQL reports most failures inside a 200 response, and gh also
    /// exits non-zero in that case, so the body is inspected first.
    pub fn graphql(&self, request: &GraphQlRequest) -> Result<Value> {
        let args = GraphQlRequest::args();
        let output = self.backend.run(&args, Some(&request.body()))?;

        let body: Option<Value> = serde_json::from_str(&output.stdout).ok();
        if let Some(errors) = body
            .as_ref()
            .and_then(|b| b.get("errors"))
            .and_then(Value::as_array)
            .filter(|e| !e.is_empty())
        {
            return Err(Error::from_graphql_errors(errors));
        }
        check(&output, &args)?;

        match body {
            Some(mut body) => Ok(body["data"].take()),
            None => Err(Error::UnexpectedResponse(
                "GraphQL response was not JSON".to_string(),
            )),
        }
    }

    // =========================================================================
    // Environment
    // =========================================================================

    /// Installed gh version, parsed from `gh --version`.
    pub fn gh_version(&self) -> Result<semver::Version> {
        let stdout = self.run_checked(&["--version".to_string()], None)?;
        parse_gh_version(&stdout)
    }

    /// Check that gh holds a valid login.
    ///
    /// gh prints its status on stderr and signals failure with the exit code.
    pub fn auth_status(&self) -> Result<()> {
        let output = self
            .backend
            .run(&["auth".to_string(), "status".to_string()], None)?;
        if output.success {
            Ok(())
        } else {
            Err(Error::Auth {
                message: output.stderr.trim().to_string(),
            })
        }
    }

    /// The authenticated account.
    pub fn viewer(&self) -> Result<User> {
        self.rest_as(&RestRequest::get("user"))
    }

    /// A repository with the caller's permissions.
    pub fn repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.rest_as(&RestRequest::get(repo_path(owner, repo)))
    }
}

/// `repos/{owner}/{repo}` with both segments encoded.
pub(crate) fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "repos/{}/{}",
        request::segment(owner),
        request::segment(repo)
    )
}

fn check(output: &CommandOutput, args: &[String]) -> Result<()> {
    if output.success {
        return Ok(());
    }
    let command = args
        .iter()
        .take_while(|a| !a.starts_with('-'))
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    Err(Error::from_gh_output(&output.stderr, &output.stdout, &command))
}

/// Parse the first line of `gh --version`, e.g.
/// `gh version 2.45.0 (2024-03-04)`.
pub fn parse_gh_version(output: &str) -> Result<semver::Version> {
    let token = output
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(2))
        .ok_or_else(|| Error::UnexpectedResponse(format!("unrecognized gh version: {output}")))?;
    semver::Version::parse(token)
        .map_err(|e| Error::UnexpectedResponse(format!("unrecognized gh version '{token}': {e}")))
}
