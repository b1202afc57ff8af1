//! Runtime settings read from the environment (and an optional `.env`).

use anyhow::{Result, bail};
use ghkit::OwnerType;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PROJECT_NUMBER: u64 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GH_PATH: &str = "gh";

/// Typed, validated settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub owner: String,
    pub repo: String,
    pub owner_type: OwnerType,
    pub project_number: u64,
    pub timeout: Duration,
    pub gh_path: String,
    pub manifest_path: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, reporting every problem at once
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut problems = Vec::new();

        let owner = get("GITHUB_OWNER").unwrap_or_else(|| {
            problems.push("GITHUB_OWNER is not set".to_string());
            String::new()
        });
        let repo = get("REPO_NAME").unwrap_or_else(|| {
            problems.push("REPO_NAME is not set".to_string());
            String::new()
        });

        let owner_type = match get("GITHUB_OWNER_TYPE") {
            None => OwnerType::default(),
            Some(v) => v.parse().unwrap_or_else(|e| {
                problems.push(format!("GITHUB_OWNER_TYPE: {e}"));
                OwnerType::default()
            }),
        };

        let project_number = match get("PROJECT_NUMBER") {
            None => DEFAULT_PROJECT_NUMBER,
            Some(v) => match v.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    problems.push(format!(
                        "PROJECT_NUMBER must be a positive integer, got '{v}'"
                    ));
                    DEFAULT_PROJECT_NUMBER
                }
            },
        };

        let timeout_secs = match get("GH_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(v) => match v.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => {
                    problems.push(format!(
                        "GH_TIMEOUT_SECS must be a positive number of seconds, got '{v}'"
                    ));
                    DEFAULT_TIMEOUT_SECS
                }
            },
        };

        if !problems.is_empty() {
            bail!("invalid configuration:\n  - {}", problems.join("\n  - "));
        }

        Ok(Self {
            owner,
            repo,
            owner_type,
            project_number,
            timeout: Duration::from_secs(timeout_secs),
            gh_path: get("GH_PATH").unwrap_or_else(|| DEFAULT_GH_PATH.to_string()),
            manifest_path: get("BOARD_MANIFEST").map(PathBuf::from),
        })
    }

    /// `owner/repo`
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Web URL of the configured project
    pub fn project_url(&self) -> String {
        self.owner_type
            .project_url(&self.owner, self.project_number)
    }

    /// Client bound to the configured gh binary and timeout
    pub fn client(&self) -> ghkit::Client {
        ghkit::Client::new(self.gh_path.clone(), self.timeout)
    }
}

/// Load `path` into the process environment without overriding variables
/// that are already set. A missing file is not an error.
///
/// Returns whether a file was loaded.
pub fn load_dotenv(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            log::debug!("loaded environment from {}", path.display());
            Ok(true)
        }
        Err(dotenvy::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no env file at {}", path.display());
            Ok(false)
        }
        Err(e) => Err(anyhow::anyhow!("could not load {}: {e}", path.display())),
    }
}
