//! Error types for gh operations.
//!
//! Errors are categorized so callers can map them onto their own failure
//! taxonomy (a reconciler treats "not found" on delete as success, a
//! validation rejection as a per-entity failure, and so on).

use thiserror::Error;

/// Categories of gh errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, TLS)
    Network,
    /// The addressed object does not exist
    NotFound,
    /// The request was rejected as invalid
    Validation,
    /// The object already exists
    Conflict,
    /// Not authenticated or not permitted
    Auth,
    /// The call exceeded its deadline
    Timeout,
    /// gh itself is not installed
    GhNotFound,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Not found",
            Self::Validation => "Rejected by GitHub",
            Self::Conflict => "Already exists",
            Self::Auth => "Authentication or permission problem",
            Self::Timeout => "Timed out",
            Self::GhNotFound => "GitHub CLI not installed",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and try again",
            Self::NotFound => "Verify the owner, repository and project number",
            Self::Validation => "Fix the offending definition and re-run",
            Self::Conflict => "Re-run; the object will be picked up as existing",
            Self::Auth => "Run `gh auth login` and make sure the token has repo and project scopes",
            Self::Timeout => "Increase GH_TIMEOUT_SECS or retry later",
            Self::GhNotFound => "Install the GitHub CLI from https://cli.github.com",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while talking to GitHub through gh.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error
    #[error("network error: {message}")]
    Network {
        /// Message reported by gh
        message: String,
    },

    /// The addressed object does not exist (HTTP 404, GraphQL NOT_FOUND)
    #[error("not found: {message}")]
    NotFound {
        /// Message reported by gh
        message: String,
    },

    /// GitHub rejected the request (HTTP 422, GraphQL validation errors)
    #[error("validation failed: {message}")]
    Validation {
        /// Message reported by GitHub
        message: String,
    },

    /// The object already exists
    #[error("already exists: {message}")]
    Conflict {
        /// Message reported by GitHub
        message: String,
    },

    /// Authentication or authorization failure
    #[error("authentication error: {message}")]
    Auth {
        /// Message reported by gh
        message: String,
    },

    /// The gh process did not finish in time and was killed
    #[error("gh {command} timed out after {seconds}s")]
    Timeout {
        /// Subcommand that timed out
        command: String,
        /// Configured deadline
        seconds: u64,
    },

    /// gh is not installed or not on PATH
    #[error("GitHub CLI (gh) not found. Install it from https://cli.github.com")]
    GhNotFound,

    /// Command execution failed for an unclassified reason
    #[error("command failed: {message}")]
    CommandFailed {
        /// Description of what command failed
        message: String,
        /// Standard error output from the failed command
        stderr: String,
    },

    /// The response did not have the expected shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network { .. } => ErrorCategory::Network,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::Conflict { .. } => ErrorCategory::Conflict,
            Error::Auth { .. } => ErrorCategory::Auth,
            Error::Timeout { .. } => ErrorCategory::Timeout,
            Error::GhNotFound => ErrorCategory::GhNotFound,
            _ => ErrorCategory::Other,
        }
    }

    /// Create an error from the output of a failed gh call.
    ///
    /// gh reports HTTP failures as `gh: <message> (HTTP <status>)` on
    /// stderr and prints the response body on stdout. The status decides
    /// the category; the body's `errors[].code` separates a conflict from
    /// other validation failures.
    pub fn from_gh_output(stderr: &str, stdout: &str, command: &str) -> Self {
        let message = stderr.trim().trim_start_matches("gh: ").to_string();
        let lower = stderr.to_lowercase();

        if lower.contains("http 404") || lower.contains("not found") {
            return Error::NotFound { message };
        }

        if lower.contains("http 422") || lower.contains("validation failed") {
            let body = stdout.to_lowercase();
            let exists = |text: &str| {
                text.contains("already_exists") || text.contains("already exists")
            };
            if exists(&lower) || exists(&body) {
                return Error::Conflict { message };
            }
            return Error::Validation {
                message: with_body_errors(message, stdout),
            };
        }

        if lower.contains("http 401")
            || lower.contains("http 403")
            || lower.contains("gh auth login")
            || lower.contains("bad credentials")
            || lower.contains("not logged in")
        {
            return Error::Auth { message };
        }

        if lower.contains("could not resolve host")
            || lower.contains("connection refused")
            || lower.contains("connection reset")
            || lower.contains("i/o timeout")
            || lower.contains("tls handshake")
            || lower.contains("no such host")
            || lower.contains("error connecting")
        {
            return Error::Network { message };
        }

        Error::CommandFailed {
            message: format!("gh {command} failed"),
            stderr: stderr.trim().to_string(),
        }
    }

    /// Create an error from the `errors` array of a GraphQL response.
    ///
    /// Classification uses the first error; all messages are kept.
    pub fn from_graphql_errors(errors: &[serde_json::Value]) -> Self {
        let message = errors
            .iter()
            .filter_map(|e| e["message"].as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let kind = errors
            .first()
            .and_then(|e| e["type"].as_str())
            .unwrap_or_default();
        let lower = message.to_lowercase();

        match kind {
            "NOT_FOUND" => Error::NotFound { message },
            "FORBIDDEN" | "INSUFFICIENT_SCOPES" => Error::Auth { message },
            _ if lower.contains("already exists") || lower.contains("already been taken") => {
                Error::Conflict { message }
            }
            _ => Error::Validation { message },
        }
    }
}

/// Append the `errors` of a REST error body to `message`, when present.
fn with_body_errors(message: String, stdout: &str) -> String {
    let Ok(body) = serde_json::from_str::<serde_json::Value>(stdout) else {
        return message;
    };
    let details: Vec<String> = body["errors"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|e| match (e["field"].as_str(), e["code"].as_str()) {
            (Some(field), Some(code)) => Some(format!("{field} {code}")),
            _ => e["message"].as_str().map(str::to_string),
        })
        .collect();
    if details.is_empty() {
        message
    } else {
        format!("{message}: {}", details.join(", "))
    }
}

/// Result type for gh operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_gh_output_not_found() {
        let err = Error::from_gh_output("gh: Not Found (HTTP 404)\n", "", "api");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "not found: Not Found (HTTP 404)");
    }

    #[test]
    fn test_from_gh_output_conflict_from_body() {
        let err = Error::from_gh_output(
            "gh: Validation Failed (HTTP 422)\n",
            r#"{"message":"Validation Failed","errors":[{"resource":"Label","code":"already_exists","field":"name"}],"status":"422"}"#,
            "api",
        );
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert_eq!(err.to_string(), "already exists: Validation Failed (HTTP 422)");
    }

    #[test]
    fn test_from_gh_output_validation() {
        let err = Error::from_gh_output(
            "gh: Validation Failed (HTTP 422)\n",
            r#"{"message":"Validation Failed","errors":[{"resource":"Label","code":"invalid","field":"color"}]}"#,
            "api",
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(
            err.to_string(),
            "validation failed: Validation Failed (HTTP 422): color invalid"
        );
    }

    #[test]
    fn test_from_gh_output_validation_without_body() {
        let err = Error::from_gh_output("gh: Validation Failed (HTTP 422)", "", "api");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.to_string(), "validation failed: Validation Failed (HTTP 422)");
    }

    #[test]
    fn test_from_gh_output_auth() {
        let err = Error::from_gh_output(
            "To get started with GitHub CLI, please run:  gh auth login",
            "",
            "api",
        );
        assert_eq!(err.category(), ErrorCategory::Auth);
    }

    #[test]
    fn test_from_gh_output_network() {
        let err = Error::from_gh_output(
            "error connecting to api.github.com\ncheck your internet connection",
            "",
            "api",
        );
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_from_gh_output_unclassified() {
        let err = Error::from_gh_output("something odd happened", "", "issue create");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "command failed: gh issue create failed");
    }

    #[test]
    fn test_from_graphql_errors() {
        let not_found = [json!({
            "type": "NOT_FOUND",
            "message": "Could not resolve to a ProjectV2 with the number 9."
        })];
        assert_eq!(
            Error::from_graphql_errors(&not_found).category(),
            ErrorCategory::NotFound
        );

        let taken = [json!({ "message": "Name has already been taken" })];
        assert_eq!(
            Error::from_graphql_errors(&taken).category(),
            ErrorCategory::Conflict
        );

        let invalid = [
            json!({ "message": "Argument 'dataType' has an invalid value" }),
            json!({ "message": "second problem" }),
        ];
        let err = Error::from_graphql_errors(&invalid);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().contains("invalid value; second problem"));
    }
}
