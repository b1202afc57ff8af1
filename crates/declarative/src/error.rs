//! Error types for planning and for remote directory calls

use thiserror::Error;

use crate::types::FailureKind;

/// Which input a duplicate key was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Desired,
    Actual,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Desired => write!(f, "desired"),
            Side::Actual => write!(f, "actual"),
        }
    }
}

/// Errors that abort plan computation.
///
/// Nothing has been mutated when these are raised, so aborting is safe.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The same key appears twice in one input. Not retryable: the
    /// configuration or the remote state has to be fixed by hand.
    #[error("duplicate key '{key}' in {side} entities")]
    DuplicateKey { key: String, side: Side },
}

/// Errors returned by a [`RemoteDirectory`](crate::directory::RemoteDirectory).
///
/// `Transport` is fatal when raised by `list()`. During apply every kind is
/// recorded against the entity and the run continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Connectivity or authentication failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote rejected the entity's attributes
    #[error("validation error: {0}")]
    Validation(String),

    /// The key already exists although `list()` did not report it
    #[error("conflict: {0}")]
    Conflict(String),

    /// The remote id no longer exists
    #[error("not found: {0}")]
    NotFound(String),

    /// The call exceeded its deadline
    #[error("timed out: {0}")]
    Timeout(String),
}

impl DirectoryError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DirectoryError::Transport(_) => FailureKind::Transport,
            DirectoryError::Validation(_) => FailureKind::Validation,
            DirectoryError::Conflict(_) => FailureKind::Conflict,
            DirectoryError::NotFound(_) => FailureKind::NotFound,
            DirectoryError::Timeout(_) => FailureKind::Timeout,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DirectoryError::Transport(m)
            | DirectoryError::Validation(m)
            | DirectoryError::Conflict(m)
            | DirectoryError::NotFound(m)
            | DirectoryError::Timeout(m) => m,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message() {
        let err = PlanError::DuplicateKey {
            key: "bug".into(),
            side: Side::Actual,
        };
        assert_eq!(err.to_string(), "duplicate key 'bug' in actual entities");
    }

    #[test]
    fn test_directory_error_kind() {
        assert_eq!(
            DirectoryError::Timeout("gh api".into()).kind(),
            FailureKind::Timeout
        );
        assert!(DirectoryError::NotFound("x".into()).is_not_found());
        assert!(!DirectoryError::Conflict("x".into()).is_not_found());
        assert_eq!(DirectoryError::Validation("bad".into()).message(), "bad");
    }
}
