//! Remote directories backed by gh
//!
//! Each adapter exposes one kind of GitHub object (labels, project fields,
//! issues) to the reconciler as keyed entities with comparable attributes.
//! Views are read-only and only listed.

pub mod fields;
pub mod issues;
pub mod labels;
pub mod views;

use declarative::DirectoryError;
use ghkit::ErrorCategory;

pub use fields::FieldDirectory;
pub use issues::IssueDirectory;
pub use labels::LabelDirectory;

/// Map a gh failure onto the reconciler's per-entity failure kinds
pub fn directory_error(err: ghkit::Error) -> DirectoryError {
    let message = err.to_string();
    match err.category() {
        ErrorCategory::NotFound => DirectoryError::NotFound(message),
        ErrorCategory::Validation => DirectoryError::Validation(message),
        ErrorCategory::Conflict => DirectoryError::Conflict(message),
        ErrorCategory::Timeout => DirectoryError::Timeout(message),
        ErrorCategory::Network
        | ErrorCategory::Auth
        | ErrorCategory::GhNotFound
        | ErrorCategory::Other => DirectoryError::Transport(message),
    }
}
