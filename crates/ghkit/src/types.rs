//! Core types for GitHub objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Accounts and repositories
// =============================================================================

/// Kind of account that owns a repository or project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    /// A personal account
    #[default]
    User,
    /// An organization
    Org,
}

impl OwnerType {
    /// Web URL of project `number` owned by `owner`.
    pub fn project_url(self, owner: &str, number: u64) -> String {
        match self {
            OwnerType::User => format!("https://github.com/users/{owner}/projects/{number}"),
            OwnerType::Org => format!("https://github.com/orgs/{owner}/projects/{number}"),
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerType::User => write!(f, "user"),
            OwnerType::Org => write!(f, "org"),
        }
    }
}

impl FromStr for OwnerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(OwnerType::User),
            "org" | "organization" => Ok(OwnerType::Org),
            other => Err(format!("unknown owner type '{other}' (expected user or org)")),
        }
    }
}

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Login handle
    pub login: String,
    /// Display name, if set
    #[serde(default)]
    pub name: Option<String>,
}

/// Permissions the authenticated account holds on a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Permissions {
    /// Full administrative access
    #[serde(default)]
    pub admin: bool,
    /// Write access
    #[serde(default)]
    pub push: bool,
    /// Read access
    #[serde(default)]
    pub pull: bool,
}

/// A repository as returned by `GET repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    /// `owner/name`
    pub full_name: String,
    /// Whether the repository is private
    #[serde(default)]
    pub private: bool,
    /// Caller's permissions; absent for anonymous reads
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

impl Repository {
    /// Whether the caller may create labels and issues.
    pub fn can_write(&self) -> bool {
        self.permissions.is_some_and(|p| p.admin || p.push)
    }
}

// =============================================================================
// Labels
// =============================================================================

/// A repository label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    /// Label name, unique per repository (case-insensitive on GitHub)
    pub name: String,
    /// Six hex digits, no leading `#`
    pub color: String,
    /// Free-text description; GitHub returns null when unset
    #[serde(default)]
    pub description: Option<String>,
}

/// Label fields sent on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelInput {
    /// Label name
    pub name: String,
    /// Six hex digits, no leading `#`
    pub color: String,
    /// Description; empty clears it
    pub description: String,
}

// =============================================================================
// Projects
// =============================================================================

/// Data type of a project field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldDataType {
    /// Free text
    Text,
    /// Number
    Number,
    /// Date
    Date,
    /// One option out of a fixed list
    SingleSelect,
    /// Iteration (sprint)
    Iteration,
    /// Built-in fields (Title, Assignees, Status...) and anything newer
    #[serde(other)]
    System,
}

impl FieldDataType {
    /// Whether `createProjectV2Field` accepts this type.
    pub fn is_creatable(self) -> bool {
        matches!(
            self,
            FieldDataType::Text
                | FieldDataType::Number
                | FieldDataType::Date
                | FieldDataType::SingleSelect
        )
    }

    /// The GraphQL enum value.
    pub fn as_graphql(self) -> &'static str {
        match self {
            FieldDataType::Text => "TEXT",
            FieldDataType::Number => "NUMBER",
            FieldDataType::Date => "DATE",
            FieldDataType::SingleSelect => "SINGLE_SELECT",
            FieldDataType::Iteration => "ITERATION",
            FieldDataType::System => "SYSTEM",
        }
    }
}

impl fmt::Display for FieldDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_graphql().to_ascii_lowercase())
    }
}

impl FromStr for FieldDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "text" => Ok(FieldDataType::Text),
            "number" => Ok(FieldDataType::Number),
            "date" => Ok(FieldDataType::Date),
            "single_select" => Ok(FieldDataType::SingleSelect),
            "iteration" => Ok(FieldDataType::Iteration),
            other => Err(format!(
                "unknown field type '{other}' (expected text, number, date or single_select)"
            )),
        }
    }
}

/// Names of the fields every project has, some of them single-select.
pub const BUILTIN_FIELDS: &[&str] = &[
    "Title",
    "Assignees",
    "Status",
    "Labels",
    "Linked pull requests",
    "Milestone",
    "Repository",
    "Reviewers",
    "Parent issue",
    "Sub-issues progress",
];

/// Color of a single-select option.
pub const OPTION_COLORS: &[&str] = &[
    "GRAY", "BLUE", "GREEN", "YELLOW", "ORANGE", "RED", "PINK", "PURPLE",
];

/// One option of a single-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Option id, absent on input
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// One of [`OPTION_COLORS`]
    pub color: String,
    /// Description, may be empty
    #[serde(default)]
    pub description: String,
}

/// A project (v2) field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectField {
    /// Node id
    pub id: String,
    /// Field name, unique per project
    pub name: String,
    /// Data type
    pub data_type: FieldDataType,
    /// Options, for single-select fields
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

/// Field definition sent on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInput {
    /// Field name
    pub name: String,
    /// Data type
    pub data_type: FieldDataType,
    /// Options, for single-select fields
    pub options: Vec<FieldOption>,
}

/// A saved project view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectView {
    /// Node id
    pub id: String,
    /// View name
    pub name: String,
    /// `TABLE_LAYOUT`, `BOARD_LAYOUT` or `ROADMAP_LAYOUT`
    pub layout: String,
}

/// A project (v2) with its fields and views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Node id, used by mutations
    pub id: String,
    /// Project title
    pub title: String,
    /// Web URL
    pub url: String,
    /// Whether the caller may edit the project
    pub viewer_can_update: bool,
    /// Custom and built-in fields
    pub fields: Vec<ProjectField>,
    /// Saved views
    pub views: Vec<ProjectView>,
}

// =============================================================================
// Issues
// =============================================================================

/// An issue as listed by `gh issue list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueSummary {
    /// Issue number
    pub number: u64,
    /// Title
    pub title: String,
    /// `OPEN` or `CLOSED`
    #[serde(default)]
    pub state: String,
    /// Web URL
    #[serde(default)]
    pub url: String,
}

/// Issue fields sent on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueInput {
    /// Title
    pub title: String,
    /// Markdown body
    pub body: String,
    /// Label names to apply
    pub labels: Vec<String>,
    /// Logins to assign
    pub assignees: Vec<String>,
    /// Milestone title
    pub milestone: Option<String>,
}
