//! Board manifest: the declared labels, fields, views and sample issues.

use anyhow::{Context, Result, bail};
use ghkit::{BUILTIN_FIELDS, FieldDataType, OPTION_COLORS};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

const BUILTIN: &str = include_str!("../defaults/board.toml");

pub const DEFAULT_TASK_HEADING: &str = "## Tasks";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardManifest {
    /// Labels deleted unless `--keep-retired` is given
    #[serde(default)]
    pub retired_labels: Vec<String>,
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub views: Vec<ViewSpec>,
    #[serde(default)]
    pub issues: Vec<IssueSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSpec {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    /// text, number, date or single_select
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionSpec {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewLayout {
    Table,
    Board,
    Roadmap,
}

impl ViewLayout {
    /// Layout name as reported by the GraphQL API
    pub fn as_graphql(self) -> &'static str {
        match self {
            ViewLayout::Table => "TABLE_LAYOUT",
            ViewLayout::Board => "BOARD_LAYOUT",
            ViewLayout::Roadmap => "ROADMAP_LAYOUT",
        }
    }
}

impl fmt::Display for ViewLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewLayout::Table => write!(f, "table"),
            ViewLayout::Board => write!(f, "board"),
            ViewLayout::Roadmap => write!(f, "roadmap"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub name: String,
    pub layout: ViewLayout,
    #[serde(default)]
    pub description: String,
    pub group_by: Option<String>,
    pub sort_by: Option<String>,
    /// Filter in the project search syntax, e.g. `is:open label:bug`
    pub filter: Option<String>,
    /// Visible fields, in order
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueSpec {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    pub milestone: Option<String>,
    /// Non-empty makes this issue an epic
    #[serde(default)]
    pub subtasks: Vec<String>,
    /// Heading whose list is rewritten with links to the sub-issues
    #[serde(default = "default_task_heading")]
    pub task_heading: String,
}

fn default_task_heading() -> String {
    DEFAULT_TASK_HEADING.to_string()
}

impl IssueSpec {
    pub fn is_epic(&self) -> bool {
        !self.subtasks.is_empty()
    }
}

impl FieldSpec {
    pub fn data_type(&self) -> Result<FieldDataType> {
        self.kind
            .parse()
            .map_err(|e: String| anyhow::anyhow!("field '{}': {e}", self.name))
    }
}

impl BoardManifest {
    /// The manifest compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN).context("built-in manifest is invalid")
    }

    /// Load from `path`, or the built-in manifest when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            log::debug!("using built-in manifest");
            return Self::builtin();
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check everything GitHub would reject, before any call is made
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        // GitHub compares label names case-insensitively
        let mut seen = HashSet::new();
        for label in &self.labels {
            if label.name.trim().is_empty() {
                problems.push("label with an empty name".to_string());
            }
            if !seen.insert(label.name.to_lowercase()) {
                problems.push(format!("duplicate label '{}'", label.name));
            }
            if !is_hex_color(&label.color) {
                problems.push(format!(
                    "label '{}': color '{}' is not six hex digits",
                    label.name, label.color
                ));
            }
        }
        for retired in &self.retired_labels {
            if seen.contains(&retired.to_lowercase()) {
                problems.push(format!("label '{retired}' is both declared and retired"));
            }
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                problems.push(format!("duplicate field '{}'", field.name));
            }
            if BUILTIN_FIELDS.contains(&field.name.as_str()) {
                problems.push(format!("field '{}' is built into every project", field.name));
            }
            match field.data_type() {
                Ok(data_type) if !data_type.is_creatable() => problems.push(format!(
                    "field '{}': type {data_type} cannot be created",
                    field.name
                )),
                Ok(FieldDataType::SingleSelect) if field.options.is_empty() => problems.push(
                    format!("field '{}': single_select needs options", field.name),
                ),
                Ok(FieldDataType::SingleSelect) => {}
                Ok(_) if !field.options.is_empty() => problems.push(format!(
                    "field '{}': only single_select fields take options",
                    field.name
                )),
                Ok(_) => {}
                Err(e) => problems.push(e.to_string()),
            }
            let mut names = HashSet::new();
            for option in &field.options {
                if !names.insert(option.name.as_str()) {
                    problems.push(format!(
                        "field '{}': duplicate option '{}'",
                        field.name, option.name
                    ));
                }
                if !OPTION_COLORS.contains(&option.color.as_str()) {
                    problems.push(format!(
                        "field '{}': option '{}' has unknown color '{}' (expected one of {})",
                        field.name,
                        option.name,
                        option.color,
                        OPTION_COLORS.join(", ")
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for view in &self.views {
            if !seen.insert(view.name.as_str()) {
                problems.push(format!("duplicate view '{}'", view.name));
            }
        }

        let mut seen = HashSet::new();
        for issue in &self.issues {
            if issue.title.trim().is_empty() {
                problems.push("issue with an empty title".to_string());
            }
            if !seen.insert(issue.title.as_str()) {
                problems.push(format!("duplicate issue '{}'", issue.title));
            }
            for subtask in &issue.subtasks {
                if !seen.insert(subtask.as_str()) {
                    problems.push(format!(
                        "subtask '{subtask}' of '{}' duplicates another issue title",
                        issue.title
                    ));
                }
            }
        }

        if !problems.is_empty() {
            bail!("{}", problems.join("\n"));
        }
        Ok(())
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}
