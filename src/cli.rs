use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghboard")]
#[command(version)]
#[command(about = "Provision GitHub labels, project fields and sample issues from a manifest", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Environment file loaded before reading settings
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    /// Board manifest (overrides BOARD_MANIFEST; built-in when unset)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check gh, credentials, settings, repository and project access
    Validate,

    /// Reconcile custom project fields
    Fields(FieldsArgs),

    /// Reconcile repository labels
    Labels(LabelsArgs),

    /// Create the sample issues and link epic sub-issues
    Issues(IssuesArgs),

    /// Compare project views with the recommended set
    Views(ViewsArgs),

    /// Run validate, fields, labels, issues and views in order
    Setup(SetupArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct FieldsArgs {
    /// Show the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Delete custom fields the manifest does not declare
    #[arg(long)]
    pub prune: bool,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LabelsArgs {
    /// Show the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Delete every label the manifest does not declare
    #[arg(long, conflicts_with = "keep_retired")]
    pub prune: bool,

    /// Leave the manifest's retired labels in place
    #[arg(long)]
    pub keep_retired: bool,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct IssuesArgs {
    /// Show the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of existing issues fetched to detect duplicates
    #[arg(long, default_value_t = 500)]
    pub limit: usize,
}

impl Default for IssuesArgs {
    fn default() -> Self {
        Self {
            dry_run: false,
            limit: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ViewsArgs {
    /// Print the setup guide for every view, not only those needing action
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct SetupArgs {
    /// Show every plan without changing anything
    #[arg(long)]
    pub dry_run: bool,
}
