mod cli;
mod commands;
mod config;
mod epic;
mod manifest;
mod report;
mod resource;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use commands::with_session;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "ghboard", &mut io::stdout());
        return Ok(());
    }

    config::load_dotenv(&cli.env_file)?;

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    let manifest = cli.manifest.as_deref();

    match cli.command {
        Command::Validate => commands::validate::run(&ctx, manifest),
        Command::Fields(args) => with_session(manifest, |s| commands::fields::run(&ctx, s, args)),
        Command::Labels(args) => with_session(manifest, |s| commands::labels::run(&ctx, s, args)),
        Command::Issues(args) => with_session(manifest, |s| commands::issues::run(&ctx, s, args)),
        Command::Views(args) => with_session(manifest, |s| commands::views::run(&ctx, s, args)),
        Command::Setup(args) => commands::setup::run(&ctx, manifest, args),
        Command::Completions { .. } => Ok(()),
    }
}
