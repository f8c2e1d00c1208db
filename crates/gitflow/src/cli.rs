//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Run Gitflow release and hotfix workflows with automatic version management.
#[derive(Debug, Parser)]
#[command(name = "gitflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the project lives and how it is configured.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Project directory (the root of the working copy)
    #[arg(
        short = 'C',
        long = "project",
        global = true,
        env = "GITFLOW_PROJECT",
        default_value = "."
    )]
    pub path: PathBuf,

    /// Configuration file (defaults to the nearest gitflow.toml)
    #[arg(short, long, global = true, env = "GITFLOW_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start or finish a release branch
    Release(commands::release::ReleaseArgs),

    /// Start or finish a hotfix branch
    Hotfix(commands::hotfix::HotfixArgs),

    /// List version plugins and the one handling the project
    Plugins,
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Release(args) => commands::release::run(args, &self.project),
            Commands::Hotfix(args) => commands::hotfix::run(args, &self.project),
            Commands::Plugins => commands::plugins::run(&self.project),
        }
    }
}
