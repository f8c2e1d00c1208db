//! Release commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use gitflow_core::Operation;
use gitflow_version::{BranchKind, Increment};

use crate::cli::ProjectArgs;

/// Arguments for the release command.
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    #[command(subcommand)]
    pub command: ReleaseCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReleaseCommand {
    /// Create a release branch from the development branch
    Start(StartArgs),

    /// Merge the release branch, tag it and delete it
    Finish,
}

/// Arguments for the `release start` command.
#[derive(Debug, Args)]
pub struct StartArgs {
    /// Bump the major version before branching
    #[arg(long, conflicts_with = "minor")]
    pub major: bool,

    /// Bump the minor version before branching
    #[arg(long)]
    pub minor: bool,
}

impl StartArgs {
    fn increment(&self) -> Increment {
        if self.major {
            Increment::Major
        } else if self.minor {
            Increment::Minor
        } else {
            Increment::None
        }
    }
}

/// Runs the release command.
pub fn run(args: ReleaseArgs, project: &ProjectArgs) -> Result<()> {
    let operation = match args.command {
        ReleaseCommand::Start(start) => Operation::Start(start.increment()),
        ReleaseCommand::Finish => Operation::Finish,
    };
    super::run_workflow(BranchKind::Release, operation, project)
}
