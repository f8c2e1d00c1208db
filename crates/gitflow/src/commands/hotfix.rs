//! Hotfix commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use gitflow_core::Operation;
use gitflow_version::{BranchKind, Increment};

use crate::cli::ProjectArgs;

/// Arguments for the hotfix command.
#[derive(Debug, Args)]
pub struct HotfixArgs {
    #[command(subcommand)]
    pub command: HotfixCommand,
}

#[derive(Debug, Subcommand)]
pub enum HotfixCommand {
    /// Create a hotfix branch from the production branch
    Start,

    /// Merge the hotfix branch, tag it and delete it
    Finish,
}

/// Runs the hotfix command.
pub fn run(args: HotfixArgs, project: &ProjectArgs) -> Result<()> {
    let operation = match args.command {
        HotfixCommand::Start => Operation::Start(Increment::None),
        HotfixCommand::Finish => Operation::Finish,
    };
    super::run_workflow(BranchKind::Hotfix, operation, project)
}
