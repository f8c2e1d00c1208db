//! System `git` invocation.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::{GitError, GitResult};

/// Runs `git` subcommands inside a working copy.
pub(crate) struct GitCommand<'a> {
    work_tree: &'a Path,
}

impl<'a> GitCommand<'a> {
    pub(crate) fn new(work_tree: &'a Path) -> Self {
        Self { work_tree }
    }

    /// Runs `git <args>` and returns its trimmed stdout.
    ///
    /// A non-zero exit becomes [`GitError::CommandFailed`] carrying stderr,
    /// or stdout when stderr is empty (merge conflicts report on stdout).
    pub(crate) fn run(&self, args: &[&str]) -> GitResult<String> {
        let command_line = format!("git {}", args.join(" "));
        debug!(command = %command_line, "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(self.work_tree)
            .args(["-c", "advice.detachedHead=false"])
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let captured = if stderr.is_empty() { stdout } else { stderr };
            return Err(GitError::command_failed(command_line, captured));
        }

        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_success() {
        let temp_dir = TempDir::new().unwrap();
        let git = GitCommand::new(temp_dir.path());
        git.run(&["init", "--quiet"]).unwrap();
        let inside = git.run(&["rev-parse", "--is-inside-work-tree"]).unwrap();
        assert_eq!(inside, "true");
    }

    #[test]
    fn test_run_failure_captures_output() {
        let temp_dir = TempDir::new().unwrap();
        let git = GitCommand::new(temp_dir.path());
        git.run(&["init", "--quiet"]).unwrap();

        let err = git.run(&["checkout", "does-not-exist"]).unwrap_err();
        match err {
            GitError::CommandFailed { command, output } => {
                assert_eq!(command, "git checkout does-not-exist");
                assert!(!output.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
