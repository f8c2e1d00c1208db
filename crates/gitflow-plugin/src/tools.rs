//! External tool lookup and invocation.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::{PluginError, PluginResult};

/// Checks that every tool is on `PATH`.
///
/// # Errors
///
/// Returns [`PluginError::ToolUnavailable`] naming the first missing tool.
pub fn ensure_tools(tools: &[&str]) -> PluginResult<()> {
    for tool in tools {
        match which::which(tool) {
            Ok(path) => debug!(tool, path = %path.display(), "found tool"),
            Err(_) => return Err(PluginError::ToolUnavailable((*tool).to_string())),
        }
    }
    Ok(())
}

/// Runs a tool in `dir` and returns its trimmed stdout.
///
/// # Errors
///
/// Returns [`PluginError::ToolUnavailable`] if the program cannot be
/// started, or [`PluginError::CommandFailed`] with captured output on a
/// non-zero exit.
pub fn run_tool(dir: &Path, program: &str, args: &[&str]) -> PluginResult<String> {
    let command_line = format!("{program} {}", args.join(" "));
    debug!(command = %command_line, dir = %dir.display(), "running tool");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|_| PluginError::ToolUnavailable(program.to_string()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(PluginError::CommandFailed {
            command: command_line,
            output: if stderr.is_empty() { stdout } else { stderr },
        });
    }

    Ok(stdout)
}
