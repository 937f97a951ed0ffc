//! Running external tools

use crate::error::RunError;
use anyhow::{Context, Result};
use std::process::Command;

/// Render a command the way a user would type it
pub fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run with inherited stdio and fail unless the exit status is success
pub fn run(cmd: &mut Command) -> Result<()> {
    let command = describe(cmd);
    log::debug!("Running `{}`", command);

    let status = cmd
        .status()
        .with_context(|| format!("Failed to run `{}`", command))?;

    if !status.success() {
        return Err(RunError::CommandFailed { command, status }.into());
    }

    Ok(())
}
