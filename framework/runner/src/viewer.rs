use std::path::Path;
use std::process::Command;

use anyhow::Context;

use crate::types::SweepResult;

/// Open `path` with the platform's default viewer without waiting for it to close.
pub fn open_in_viewer(path: &Path) -> SweepResult<()> {
    let mut command = viewer_command(path)?;
    log::debug!("Opening viewer: {command:?}");

    command
        .spawn()
        .with_context(|| format!("Failed to open {} in a viewer", path.display()))?;

    Ok(())
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> SweepResult<Command> {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    Ok(command)
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> SweepResult<Command> {
    let opener = which::which("open").context("'open' not found in PATH")?;
    let mut command = Command::new(opener);
    command.arg(path);
    Ok(command)
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn viewer_command(path: &Path) -> SweepResult<Command> {
    let opener = which::which("xdg-open").context("'xdg-open' not found in PATH")?;
    let mut command = Command::new(opener);
    command.arg(path);
    Ok(command)
}
