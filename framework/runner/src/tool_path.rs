use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::bail;
use anyhow::Context;

use crate::types::SweepResult;

/// Environment variable to override the path to the enhancement tool named in the experiment file.
pub const ITE_SWEEP_TOOL_PATH_ENV: &str = "ITE_SWEEP_TOOL_PATH";

/// Get the path to the enhancement tool.
///
/// If the [`ITE_SWEEP_TOOL_PATH_ENV`] environment variable is set, its value replaces `configured`.
/// A value that contains a path separator must point at an existing file. A bare name, such as
/// `ite`, is looked up in the user's `PATH`.
pub fn resolve_tool_path(configured: &Path) -> SweepResult<PathBuf> {
    resolve_tool_path_with_override(configured, env::var_os(ITE_SWEEP_TOOL_PATH_ENV))
}

pub(crate) fn resolve_tool_path_with_override(
    configured: &Path,
    env_override: Option<OsString>,
) -> SweepResult<PathBuf> {
    let requested = match env_override {
        Some(value) if value.is_empty() => {
            bail!("'{ITE_SWEEP_TOOL_PATH_ENV}' set to empty string");
        }
        Some(value) => {
            log::info!(
                "Using enhancement tool from '{ITE_SWEEP_TOOL_PATH_ENV}={}'",
                value.to_string_lossy()
            );
            PathBuf::from(value)
        }
        None => configured.to_path_buf(),
    };

    if requested.as_os_str().is_empty() {
        bail!("No enhancement tool configured");
    }

    if requested.components().count() > 1 {
        if !requested.exists() {
            bail!(
                "Enhancement tool '{path}' doesn't exist",
                path = requested.display()
            );
        }
        return Ok(requested);
    }

    log::debug!(
        "'{}' is not a path so looking in user's 'PATH'",
        requested.display()
    );
    which::which(&requested).with_context(|| {
        format!(
            "Enhancement tool '{name}' not found in PATH. Build the tool or set '{ITE_SWEEP_TOOL_PATH_ENV}' to the correct path.",
            name = requested.display()
        )
    })
}
