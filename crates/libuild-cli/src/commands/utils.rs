//! Shared helpers for command implementations.

use crate::error::{CliError, Result};
use crate::ui;
use std::path::{Path, PathBuf};

/// Resolve `path` against `cwd` unless it is already absolute.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Get the current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to get current directory: {}", e),
        ))
    })
}

/// Resolve the project root directory.
///
/// Resolution priority (highest to lowest):
/// 1. Explicit `--cwd` flag if provided
/// 2. Nearest directory containing package.json, walking up from the
///    current directory
/// 3. The current directory, with a warning
///
/// # Errors
///
/// Fails when the explicit directory does not exist or is not a directory.
pub fn resolve_project_root(explicit_cwd: Option<&Path>) -> Result<PathBuf> {
    let current_dir = get_cwd()?;

    if let Some(cwd_path) = explicit_cwd {
        let absolute = resolve_path(cwd_path, &current_dir);

        if !absolute.exists() {
            return Err(CliError::InvalidArgument(format!(
                "Specified --cwd directory does not exist: {}",
                absolute.display()
            )));
        }

        if !absolute.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "Specified --cwd is not a directory: {}",
                absolute.display()
            )));
        }

        tracing::debug!(root = %absolute.display(), "project root from --cwd");
        return Ok(absolute);
    }

    if let Some(root) = libuild_config::find_project_root(&current_dir) {
        tracing::debug!(root = %root.display(), "project root from nearest package.json");
        return Ok(root);
    }

    ui::warning(&format!(
        "No package.json found above {}, using it as the project root",
        current_dir.display()
    ));
    Ok(current_dir)
}
