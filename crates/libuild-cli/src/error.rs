//! Error handling for the libuild CLI.
//!
//! Library errors from `libuild-config` and `libuild-bundler` convert into
//! [`CliError`] automatically. Each variant renders with a hint so the user
//! knows what to try next.
//!
//! # Example
//!
//! ```rust,no_run
//! use libuild_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_entry(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Check the 'input' field in your config")
//! }
//! ```

mod report;

use std::path::PathBuf;
use thiserror::Error;

use crate::watch::WatchError;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be resolved
    #[error("Configuration error: {0}")]
    Config(#[from] libuild_config::ConfigError),

    /// One or more build targets failed
    #[error(transparent)]
    Build(#[from] libuild_bundler::Error),

    /// The watch loop could not be set up
    #[error("File watcher error: {0}")]
    Watch(#[from] WatchError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Message with context or a hint attached
    #[error("{0}")]
    Custom(String),
}

impl CliError {
    /// Suggested next step for the user, if there is one.
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::Config(libuild_config::ConfigError::MetadataNotFound { path, .. }) => {
                Some(format!(
                    "Run libuild from a package directory, or pass --cwd <dir>. Looked for {}",
                    path.display()
                ))
            }
            CliError::Config(libuild_config::ConfigError::InvalidConfig(_)) => Some(
                "The config must be an object or an array of objects. See libuild.config.json"
                    .to_string(),
            ),
            CliError::Config(_) => Some("Check the syntax of your config file".to_string()),
            CliError::Watch(_) => {
                Some("Check that the watch directory exists and is readable".to_string())
            }
            CliError::FileNotFound(_) => Some("Check the path and try again".to_string()),
            _ => None,
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
