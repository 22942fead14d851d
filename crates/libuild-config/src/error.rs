//! Error types for configuration loading and resolution.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `package.json` is missing or could not be parsed.
    #[error("project metadata not found at {}: {reason}", .path.display())]
    MetadataNotFound { path: PathBuf, reason: String },

    /// The user configuration has an unsupported shape or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while reading a configuration file.
///
/// [`LoadError::is_recoverable`] separates the cases that fall back to the
/// default configuration from the ones that must stop the build.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid configuration in {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

impl LoadError {
    /// Missing or unreadable files are tolerated; everything else is fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LoadError::NotFound(_) | LoadError::Read { .. })
    }
}
