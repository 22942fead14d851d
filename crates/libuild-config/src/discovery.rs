//! File-based config discovery for CLI use
//!
//! Finds the configuration for a project and loads it through a
//! [`ConfigLoader`]. Library users can skip this and build a
//! [`UserConfig`] directly.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ConfigError, LoadError, Result};
use crate::metadata::{CONFIG_FIELD, ProjectMetadata};
use crate::partial::UserConfig;

/// Conventional config files, in lookup order.
pub const CONFIG_FILE_NAMES: &[&str] = &["libuild.config.json", "libuild.config.toml"];

/// Loads a user configuration from a path.
pub trait ConfigLoader: Send + Sync {
    fn load(&self, path: &Path) -> std::result::Result<UserConfig, LoadError>;
}

/// Parses JSON and TOML config files, or the `libuild` field of a
/// `package.json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsConfigLoader;

impl ConfigLoader for FsConfigLoader {
    fn load(&self, path: &Path) -> std::result::Result<UserConfig, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_err = |message: String| LoadError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let value = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            let pkg: Value = serde_json::from_str(&content)
                .map_err(|e| parse_err(format!("Invalid JSON: {e}")))?;
            match pkg.get(CONFIG_FIELD) {
                Some(value) if !value.is_null() => value.clone(),
                _ => return Err(LoadError::NotFound(path.to_path_buf())),
            }
        } else {
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => serde_json::from_str(&content)
                    .map_err(|e| parse_err(format!("Invalid JSON: {e}")))?,
                Some("toml") => {
                    let toml_val: toml::Value = toml::from_str(&content)
                        .map_err(|e| parse_err(format!("Invalid TOML syntax: {e}")))?;
                    serde_json::to_value(toml_val).map_err(|e| {
                        parse_err(format!("TOML to JSON conversion failed: {e}"))
                    })?
                }
                other => {
                    return Err(LoadError::UnsupportedFormat(
                        other.unwrap_or("<none>").to_string(),
                    ));
                }
            }
        };

        UserConfig::from_value(value).map_err(|e| LoadError::Invalid {
            path: path.to_path_buf(),
            message: match e {
                ConfigError::InvalidConfig(message) => message,
                other => other.to_string(),
            },
        })
    }
}

/// Locates and loads a project's configuration.
pub struct ConfigDiscovery<L = FsConfigLoader> {
    root: PathBuf,
    loader: L,
}

impl ConfigDiscovery<FsConfigLoader> {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_loader(root, FsConfigLoader)
    }
}

impl<L: ConfigLoader> ConfigDiscovery<L> {
    pub fn with_loader(root: impl AsRef<Path>, loader: L) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            loader,
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `libuild.config.json`
    /// 2. `libuild.config.toml`
    /// 3. package.json (`libuild` field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in CONFIG_FILE_NAMES {
            let path = self.root.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        let has_field = fs::read_to_string(&pkg_path)
            .ok()
            .and_then(|content| ProjectMetadata::from_json(&content).ok())
            .is_some_and(|meta| meta.config.is_some_and(|value| !value.is_null()));
        has_field.then_some(pkg_path)
    }

    /// Load the explicit config file, or the discovered one.
    ///
    /// `explicit` is resolved relative to the project root. A missing or
    /// unreadable file is logged as a warning and yields `Ok(None)` so the
    /// caller builds with defaults; parse and shape errors are returned.
    pub fn load_or_default(&self, explicit: Option<&Path>) -> Result<Option<UserConfig>> {
        let path = match explicit {
            Some(path) => self.root.join(path),
            None => match self.find() {
                Some(path) => path,
                None => {
                    tracing::warn!(
                        root = %self.root.display(),
                        "no libuild config found, using defaults"
                    );
                    return Ok(None);
                }
            },
        };

        tracing::debug!(path = %path.display(), "loading config");
        match self.loader.load(&path) {
            Ok(config) => Ok(Some(config)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("{err}; using defaults");
                Ok(None)
            }
            Err(LoadError::Invalid { path, message }) => Err(ConfigError::InvalidConfig(format!(
                "{}: {message}",
                path.display()
            ))),
            Err(err) => Err(err.into()),
        }
    }
}
