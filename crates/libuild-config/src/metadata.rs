//! `package.json` reading.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Maximum allowed size for package.json files (10MB)
const MAX_PACKAGE_JSON_SIZE: u64 = 10 * 1024 * 1024;

/// Field in `package.json` that may carry libuild configuration.
pub const CONFIG_FIELD: &str = "libuild";

/// The parts of `package.json` used for default inference.
///
/// Read-only: libuild never writes this file back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: BTreeMap<String, String>,
    /// Inline configuration under the `libuild` key.
    #[serde(default, rename = "libuild", skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ProjectMetadata {
    /// Read `package.json` from the project root.
    ///
    /// Fails with [`ConfigError::MetadataNotFound`] when the file is missing,
    /// oversized, or not valid JSON.
    pub fn read(root: &Path) -> Result<Self> {
        let path = root.join("package.json");
        let not_found = |reason: String| ConfigError::MetadataNotFound {
            path: path.clone(),
            reason,
        };

        let metadata = fs::metadata(&path).map_err(|e| not_found(e.to_string()))?;
        if metadata.len() > MAX_PACKAGE_JSON_SIZE {
            return Err(not_found(format!(
                "package.json exceeds maximum size of {}MB",
                MAX_PACKAGE_JSON_SIZE / 1024 / 1024
            )));
        }

        let content = fs::read_to_string(&path).map_err(|e| not_found(e.to_string()))?;
        Self::from_json(&content).map_err(|e| not_found(format!("invalid package.json: {e}")))
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Whether `typescript` is declared in dependencies or devDependencies.
    pub fn uses_typescript(&self) -> bool {
        self.dependencies.contains_key("typescript")
            || self.dev_dependencies.contains_key("typescript")
    }

    /// Runtime dependency names: dependencies followed by peerDependencies.
    pub fn runtime_dependency_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dependencies.keys().cloned().collect();
        for name in self.peer_dependencies.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// Walk up from `start` to the first directory containing `package.json`.
pub fn find_project_root(start: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = Some(start.as_ref());
    while let Some(dir) = current {
        if dir.join("package.json").is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
