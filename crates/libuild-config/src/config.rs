//! Resolved configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Code output format a library can be published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    #[serde(alias = "es", alias = "module")]
    Esm,
    #[serde(alias = "commonjs")]
    Cjs,
    Umd,
}

/// How the entry module's exports are exposed in CJS and UMD output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportsMode {
    Auto,
    Default,
    #[default]
    Named,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeScriptOptions {
    #[serde(default)]
    pub tsconfig: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResolveOptions {
    pub extensions: Vec<String>,
}

impl Default for NodeResolveOptions {
    fn default() -> Self {
        Self {
            extensions: [".mjs", ".js", ".jsx", ".ts", ".tsx", ".json", ".node"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Module specifiers left out of the bundle.
///
/// An import is external when it equals a pattern or lives beneath it
/// (`lodash` matches `lodash` and `lodash/merge`, not `lodash-es`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalPredicate {
    patterns: Vec<String>,
}

impl ExternalPredicate {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn is_external(&self, id: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            id == pattern
                || id
                    .strip_prefix(pattern.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// A fully populated build configuration.
///
/// Produced by [`crate::resolve`]; every field holds a concrete value and a
/// disabled feature is spelled out as `None` or `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfig {
    pub library_name: String,
    pub entry: PathBuf,
    pub out_dir: PathBuf,
    pub sourcemap: bool,
    pub targets: Vec<ModuleFormat>,
    pub exports: ExportsMode,
    pub external: ExternalPredicate,
    /// Emit a bundled `.d.ts` alongside the code targets.
    pub dts: bool,
    pub banner: Option<String>,
    /// Directory to watch; `None` disables watch mode.
    pub watch: Option<PathBuf>,
    /// Set when the sources are TypeScript.
    pub typescript: Option<TypeScriptOptions>,
    pub node_resolve: NodeResolveOptions,
    pub minify: bool,
    pub analyze: bool,
    /// Import-to-global mapping for UMD output.
    pub globals: BTreeMap<String, String>,
    /// Directory holding `package.json`; relative paths resolve against it.
    pub project_root: PathBuf,
}

impl BuildConfig {
    pub fn wants(&self, format: ModuleFormat) -> bool {
        self.targets.contains(&format)
    }

    /// Entry path joined onto the project root.
    pub fn entry_path(&self) -> PathBuf {
        self.project_root.join(&self.entry)
    }

    pub fn out_dir_path(&self) -> PathBuf {
        self.project_root.join(&self.out_dir)
    }
}
