//! Output targets and their on-disk layout.

use libuild_config::{BuildConfig, ModuleFormat};
use serde::Serialize;
use std::fmt;

/// One distributable output of a library build.
///
/// Variants are declared in plan order; [`BuildTarget::ALL`] is the order
/// in which targets are compiled, submitted and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildTarget {
    Esm,
    Cjs,
    Umd,
    TypeDeclarations,
}

impl BuildTarget {
    pub const ALL: [BuildTarget; 4] = [
        BuildTarget::Esm,
        BuildTarget::Cjs,
        BuildTarget::Umd,
        BuildTarget::TypeDeclarations,
    ];

    /// Subdirectory of the output directory holding this target's files.
    pub fn subdir(self) -> &'static str {
        match self {
            BuildTarget::Esm => "node",
            BuildTarget::Cjs => "node-cjs",
            BuildTarget::Umd => "node-umd",
            BuildTarget::TypeDeclarations => "types",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            BuildTarget::Esm | BuildTarget::Umd => "js",
            BuildTarget::Cjs => "cjs",
            BuildTarget::TypeDeclarations => "d.ts",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildTarget::Esm => "esm",
            BuildTarget::Cjs => "cjs",
            BuildTarget::Umd => "umd",
            BuildTarget::TypeDeclarations => "types",
        }
    }

    /// Whether `config` asks for this target.
    pub fn requested_by(self, config: &BuildConfig) -> bool {
        match self {
            BuildTarget::Esm => config.wants(ModuleFormat::Esm),
            BuildTarget::Cjs => config.wants(ModuleFormat::Cjs),
            BuildTarget::Umd => config.wants(ModuleFormat::Umd),
            BuildTarget::TypeDeclarations => config.dts,
        }
    }

    pub fn emits_code(self) -> bool {
        !matches!(self, BuildTarget::TypeDeclarations)
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ModuleFormat> for BuildTarget {
    fn from(format: ModuleFormat) -> Self {
        match format {
            ModuleFormat::Esm => BuildTarget::Esm,
            ModuleFormat::Cjs => BuildTarget::Cjs,
            ModuleFormat::Umd => BuildTarget::Umd,
        }
    }
}
