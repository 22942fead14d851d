//! Build plan compilation.
//!
//! Turns a resolved [`BuildConfig`] into one [`BuildDescriptor`] per
//! requested target. Compilation is pure: the same configuration always
//! yields the same descriptors, in [`BuildTarget::ALL`] order.

use libuild_config::{BuildConfig, ExportsMode};
use path_clean::PathClean;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::plugins::{PluginRegistry, PluginStage};
use crate::target::BuildTarget;

/// Everything the engine needs to produce one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDescriptor {
    pub target: BuildTarget,
    /// Sanitized library name used in file names and the UMD global.
    pub name: String,
    /// Absolute entry module path.
    pub input: PathBuf,
    /// Project root; module resolution starts here.
    pub cwd: PathBuf,
    /// Absolute output directory. File names below are relative to it.
    pub out_dir: PathBuf,
    pub entry_file_name: String,
    /// Chunk file pattern; `[hash]` is replaced by the content hash.
    pub chunk_file_name: String,
    pub plugins: Vec<PluginStage>,
    /// UMD global variable name.
    pub global_name: Option<String>,
    pub sourcemap: bool,
    pub exports: ExportsMode,
    pub banner: Option<String>,
    pub external: Vec<String>,
    pub globals: BTreeMap<String, String>,
}

impl BuildDescriptor {
    /// Path of the entry output, relative to `out_dir`.
    pub fn primary_output(&self) -> &str {
        &self.entry_file_name
    }

    pub fn has_stage(&self, name: &str) -> bool {
        self.plugins.iter().any(|stage| stage.name() == name)
    }
}

/// Make a package name safe for file names and identifiers.
///
/// Scoped names lose the `@` marker and have the scope separator replaced by
/// a hyphen (`@scope/widget` → `scope-widget`). Names without a scope marker
/// are returned unchanged.
pub fn sanitize_library_name(name: &str) -> String {
    if name.contains('@') {
        name.replace('@', "").replace('/', "-")
    } else {
        name.to_string()
    }
}

/// Compile `config` into descriptors, one per requested target.
///
/// An empty result is valid and means there is nothing to build.
pub fn compile_plan(config: &BuildConfig) -> Vec<BuildDescriptor> {
    let name = sanitize_library_name(&config.library_name);
    let input = config.entry_path().clean();
    let out_dir = config.out_dir_path().clean();

    BuildTarget::ALL
        .into_iter()
        .filter(|target| target.requested_by(config))
        .map(|target| {
            let subdir = target.subdir();
            let ext = target.extension();

            BuildDescriptor {
                target,
                name: name.clone(),
                input: input.clone(),
                cwd: config.project_root.clone(),
                out_dir: out_dir.clone(),
                entry_file_name: format!("{subdir}/{name}.{ext}"),
                chunk_file_name: format!("{subdir}/chunks/dep-[hash].{ext}"),
                plugins: pipeline_for(target, config),
                global_name: (target == BuildTarget::Umd).then(|| name.clone()),
                sourcemap: config.sourcemap && target.emits_code(),
                exports: config.exports,
                banner: config.banner.clone().filter(|_| target.emits_code()),
                external: config.external.patterns().to_vec(),
                globals: config.globals.clone(),
            }
        })
        .collect()
}

fn pipeline_for(target: BuildTarget, config: &BuildConfig) -> Vec<PluginStage> {
    let mut registry = PluginRegistry::new();
    registry.add(PluginStage::NodeResolve {
        extensions: config.node_resolve.extensions.clone(),
    });

    if target == BuildTarget::TypeDeclarations {
        registry.add(PluginStage::Declarations);
        return registry.into_pipeline();
    }

    registry.add(PluginStage::CommonJs).add(PluginStage::Json);
    if let Some(ts) = &config.typescript {
        registry.add(PluginStage::TypeScript {
            tsconfig: ts.tsconfig.clone(),
        });
    }
    registry
        .add_if(config.minify, PluginStage::Minify)
        .add_if(config.analyze, PluginStage::Analyze);
    registry.into_pipeline()
}
