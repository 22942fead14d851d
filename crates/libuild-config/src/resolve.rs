//! Default inference and shallow merging.

use std::path::{Path, PathBuf};

use crate::config::{
    BuildConfig, ExportsMode, ExternalPredicate, ModuleFormat, NodeResolveOptions,
    TypeScriptOptions,
};
use crate::error::{ConfigError, Result};
use crate::metadata::ProjectMetadata;
use crate::partial::{ExternalKeyword, ExternalSpec, PartialConfig, TsSpec, UserConfig, WatchSpec};

pub const DEFAULT_OUT_DIR: &str = "./dist";
pub const DEFAULT_WATCH_DIR: &str = "./src/";

/// Compute the default configuration for a project.
pub fn defaults(meta: &ProjectMetadata, root: &Path) -> BuildConfig {
    let typescript = meta.uses_typescript();
    let ext = if typescript { "ts" } else { "js" };

    BuildConfig {
        library_name: meta.name.clone().unwrap_or_default(),
        entry: PathBuf::from(format!("./src/index.{ext}")),
        out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        sourcemap: true,
        targets: vec![ModuleFormat::Esm, ModuleFormat::Cjs],
        exports: ExportsMode::Named,
        external: ExternalPredicate::default(),
        dts: typescript,
        banner: None,
        watch: None,
        typescript: typescript.then(|| default_typescript(root)),
        node_resolve: NodeResolveOptions::default(),
        minify: false,
        analyze: false,
        globals: Default::default(),
        project_root: root.to_path_buf(),
    }
}

/// Merge an optional partial configuration over the defaults.
///
/// The merge is shallow: a key present in `partial` replaces the default
/// value for that key entirely. `partial` is never modified.
pub fn resolve(
    partial: Option<&PartialConfig>,
    meta: &ProjectMetadata,
    root: &Path,
) -> Result<BuildConfig> {
    let base = defaults(meta, root);
    let config = match partial {
        Some(partial) => merge(base, partial, meta, root),
        None => base,
    };
    validate(config)
}

/// Resolve every build described by a user configuration.
///
/// A list yields one configuration per element in order; a function is
/// called with the defaults and its result merged like an object. No
/// configuration at all yields the defaults.
pub fn resolve_all(
    user: Option<&UserConfig>,
    meta: &ProjectMetadata,
    root: &Path,
) -> Result<Vec<BuildConfig>> {
    match user {
        None => Ok(vec![resolve(None, meta, root)?]),
        Some(UserConfig::Object(partial)) => Ok(vec![resolve(Some(partial), meta, root)?]),
        Some(UserConfig::List(list)) => list
            .iter()
            .map(|partial| resolve(Some(partial), meta, root))
            .collect(),
        Some(UserConfig::Function(f)) => {
            let partial = f(&defaults(meta, root));
            Ok(vec![resolve(Some(&partial), meta, root)?])
        }
    }
}

fn merge(
    base: BuildConfig,
    user: &PartialConfig,
    meta: &ProjectMetadata,
    root: &Path,
) -> BuildConfig {
    let external = match &user.external {
        Some(ExternalSpec::List(patterns)) => ExternalPredicate::new(patterns.clone()),
        Some(ExternalSpec::Keyword(ExternalKeyword::Dependencies)) => {
            ExternalPredicate::new(meta.runtime_dependency_names())
        }
        None => base.external,
    };

    let watch = match &user.watch {
        Some(WatchSpec::Enabled(false)) => None,
        Some(WatchSpec::Enabled(true)) => Some(PathBuf::from(DEFAULT_WATCH_DIR)),
        Some(WatchSpec::Path(path)) => Some(path.clone()),
        None => base.watch,
    };

    let typescript = match &user.ts {
        Some(TsSpec::Enabled(false)) => None,
        Some(TsSpec::Enabled(true)) => Some(default_typescript(root)),
        Some(TsSpec::Options(options)) => Some(options.clone()),
        None => base.typescript,
    };

    BuildConfig {
        library_name: user.library_name.clone().unwrap_or(base.library_name),
        entry: user.entry.clone().unwrap_or(base.entry),
        out_dir: user.out_dir.clone().unwrap_or(base.out_dir),
        sourcemap: user.sourcemap.unwrap_or(base.sourcemap),
        targets: user.targets.clone().unwrap_or(base.targets),
        exports: user.exports.unwrap_or(base.exports),
        external,
        dts: user.dts.unwrap_or(base.dts),
        banner: user.banner.clone().or(base.banner),
        watch,
        typescript,
        node_resolve: user.node_resolve.clone().unwrap_or(base.node_resolve),
        minify: user.minify.unwrap_or(base.minify),
        analyze: user.analyze.unwrap_or(base.analyze),
        globals: user.globals.clone().unwrap_or(base.globals),
        project_root: base.project_root,
    }
}

fn validate(config: BuildConfig) -> Result<BuildConfig> {
    if config.library_name.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "libraryName is required when package.json has no name".to_string(),
        ));
    }
    Ok(config)
}

fn default_typescript(root: &Path) -> TypeScriptOptions {
    TypeScriptOptions {
        tsconfig: Some(root.join("tsconfig.json")),
    }
}
