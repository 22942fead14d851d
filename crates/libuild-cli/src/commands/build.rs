//! Build command implementation.
//!
//! Resolves the project's configurations, compiles one plan per
//! configuration and runs it through the rolldown engine. With `--watch`
//! (or a `watch` entry in the config) it hands over to the watch loop.

use crate::cli::BuildArgs;
use crate::commands::{utils, watch};
use crate::error::Result;
use crate::ui;
use libuild_bundler::{
    BuildExecutor, BuildReporter, BuildResult, BuildTarget, RolldownEngine, compile_plan,
};
use libuild_config::{BuildConfig, ConfigDiscovery, ProjectMetadata, resolve_all};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// A resolved project: its root and one configuration per build.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub configs: Vec<BuildConfig>,
}

impl Project {
    /// Find the project root, read `package.json` and resolve every config.
    pub fn load(args: &BuildArgs) -> Result<Self> {
        let root = utils::resolve_project_root(args.cwd.as_deref())?;
        let meta = ProjectMetadata::read(&root)?;
        let user = ConfigDiscovery::new(&root).load_or_default(args.config.as_deref())?;
        let configs = resolve_all(user.as_ref(), &meta, &root)?;
        Ok(Self { root, configs })
    }

    /// Directory to watch, if watch mode is on.
    ///
    /// The `--watch` flag wins over the config's `watch` entry.
    pub fn watch_dir(&self, flag: Option<&PathBuf>) -> Option<PathBuf> {
        flag.cloned()
            .or_else(|| self.configs.iter().find_map(|c| c.watch.clone()))
            .map(|dir| utils::resolve_path(&dir, &self.root))
    }
}

/// Execute the build command.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let project = Project::load(&args)?;

    if let Some(dir) = project.watch_dir(args.watch.as_ref()) {
        return watch::run(project.configs, dir).await;
    }

    build_all(&project.configs, &executor()).await
}

/// Executor wired to rolldown and terminal reporting.
pub fn executor() -> BuildExecutor {
    BuildExecutor::new(Arc::new(RolldownEngine::new())).with_reporter(Arc::new(CliReporter))
}

/// Build every configuration in order, stopping at the first failure.
pub async fn build_all(configs: &[BuildConfig], executor: &BuildExecutor) -> Result<()> {
    for config in configs {
        let start = Instant::now();
        let plan = compile_plan(config);
        if plan.is_empty() {
            ui::warning(&format!(
                "{}: no output formats configured, nothing to build",
                config.library_name
            ));
            continue;
        }

        let results = executor.execute(&plan, config).await?;
        ui::print_build_summary(&summary_entries(config, &results), start.elapsed());
    }
    Ok(())
}

fn summary_entries(config: &BuildConfig, results: &[BuildResult]) -> Vec<(String, u64)> {
    let out_dir = config.out_dir_path();
    results
        .iter()
        .flat_map(|result| result.files.iter())
        .map(|file| {
            let size = std::fs::metadata(out_dir.join(file))
                .map(|m| m.len())
                .unwrap_or(0);
            (file.clone(), size)
        })
        .collect()
}

/// Prints one line per exported target and one when the build succeeds.
struct CliReporter;

impl BuildReporter for CliReporter {
    fn target_built(&self, library: &str, _target: BuildTarget, primary_output: &str) {
        ui::success(&format!("{library} - {primary_output} exported"));
    }

    fn build_succeeded(&self, library: &str, _results: &[BuildResult]) {
        ui::success(&format!("{library} build succeeded"));
    }
}
