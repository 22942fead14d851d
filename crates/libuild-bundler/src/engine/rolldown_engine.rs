//! Bundling engine backed by rolldown.

use async_trait::async_trait;
use rolldown::{
    Bundler, BundlerBuilder as RolldownBundlerBuilder, BundlerOptions, GlobalsOutputOption,
    InputItem, OutputFormat, Platform, RawMinifyOptions, ResolveOptions, SourceMapType,
};
use rolldown_common::{AddonOutputOption, Output, OutputExports};
use rolldown_plugin::__inner::SharedPluginable;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

use libuild_config::ExportsMode;

use super::{BundleEngine, BundleSession, EngineError};
use crate::output::{OutputFile, write_outputs};
use crate::plan::BuildDescriptor;
use crate::plugins::{ExternalPlugin, PluginStage};
use crate::target::BuildTarget;

/// Builds descriptors with rolldown and writes the result atomically.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolldownEngine;

impl RolldownEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BundleEngine for RolldownEngine {
    async fn open(
        &self,
        descriptor: &BuildDescriptor,
    ) -> Result<Box<dyn BundleSession>, EngineError> {
        let options = bundler_options(descriptor);
        let plugins = plugins_for(descriptor)?;

        tracing::debug!(
            build = %descriptor.target,
            entry = %descriptor.input.display(),
            stages = ?descriptor.plugins.iter().map(PluginStage::name).collect::<Vec<_>>(),
            "opening rolldown session"
        );

        let bundler = RolldownBundlerBuilder::default()
            .with_options(options)
            .with_plugins(plugins)
            .build()
            .map_err(|e| EngineError::from_rolldown(&e))?;

        Ok(Box::new(RolldownSession {
            bundler,
            descriptor: descriptor.clone(),
        }))
    }
}

struct RolldownSession {
    bundler: Bundler,
    descriptor: BuildDescriptor,
}

#[async_trait]
impl BundleSession for RolldownSession {
    async fn write(&mut self) -> Result<Vec<String>, EngineError> {
        let bundle = self
            .bundler
            .generate()
            .await
            .map_err(|e| EngineError::from_rolldown(&e))?;

        let declarations_only = self.descriptor.target == BuildTarget::TypeDeclarations;
        let mut files = Vec::with_capacity(bundle.assets.len());
        for item in &bundle.assets {
            match item {
                Output::Chunk(chunk) if !declarations_only => {
                    files.push(OutputFile::new(chunk.filename.as_str(), chunk.code.as_bytes()));
                }
                Output::Asset(asset) if asset.filename.as_str().ends_with(".map") => {
                    files.push(OutputFile::new(
                        asset.filename.as_str(),
                        without_sources_content(asset.source.as_bytes()),
                    ));
                }
                Output::Asset(asset)
                    if !declarations_only || asset.filename.as_str().ends_with(".d.ts") =>
                {
                    files.push(OutputFile::new(
                        asset.filename.as_str(),
                        asset.source.as_bytes(),
                    ));
                }
                _ => {}
            }
        }

        if declarations_only && files.is_empty() {
            return Err(EngineError::Declarations(format!(
                "no TypeScript modules reachable from {}",
                self.descriptor.input.display()
            )));
        }

        if self.descriptor.has_stage("analyze") {
            files.push(stats_file(&self.descriptor, &files)?);
        }

        let out_dir = self.descriptor.out_dir.clone();
        tokio::task::spawn_blocking(move || write_outputs(&files, &out_dir))
            .await
            .map_err(|e| EngineError::Write(format!("writer task failed: {e}")))?
            .map_err(EngineError::from)
    }

    async fn close(self: Box<Self>) -> Result<(), EngineError> {
        let mut session = self;
        session
            .bundler
            .close()
            .await
            .map_err(|e| EngineError::from_rolldown(&e))
    }
}

fn bundler_options(descriptor: &BuildDescriptor) -> BundlerOptions {
    let format = match descriptor.target {
        BuildTarget::Esm | BuildTarget::TypeDeclarations => OutputFormat::Esm,
        BuildTarget::Cjs => OutputFormat::Cjs,
        BuildTarget::Umd => OutputFormat::Umd,
    };

    let mut options = BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(descriptor.name.clone()),
            import: descriptor.input.to_string_lossy().into_owned(),
        }]),
        cwd: Some(descriptor.cwd.clone()),
        dir: Some(descriptor.out_dir.to_string_lossy().into_owned()),
        format: Some(format),
        platform: Some(Platform::Node),
        entry_filenames: Some(code_file_name(descriptor, &descriptor.entry_file_name).into()),
        chunk_filenames: Some(code_file_name(descriptor, &descriptor.chunk_file_name).into()),
        sourcemap: descriptor.sourcemap.then_some(SourceMapType::File),
        name: descriptor.global_name.clone(),
        exports: Some(match descriptor.exports {
            ExportsMode::Auto => OutputExports::Auto,
            ExportsMode::Default => OutputExports::Default,
            ExportsMode::Named => OutputExports::Named,
            ExportsMode::None => OutputExports::None,
        }),
        banner: descriptor
            .banner
            .clone()
            .map(|banner| AddonOutputOption::String(Some(banner))),
        ..Default::default()
    };

    if !descriptor.globals.is_empty() {
        let globals: FxHashMap<String, String> = descriptor
            .globals
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        options.globals = Some(GlobalsOutputOption::from(globals));
    }

    for stage in &descriptor.plugins {
        match stage {
            PluginStage::NodeResolve { extensions } => {
                options.resolve = Some(ResolveOptions {
                    extensions: Some(extensions.clone()),
                    main_fields: Some(vec!["module".to_string(), "main".to_string()]),
                    condition_names: Some(condition_names(descriptor.target)),
                    ..Default::default()
                });
            }
            // Interop, JSON and TypeScript are handled natively by rolldown
            // once resolution is configured.
            PluginStage::CommonJs | PluginStage::Json => {}
            PluginStage::TypeScript { tsconfig } => {
                tracing::debug!(tsconfig = ?tsconfig, "typescript sources enabled");
            }
            PluginStage::Minify => {
                options.minify = Some(RawMinifyOptions::from(true));
            }
            PluginStage::Declarations | PluginStage::Analyze => {}
        }
    }

    options
}

/// Rolldown file name for the code chunks of `descriptor`.
///
/// The types build discards its code chunks, so they get `.js` names that
/// cannot collide with the declaration assets.
fn code_file_name(descriptor: &BuildDescriptor, pattern: &str) -> String {
    match descriptor.target {
        BuildTarget::TypeDeclarations => match pattern.strip_suffix(".d.ts") {
            Some(stem) => format!("{stem}.js"),
            None => pattern.to_string(),
        },
        _ => pattern.to_string(),
    }
}

/// Drop `sourcesContent` so maps reference sources instead of embedding them.
fn without_sources_content(map: &[u8]) -> Vec<u8> {
    let Ok(mut json) = serde_json::from_slice::<serde_json::Value>(map) else {
        return map.to_vec();
    };
    match json.as_object_mut() {
        Some(object) if object.remove("sourcesContent").is_some() => {
            serde_json::to_vec(&json).unwrap_or_else(|_| map.to_vec())
        }
        _ => map.to_vec(),
    }
}

fn condition_names(target: BuildTarget) -> Vec<String> {
    let kind = match target {
        BuildTarget::Cjs | BuildTarget::Umd => "require",
        BuildTarget::Esm | BuildTarget::TypeDeclarations => "import",
    };
    [kind, "node", "default"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn plugins_for(descriptor: &BuildDescriptor) -> Result<Vec<SharedPluginable>, EngineError> {
    let mut plugins: Vec<SharedPluginable> = Vec::new();
    if !descriptor.external.is_empty() {
        plugins.push(Arc::new(ExternalPlugin::new(descriptor.external.clone())));
    }

    if descriptor.has_stage("declarations") {
        #[cfg(feature = "dts-generation")]
        plugins.push(Arc::new(crate::plugins::DtsEmitPlugin::new(
            descriptor.input.clone(),
            descriptor.entry_file_name.clone(),
        )));

        #[cfg(not(feature = "dts-generation"))]
        return Err(EngineError::Unsupported(
            "type declarations require the `dts-generation` feature".to_string(),
        ));
    }

    Ok(plugins)
}

#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    target: BuildTarget,
    entry: &'a str,
    files: Vec<StatsEntry<'a>>,
    total_bytes: usize,
}

#[derive(Debug, Serialize)]
struct StatsEntry<'a> {
    file: &'a str,
    bytes: usize,
}

/// `<subdir>/<name>.stats.json` listing every emitted file and its size.
fn stats_file(descriptor: &BuildDescriptor, files: &[OutputFile]) -> Result<OutputFile, EngineError> {
    let entries: Vec<StatsEntry<'_>> = files
        .iter()
        .map(|file| StatsEntry {
            file: &file.file_name,
            bytes: file.contents.len(),
        })
        .collect();
    let report = StatsReport {
        target: descriptor.target,
        entry: descriptor.primary_output(),
        total_bytes: entries.iter().map(|e| e.bytes).sum(),
        files: entries,
    };

    let json = serde_json::to_vec_pretty(&report)
        .map_err(|e| EngineError::Write(format!("failed to serialize stats: {e}")))?;
    Ok(OutputFile::new(
        format!("{}/{}.stats.json", descriptor.target.subdir(), descriptor.name),
        json,
    ))
}
