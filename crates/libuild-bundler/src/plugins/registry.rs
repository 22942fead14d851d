//! Plugin pipeline with execution phases.
//!
//! Each build descriptor carries an ordered list of [`PluginStage`]s. The
//! order is load-bearing: later stages assume earlier ones have already
//! normalized module shape, so stages are kept sorted by [`PluginPhase`].

use serde::Serialize;
use std::path::PathBuf;

/// Plugin execution phases
///
/// Stages run in phase order (lower numbers first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PluginPhase {
    /// Module resolution against node_modules and the configured extensions
    Resolve = 10,

    /// CommonJS to ESM interop normalization
    Interop = 20,

    /// Data imports such as JSON
    Data = 30,

    /// Source transforms (TypeScript stripping, declaration emit)
    Transform = 40,

    /// Output optimization
    Optimize = 50,

    /// Post-build analysis. Runs last.
    Analyze = 100,
}

/// A single pass requested from the bundling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum PluginStage {
    NodeResolve { extensions: Vec<String> },
    CommonJs,
    Json,
    TypeScript { tsconfig: Option<PathBuf> },
    /// Emit `.d.ts` files instead of code.
    Declarations,
    Minify,
    Analyze,
}

impl PluginStage {
    pub fn phase(&self) -> PluginPhase {
        match self {
            PluginStage::NodeResolve { .. } => PluginPhase::Resolve,
            PluginStage::CommonJs => PluginPhase::Interop,
            PluginStage::Json => PluginPhase::Data,
            PluginStage::TypeScript { .. } | PluginStage::Declarations => PluginPhase::Transform,
            PluginStage::Minify => PluginPhase::Optimize,
            PluginStage::Analyze => PluginPhase::Analyze,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PluginStage::NodeResolve { .. } => "node-resolve",
            PluginStage::CommonJs => "commonjs",
            PluginStage::Json => "json",
            PluginStage::TypeScript { .. } => "typescript",
            PluginStage::Declarations => "declarations",
            PluginStage::Minify => "minify",
            PluginStage::Analyze => "analyze",
        }
    }
}

/// Collects stages and hands them back in phase order.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    stages: Vec<PluginStage>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage. Sorting happens once in [`PluginRegistry::into_pipeline`].
    pub fn add(&mut self, stage: PluginStage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Add `stage` only when `enabled`.
    pub fn add_if(&mut self, enabled: bool, stage: PluginStage) -> &mut Self {
        if enabled {
            self.stages.push(stage);
        }
        self
    }

    /// Stages sorted by phase. The sort is stable, so stages sharing a
    /// phase keep insertion order.
    pub fn into_pipeline(mut self) -> Vec<PluginStage> {
        self.stages.sort_by_key(PluginStage::phase);
        self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
