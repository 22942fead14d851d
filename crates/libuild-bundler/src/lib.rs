//! # libuild-bundler
//!
//! Turns a resolved [`libuild_config::BuildConfig`] into per-format build
//! descriptors and runs them through a bundling engine.
//!
//! ```no_run
//! use std::sync::Arc;
//! use libuild_bundler::{BuildExecutor, RolldownEngine, compile_plan};
//! # async fn example(config: libuild_config::BuildConfig) -> libuild_bundler::Result<()> {
//! let plan = compile_plan(&config);
//! let results = BuildExecutor::new(Arc::new(RolldownEngine::new()))
//!     .execute(&plan, &config)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod executor;
pub mod output;
pub mod plan;
pub mod plugins;
pub mod target;

pub use engine::{BundleEngine, BundleSession, EngineError, RolldownEngine};
pub use executor::{
    BuildExecutor, BuildReporter, BuildResult, BuildTargetError, ExecutionReport, TracingReporter,
};
pub use output::{OutputFile, write_outputs};
pub use plan::{BuildDescriptor, compile_plan, sanitize_library_name};
pub use plugins::{PluginPhase, PluginRegistry, PluginStage};
pub use target::BuildTarget;

/// Error types for libuild-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// One or more targets failed. Every failure is listed in plan order.
    #[error("Build failed for {} target(s): {}", .0.len(), format_failures(.0))]
    Build(Vec<BuildTargetError>),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for libuild-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Targets that failed, if this is a build failure.
    pub fn failed_targets(&self) -> Vec<BuildTarget> {
        match self {
            Error::Build(failures) => failures.iter().map(|f| f.target).collect(),
            _ => Vec::new(),
        }
    }
}

fn format_failures(failures: &[BuildTargetError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Build(_) => "BUILD_FAILED",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Io(_) => "IO_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidConfig(msg) => Some(Box::new(format!(
                "Check your configuration file for syntax errors.\nError: {}",
                msg
            ))),
            Error::Build(failures) if failures.len() > 1 => Some(Box::new(
                "Several targets failed. Outputs of the targets that succeeded were still written.",
            )),
            Error::Build(_) => Some(Box::new(
                "Check that the entry file exists and its imports resolve.",
            )),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it stays inside the output directory.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::Io(_) => None,
        }
    }
}
