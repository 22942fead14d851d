//! Concurrent execution of a build plan.
//!
//! Every descriptor is submitted to the engine at once. Submission follows
//! plan order; completion order is whatever the engine produces. The
//! executor always waits for every submission, so a failing target never
//! cancels its siblings and their output may already be on disk when the
//! aggregate error is reported.

use libuild_config::BuildConfig;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::engine::{BundleEngine, EngineError};
use crate::plan::BuildDescriptor;
use crate::target::BuildTarget;
use crate::{Error, Result};

/// Outcome of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    pub target: BuildTarget,
    /// Emitted file names relative to the output directory.
    pub files: Vec<String>,
    pub success: bool,
    pub error: Option<String>,
}

/// A target whose engine submission failed.
#[derive(Debug, thiserror::Error)]
#[error("{target}: {source}")]
pub struct BuildTargetError {
    pub target: BuildTarget,
    pub source: EngineError,
}

/// Receives progress from the executor.
pub trait BuildReporter: Send + Sync {
    /// One target finished; `primary_output` is relative to the output dir.
    fn target_built(&self, library: &str, target: BuildTarget, primary_output: &str);

    /// Every target in the plan succeeded.
    fn build_succeeded(&self, library: &str, results: &[BuildResult]);
}

/// Reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl BuildReporter for TracingReporter {
    fn target_built(&self, library: &str, target: BuildTarget, primary_output: &str) {
        tracing::info!(build = %target, "{library} - {primary_output} exported");
    }

    fn build_succeeded(&self, library: &str, results: &[BuildResult]) {
        tracing::info!(targets = results.len(), "{library} build succeeded");
    }
}

/// Per-descriptor results in plan order.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub results: Vec<BuildResult>,
    pub failures: Vec<BuildTargetError>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The results, or [`Error::Build`] listing every failed target.
    pub fn into_result(self) -> Result<Vec<BuildResult>> {
        if self.failures.is_empty() {
            Ok(self.results)
        } else {
            Err(Error::Build(self.failures))
        }
    }
}

pub struct BuildExecutor {
    engine: Arc<dyn BundleEngine>,
    reporter: Arc<dyn BuildReporter>,
}

impl BuildExecutor {
    pub fn new(engine: Arc<dyn BundleEngine>) -> Self {
        Self {
            engine,
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn BuildReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run `plan` and fail with every target error if any target failed.
    pub async fn execute(
        &self,
        plan: &[BuildDescriptor],
        config: &BuildConfig,
    ) -> Result<Vec<BuildResult>> {
        self.run(plan, config).await.into_result()
    }

    /// Run `plan` to completion and report each target's outcome.
    ///
    /// An empty plan is a no-op: nothing is submitted and nothing is
    /// reported.
    pub async fn run(&self, plan: &[BuildDescriptor], config: &BuildConfig) -> ExecutionReport {
        if plan.is_empty() {
            tracing::debug!("empty build plan, nothing to do");
            return ExecutionReport::default();
        }

        let library = Arc::<str>::from(config.library_name.as_str());
        let mut join_set = JoinSet::new();

        for (index, descriptor) in plan.iter().enumerate() {
            let engine = Arc::clone(&self.engine);
            let reporter = Arc::clone(&self.reporter);
            let library = Arc::clone(&library);
            let descriptor = descriptor.clone();

            tracing::debug!(build = %descriptor.target, "submitting");
            join_set.spawn(async move {
                let outcome = engine.submit(&descriptor).await;
                if outcome.is_ok() {
                    reporter.target_built(&library, descriptor.target, descriptor.primary_output());
                }
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<std::result::Result<Vec<String>, EngineError>>> =
            (0..plan.len()).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(join_err) => tracing::error!("build task panicked: {join_err}"),
            }
        }

        let mut report = ExecutionReport::default();
        for (descriptor, outcome) in plan.iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| {
                Err(EngineError::Bundler(
                    "build task ended without a result".to_string(),
                ))
            });

            match outcome {
                Ok(files) => report.results.push(BuildResult {
                    target: descriptor.target,
                    files,
                    success: true,
                    error: None,
                }),
                Err(source) => {
                    report.results.push(BuildResult {
                        target: descriptor.target,
                        files: Vec::new(),
                        success: false,
                        error: Some(source.to_string()),
                    });
                    report.failures.push(BuildTargetError {
                        target: descriptor.target,
                        source,
                    });
                }
            }
        }

        if report.is_success() {
            self.reporter.build_succeeded(&library, &report.results);
        } else {
            for failure in &report.failures {
                tracing::debug!(build = %failure.target, "target failed: {}", failure.source);
            }
        }

        report
    }
}
