//! Shared test utilities for libuild-bundler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use libuild_bundler::{
    BuildDescriptor, BuildReporter, BuildResult, BuildTarget, BundleEngine, BundleSession,
    EngineError, OutputFile, write_outputs,
};
use libuild_config::{BuildConfig, ProjectMetadata, resolve};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Write a minimal library project with a package.json and entry file.
pub fn create_project(package_json: &str, entry: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("package.json"), package_json).expect("write package.json");
    let src = dir.path().join("src");
    std::fs::create_dir_all(&src).expect("create src");
    std::fs::write(src.join("index.js"), entry).expect("write entry");
    dir
}

/// Resolve the default configuration for the project at `root`.
pub fn default_config(root: &Path) -> BuildConfig {
    let meta = ProjectMetadata::read(root).expect("read package.json");
    resolve(None, &meta, root).expect("resolve config")
}

/// Everything the fake engine saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened(BuildTarget),
    Closed(BuildTarget),
}

/// Engine that writes a small file per descriptor without bundling.
///
/// Targets listed in `fail` error during write; `delay` lets a target finish
/// later than its siblings.
#[derive(Default)]
pub struct FakeEngine {
    pub events: Arc<Mutex<Vec<Event>>>,
    pub fail: Vec<BuildTarget>,
    pub delay: Vec<(BuildTarget, Duration)>,
}

impl FakeEngine {
    pub fn failing(fail: Vec<BuildTarget>) -> Self {
        Self {
            fail,
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&Event) -> bool) -> usize {
        self.events.lock().iter().filter(|e| matches(e)).count()
    }
}

#[async_trait]
impl BundleEngine for FakeEngine {
    async fn open(
        &self,
        descriptor: &BuildDescriptor,
    ) -> Result<Box<dyn BundleSession>, EngineError> {
        self.events.lock().push(Event::Opened(descriptor.target));
        let delay = self
            .delay
            .iter()
            .find(|(target, _)| *target == descriptor.target)
            .map(|(_, d)| *d);
        Ok(Box::new(FakeSession {
            descriptor: descriptor.clone(),
            events: Arc::clone(&self.events),
            fail: self.fail.contains(&descriptor.target),
            delay,
        }))
    }
}

struct FakeSession {
    descriptor: BuildDescriptor,
    events: Arc<Mutex<Vec<Event>>>,
    fail: bool,
    delay: Option<Duration>,
}

#[async_trait]
impl BundleSession for FakeSession {
    async fn write(&mut self) -> Result<Vec<String>, EngineError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(EngineError::Bundler(format!(
                "could not resolve entry {}",
                self.descriptor.input.display()
            )));
        }
        let file = OutputFile::new(self.descriptor.primary_output(), "export {};\n");
        write_outputs(&[file], &self.descriptor.out_dir).map_err(EngineError::from)
    }

    async fn close(self: Box<Self>) -> Result<(), EngineError> {
        self.events.lock().push(Event::Closed(self.descriptor.target));
        Ok(())
    }
}

/// Reporter that records every line it would print.
#[derive(Default)]
pub struct RecordingReporter {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl BuildReporter for RecordingReporter {
    fn target_built(&self, library: &str, _target: BuildTarget, primary_output: &str) {
        self.lines
            .lock()
            .push(format!("{library} - {primary_output} exported"));
    }

    fn build_succeeded(&self, library: &str, _results: &[BuildResult]) {
        self.lines.lock().push(format!("{library} build succeeded"));
    }
}
