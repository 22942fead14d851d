//! Bundling engine interface.
//!
//! The executor talks to the engine through scoped sessions: open a session
//! for one descriptor, write its outputs, close it. [`BundleEngine::submit`]
//! runs that sequence and closes the session on both success and failure.

use async_trait::async_trait;

use crate::plan::BuildDescriptor;

pub mod rolldown_engine;

pub use rolldown_engine::RolldownEngine;

/// Error reported by an engine for a single descriptor.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("bundler error: {0}")]
    Bundler(String),

    #[error("declaration emit failed: {0}")]
    Declarations(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("failed to write output: {0}")]
    Write(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Wrap a rolldown diagnostic batch.
    pub fn from_rolldown(error: &dyn std::fmt::Debug) -> Self {
        EngineError::Bundler(format!("{error:?}"))
    }
}

impl From<crate::Error> for EngineError {
    fn from(err: crate::Error) -> Self {
        EngineError::Write(err.to_string())
    }
}

/// One open build for one descriptor.
#[async_trait]
pub trait BundleSession: Send {
    /// Produce and write outputs; returns file names relative to the
    /// descriptor's output directory.
    async fn write(&mut self) -> Result<Vec<String>, EngineError>;

    /// Release the session. Called exactly once, whatever `write` returned.
    async fn close(self: Box<Self>) -> Result<(), EngineError>;
}

#[async_trait]
pub trait BundleEngine: Send + Sync {
    async fn open(
        &self,
        descriptor: &BuildDescriptor,
    ) -> Result<Box<dyn BundleSession>, EngineError>;

    /// Open, write and close a session for `descriptor`.
    ///
    /// A write failure takes precedence over a close failure.
    async fn submit(&self, descriptor: &BuildDescriptor) -> Result<Vec<String>, EngineError> {
        let mut session = self.open(descriptor).await?;
        let written = session.write().await;
        let closed = session.close().await;

        match (written, closed) {
            (Ok(files), Ok(())) => Ok(files),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), closed) => {
                if let Err(close_err) = closed {
                    tracing::warn!(
                        build = %descriptor.target,
                        "failed to close session after write error: {close_err}"
                    );
                }
                Err(err)
            }
        }
    }
}
