//! Watch mode: a debounced rebuild loop over a directory tree.
//!
//! [`DirectoryWatcher`] enumerates the tree once, watches every file it
//! found and forwards change events to a [`Debouncer`], which coalesces
//! bursts into a single rebuild.

mod debounce;
mod watcher;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use watcher::{DirectoryWatcher, enumerate_files};

pub type RebuildFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Rebuild action run by the debouncer. Called once per debounce window.
pub type RebuildFn = Arc<dyn Fn() -> RebuildFuture + Send + Sync>;

/// Wrap an async closure as a [`RebuildFn`].
pub fn rebuild_fn<F, Fut>(f: F) -> RebuildFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || -> RebuildFuture { Box::pin(f()) })
}

/// Filesystem failure while setting up or running a watch.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The watch root does not exist or is not a directory.
    #[error("watch root is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// A path could not be read or stat'ed during enumeration.
    #[error("failed to enumerate {}: {reason}", .path.display())]
    Enumerate { path: PathBuf, reason: String },

    /// The platform watcher reported an error.
    #[error(transparent)]
    Notify(#[from] notify::Error),
}
