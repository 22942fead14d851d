//! Per-file directory watcher.
//!
//! The tree is enumerated once at start. Files created afterwards are not
//! watched until the watcher is restarted.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use super::{Debouncer, RebuildFn, WatchError};

/// Watches every file under a root and rebuilds through a [`Debouncer`].
pub struct DirectoryWatcher {
    root: PathBuf,
    debouncer: Arc<Debouncer>,
    rebuild: RebuildFn,
    watcher: Option<RecommendedWatcher>,
    forwarder: Option<JoinHandle<()>>,
}

impl DirectoryWatcher {
    pub fn new(root: impl Into<PathBuf>, debouncer: Arc<Debouncer>, rebuild: RebuildFn) -> Self {
        Self {
            root: root.into(),
            debouncer,
            rebuild,
            watcher: None,
            forwarder: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Schedule the initial build, then start watching.
    ///
    /// Returns the number of files being watched. A root that is not a
    /// readable directory and files that cannot be watched are logged and
    /// skipped; the initial build runs regardless.
    pub fn start(&mut self) -> Result<usize, WatchError> {
        let rebuild = Arc::clone(&self.rebuild);
        self.debouncer.schedule(move || rebuild());

        if !self.root.is_dir() {
            tracing::warn!("{}", WatchError::InvalidRoot(self.root.clone()));
            return Ok(0);
        }

        let files = enumerate_files(&self.root);
        let (tx, mut rx) = mpsc::channel::<Vec<PathBuf>>(100);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) if is_change(&event.kind) => {
                    // A full channel already guarantees a pending rebuild.
                    let _ = tx.try_send(event.paths);
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("{}", WatchError::Notify(err)),
            }
        })?;

        let mut watched = 0;
        for file in &files {
            match watcher.watch(file, RecursiveMode::NonRecursive) {
                Ok(()) => watched += 1,
                Err(err) => tracing::warn!(path = %file.display(), "failed to watch file: {err}"),
            }
        }

        let debouncer = Arc::clone(&self.debouncer);
        let rebuild = Arc::clone(&self.rebuild);
        self.forwarder = Some(tokio::spawn(async move {
            while let Some(paths) = rx.recv().await {
                tracing::debug!(?paths, "change detected");
                let rebuild = Arc::clone(&rebuild);
                debouncer.schedule(move || rebuild());
            }
        }));
        self.watcher = Some(watcher);

        tracing::debug!(root = %self.root.display(), files = watched, "watching");
        Ok(watched)
    }

    /// Stop watching and cancel any pending rebuild.
    pub fn stop(&mut self) {
        self.watcher = None;
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        self.debouncer.cancel();
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Every regular file under `root`, following symlinks.
///
/// Each directory and file is visited once by canonical path, so symlink
/// cycles terminate. Entries that cannot be read are logged and their
/// subtree is skipped.
pub fn enumerate_files(root: &Path) -> Vec<PathBuf> {
    let mut visited = HashSet::new();
    let mut files = Vec::new();
    let mut walker = WalkDir::new(root).follow_links(true).into_iter();

    while let Some(next) = walker.next() {
        let entry = match next {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                tracing::warn!(
                    "{}",
                    WatchError::Enumerate {
                        path,
                        reason: err.to_string(),
                    }
                );
                continue;
            }
        };

        let is_dir = entry.file_type().is_dir();
        let canonical = match entry.path().canonicalize() {
            Ok(canonical) => canonical,
            Err(err) => {
                tracing::warn!(
                    "{}",
                    WatchError::Enumerate {
                        path: entry.path().to_path_buf(),
                        reason: err.to_string(),
                    }
                );
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }
        };

        if !visited.insert(canonical) {
            if is_dir {
                walker.skip_current_dir();
            }
            continue;
        }

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files
}
