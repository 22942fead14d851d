//! Watch loop for the build command.

use crate::commands::build::{build_all, executor};
use crate::error::Result;
use crate::ui;
use crate::watch::{DEFAULT_DEBOUNCE, Debouncer, DirectoryWatcher, rebuild_fn};
use libuild_config::BuildConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Build once, then rebuild on every change under `dir` until Ctrl+C.
///
/// Build failures are reported and the loop keeps running. Rebuilds never
/// overlap: a change during a build queues the next one behind it.
pub async fn run(configs: Vec<BuildConfig>, dir: PathBuf) -> Result<()> {
    let configs = Arc::new(configs);
    let executor = Arc::new(executor());
    let building = Arc::new(Mutex::new(()));

    let rebuild = rebuild_fn(move || {
        let configs = Arc::clone(&configs);
        let executor = Arc::clone(&executor);
        let building = Arc::clone(&building);
        async move {
            let _guard = building.lock().await;
            if let Err(err) = build_all(&configs, &executor).await {
                ui::error(&err.to_string());
            }
        }
    });

    let debouncer = Arc::new(Debouncer::new(DEFAULT_DEBOUNCE));
    let mut watcher = DirectoryWatcher::new(&dir, debouncer, rebuild);
    let files = watcher.start()?;
    ui::info(&format!(
        "Watching {} ({} files), press Ctrl+C to stop",
        dir.display(),
        files
    ));

    tokio::signal::ctrl_c().await?;
    watcher.stop();
    ui::info("Stopped watching");
    Ok(())
}
