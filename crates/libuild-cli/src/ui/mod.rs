//! Terminal output for build status and summaries.
//!
//! Everything here writes to stderr. Colors follow `--no-color`, `NO_COLOR`
//! and `FORCE_COLOR`; `--quiet` silences everything except warnings and
//! errors.
//!
//! # Examples
//!
//! ```no_run
//! use libuild_cli::ui;
//!
//! ui::init(false, false);
//! ui::success("demo build succeeded");
//! ui::error("Failed to parse libuild.config.json");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{error, info, success, warning};

static COLOR: AtomicBool = AtomicBool::new(true);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Set up output from the global flags. Call once, early in `main`.
pub fn init(quiet: bool, no_color: bool) {
    COLOR.store(!no_color && should_use_color(), Ordering::Relaxed);
    QUIET.store(quiet, Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLOR.load(Ordering::Relaxed)
}

pub(crate) fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}
