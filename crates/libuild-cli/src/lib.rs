//! libuild CLI - bundle a JavaScript/TypeScript library for publishing.
//!
//! The binary is a thin layer over `libuild-config` and `libuild-bundler`:
//!
//! - [`cli`] - argument parsing with clap
//! - [`commands`] - the build command and its watch loop
//! - [`watch`] - debouncer and per-file directory watcher
//! - [`error`] - error types with actionable hints
//! - [`logger`] - `tracing` subscriber setup
//! - [`ui`] - status lines and build summaries on stderr
//!
//! # Example
//!
//! ```rust,no_run
//! use libuild_cli::{error::Result, logger, ui};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     ui::init(false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watch;

pub use error::{CliError, Result, ResultExt};
