//! Command implementations for the libuild CLI.

pub mod build;
pub(crate) mod utils;
mod watch;

pub use build::execute as build_execute;
