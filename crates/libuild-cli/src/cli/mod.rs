//! Command-line interface definition.
//!
//! `libuild` with no subcommand runs `build`, so `libuild -w` and
//! `libuild build -w` are the same invocation.

mod commands;
mod tests;

use clap::Parser;

pub use commands::{BuildArgs, Command};

/// libuild - bundle a JavaScript/TypeScript library for publishing
#[derive(Parser, Debug)]
#[command(
    name = "libuild",
    version,
    about = "Bundle a JavaScript/TypeScript library for publishing",
    long_about = "libuild bundles a library's entry module into ESM, CommonJS and UMD outputs\n\
                  plus optional TypeScript declarations, driven by package.json and an optional\n\
                  libuild.config.json or libuild.config.toml.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to `build`)
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub build: BuildArgs,
}

impl Cli {
    /// The command to run, with `build` filled in when none was given.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Build(self.build))
    }
}
