use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available libuild subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the library (default)
    ///
    /// Bundles the entry module into every configured format and writes the
    /// results below the output directory.
    Build(BuildArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Path to a config file
    ///
    /// Resolved relative to the project root. When omitted, libuild looks for
    /// libuild.config.json, then libuild.config.toml, then a "libuild" field
    /// in package.json.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Rebuild when files change
    ///
    /// Watches the given directory, or ./src/ when no path is given. Runs
    /// until interrupted.
    #[arg(
        short = 'w',
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "./src/"
    )]
    pub watch: Option<PathBuf>,

    /// Project root directory
    ///
    /// Defaults to the nearest directory containing package.json, starting
    /// from the current directory.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
