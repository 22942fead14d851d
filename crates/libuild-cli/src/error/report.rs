//! Conversion from CLI errors to miette reports.

use miette::Report;

use crate::error::CliError;

/// Convert a [`CliError`] into a report for display.
///
/// Bundler errors keep their own diagnostic codes and help; everything else
/// gets the CLI hint attached.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => Report::new(e),
        other => match other.hint() {
            Some(hint) => miette::miette!(help = hint, "{}", other),
            None => miette::miette!("{}", other),
        },
    }
}
