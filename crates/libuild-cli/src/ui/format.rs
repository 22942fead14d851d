//! Sizes, durations and the per-build file summary.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

const UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// Human-readable size of an emitted file, e.g. `"14.88 KB"`.
///
/// ```
/// use libuild_cli::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.2} {}", UNITS[unit])
}

/// Build time: milliseconds below one second, otherwise seconds.
pub fn format_duration(duration: Duration) -> String {
    match duration.as_millis() {
        ms if ms < 1000 => format!("{ms}ms"),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}

/// One `(file, size)` line per entry, then the total line.
fn summary_lines(entries: &[(String, u64)], elapsed: Duration) -> (Vec<(String, String)>, String) {
    let files = entries
        .iter()
        .map(|(name, size)| (name.clone(), format_size(*size)))
        .collect();
    let total: u64 = entries.iter().map(|(_, size)| size).sum();
    (
        files,
        format!("{} in {}", format_size(total), format_duration(elapsed)),
    )
}

/// Print the emitted files of one build with their sizes to stderr.
///
/// Nothing is printed in quiet mode or when nothing was emitted.
pub fn print_build_summary(entries: &[(String, u64)], elapsed: Duration) {
    if super::is_quiet() || entries.is_empty() {
        return;
    }

    let width = (Term::stderr().size().1 as usize).min(80);
    let color = super::colors_enabled();
    let (files, total) = summary_lines(entries, elapsed);

    eprintln!();
    for (name, size) in &files {
        if color {
            eprintln!("  {} {} {}", "▸".blue(), name.bright_white().bold(), size.dimmed());
        } else {
            eprintln!("  ▸ {name} {size}");
        }
    }
    eprintln!("{}", "─".repeat(width));
    if color {
        eprintln!("  {} {}", "Total:".bold(), total.green());
    } else {
        eprintln!("  Total: {total}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_switch_units_at_1024() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(15_234), "14.88 KB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
    }

    #[test]
    fn durations_under_a_second_are_milliseconds() {
        assert_eq!(format_duration(Duration::from_millis(450)), "450ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn summary_totals_every_file() {
        let entries = vec![
            ("node/demo.js".to_string(), 1024),
            ("node-cjs/demo.cjs".to_string(), 2048),
        ];

        let (files, total) = summary_lines(&entries, Duration::from_millis(450));
        assert_eq!(files[0], ("node/demo.js".to_string(), "1.00 KB".to_string()));
        assert_eq!(files[1].1, "2.00 KB");
        assert_eq!(total, "3.00 KB in 450ms");
    }
}
