//! Formatting for sizes, durations and the build summary table.

use std::time::Duration;

use console::Term;
use owo_colors::OwoColorize;

/// Human-readable byte size.
///
/// ```
/// use kiln_cli::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Human-readable duration (`50ms`, `1.50s`, `2m 5s`).
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the written files of a target run as a table on stderr.
///
/// Each entry is `(name, size in bytes, stage duration)`. The footer shows the
/// total size and `elapsed`, the wall time of the whole target.
pub fn print_build_summary(entries: &[(String, u64, Duration)], elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).min(80);

    eprintln!("\n{}", "Build Summary".bold().underline());
    eprintln!("{}", "─".repeat(width));

    for (name, size, duration) in entries {
        eprintln!(
            "  {} {} {} {}",
            "▸".blue(),
            name.bright_white().bold(),
            format_size(*size).dimmed(),
            format!("({})", format_duration(*duration)).dimmed()
        );
    }

    eprintln!("{}", "─".repeat(width));

    let total_size: u64 = entries.iter().map(|(_, size, _)| size).sum();
    eprintln!(
        "  {} {} in {} files, {}",
        "Total:".bold(),
        format_size(total_size).green(),
        entries.len(),
        format_duration(elapsed).green()
    );
}
