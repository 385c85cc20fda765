use std::io::Write;
use std::time::Duration;

use imgdiff::{DiffError, DiffStatistics, Side};

use crate::compare::PairStatus;

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

fn other(side: Side) -> Side {
    match side {
        Side::First => Side::Second,
        Side::Second => Side::First,
    }
}

pub fn status_line(name: &str, status: &PairStatus) -> String {
    match status {
        PairStatus::Same => format!("  \x1b[32mSAME\x1b[0m  {name}"),
        PairStatus::Differ {
            diff_pixels,
            diff_percentage,
            dimension_mismatch,
        } => {
            let sizes = match dimension_mismatch {
                Some((fw, fh, sw, sh)) => format!("resized {fw}x{fh} vs {sw}x{sh}, "),
                None => String::new(),
            };
            format!(
                "  \x1b[31mDIFF\x1b[0m  {name}  ({sizes}{diff_pixels} pixels, {diff_percentage:.2}%)"
            )
        }
        PairStatus::Missing(side) => {
            format!("  \x1b[33mMISS\x1b[0m  {name}  (only in {} directory)", other(*side))
        }
        PairStatus::Error(msg) => format!("  \x1b[31m ERR\x1b[0m  {name}  ({msg})"),
    }
}

/// Print a single pair result line.
pub fn print_line(name: &str, status: &PairStatus, elapsed: Duration) {
    clear_line();
    println!(
        "{}  \x1b[2m{}\x1b[0m",
        status_line(name, status),
        format_duration(elapsed)
    );
}

/// Show comparison progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Comparing  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

pub fn print_statistics(stats: &DiffStatistics, threshold: u8) {
    println!(
        "Pixels:     {} total, {} above threshold {threshold}",
        stats.total_pixels, stats.diff_pixels
    );
    println!("Different:  \x1b[31m{:.2}%\x1b[0m", stats.diff_percentage);
    println!("Similar:    \x1b[32m{:.2}%\x1b[0m", stats.similarity_percentage);
}

/// Fallback when the pair cannot be compared.
pub fn print_unavailable(err: &DiffError) {
    println!("Statistics unavailable: {err}");
}

/// Print an actionable summary listing pair names grouped by status.
/// Only prints sections with at least one entry.
pub fn print_actionable_summary(different: &[String], missing: &[String], errored: &[String]) {
    if different.is_empty() && missing.is_empty() && errored.is_empty() {
        return;
    }

    clear_line();
    println!();
    println!("Actionable pairs:");

    for (label, names) in [
        ("Different", different),
        ("Missing", missing),
        ("Errored", errored),
    ] {
        if !names.is_empty() {
            println!();
            println!("  {label} ({}):", names.len());
            for name in names {
                println!("    {name}");
            }
        }
    }
}

/// Print the final summary.
pub fn print_summary(
    total: usize,
    same: usize,
    different: usize,
    missing: usize,
    errored: usize,
    elapsed: Duration,
) {
    clear_line();
    println!();
    print!(
        "Pairs:  {total} total, \x1b[32m{same} same\x1b[0m, \x1b[31m{different} different\x1b[0m"
    );
    if missing > 0 {
        print!(", \x1b[33m{missing} missing\x1b[0m");
    }
    if errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    println!();
    println!("Time:   {}", format_duration(elapsed));
}
