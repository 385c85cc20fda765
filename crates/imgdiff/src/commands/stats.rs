use std::path::Path;

use anyhow::{Context, Result};
use imgdiff::{DiffEngine, DiffError, DiffStatistics};
use serde::Serialize;

use crate::config::ResolvedRunConfig;
use crate::report::terminal;

/// Exit code when the pair cannot be compared.
pub const UNAVAILABLE_EXIT: i32 = 2;

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum StatsReport {
    Available {
        threshold: u8,
        #[serde(flatten)]
        statistics: DiffStatistics,
    },
    Unavailable {
        side: String,
        error: String,
    },
}

impl StatsReport {
    fn new(result: &Result<DiffStatistics, DiffError>, threshold: u8) -> Self {
        match result {
            Ok(statistics) => Self::Available {
                threshold,
                statistics: *statistics,
            },
            Err(e) => Self::Unavailable {
                side: e.side().to_string(),
                error: e.to_string(),
            },
        }
    }
}

/// `imgdiff stats` — print difference statistics.
/// Returns exit code: 0 = computed, 2 = inputs could not be compared.
pub fn stats(config: &ResolvedRunConfig, first: &Path, second: &Path, json: bool) -> Result<i32> {
    let engine = DiffEngine::new(config.diff);
    let result = engine.compute_difference_statistics(first, second);
    let threshold = config.diff.threshold;

    if json {
        let report = StatsReport::new(&result, threshold);
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize statistics")?;
        println!("{out}");
    } else {
        match &result {
            Ok(stats) => terminal::print_statistics(stats, threshold),
            Err(e) => terminal::print_unavailable(e),
        }
    }

    Ok(if result.is_ok() { 0 } else { UNAVAILABLE_EXIT })
}
