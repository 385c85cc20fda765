use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use imgdiff::DiffConfig;
use tracing::debug;

use crate::compare::PairStatus;
use crate::compare::diff::{self, CompareResult};
use crate::compare::pairs::{self, PairJob};
use crate::config::ResolvedRunConfig;
use crate::report::terminal;
use crate::store;

/// Compare one pair on the blocking pool. `None` when a side is missing.
async fn run_pair(job: &PairJob, config: DiffConfig) -> Result<Option<CompareResult>> {
    let (Some(first), Some(second)) = (job.first.clone(), job.second.clone()) else {
        return Ok(None);
    };
    let result = tokio::task::spawn_blocking(move || diff::compare(&first, &second, &config))
        .await
        .context("Diff task panicked")??;
    Ok(Some(result))
}

/// `imgdiff batch` — pair, compare, report.
/// Returns exit code: 0 = every pair within `max_diff`, 1 = any different, missing or errored.
pub async fn batch(
    config: ResolvedRunConfig,
    first_dir: &Path,
    second_dir: &Path,
    output: Option<&Path>,
) -> Result<i32> {
    let pattern = config.batch.pattern();
    let jobs = pairs::discover(first_dir, second_dir, pattern)?;
    if jobs.is_empty() {
        println!("No files matching '{pattern}'.");
        return Ok(0);
    }

    let total = jobs.len();
    let parallel = config.batch.parallel();
    let max_diff = config.batch.max_diff();
    let diff_config = config.diff;
    debug!(total, parallel, max_diff, "starting batch");

    let run_start = Instant::now();
    let mut results = stream::iter(jobs)
        .map(move |job| async move {
            let start = Instant::now();
            let result = run_pair(&job, diff_config).await;
            (job, result, start.elapsed())
        })
        .buffer_unordered(parallel);

    let mut done = 0usize;
    let mut same = 0usize;
    let mut different_names: Vec<String> = Vec::new();
    let mut missing_names: Vec<String> = Vec::new();
    let mut errored_names: Vec<String> = Vec::new();

    while let Some((job, result, elapsed)) = results.next().await {
        done += 1;
        debug!(done, total, name = %job.id, "received result");
        let status = classify(&job, result, max_diff, output)?;

        match &status {
            PairStatus::Same => same += 1,
            PairStatus::Differ { .. } => different_names.push(job.id.clone()),
            PairStatus::Missing(_) => missing_names.push(job.id.clone()),
            PairStatus::Error(_) => errored_names.push(job.id.clone()),
        }

        terminal::print_line(&job.id, &status, elapsed);
        terminal::show_progress(done, total);
    }

    different_names.sort();
    missing_names.sort();
    errored_names.sort();
    terminal::print_actionable_summary(&different_names, &missing_names, &errored_names);
    terminal::print_summary(
        total,
        same,
        different_names.len(),
        missing_names.len(),
        errored_names.len(),
        run_start.elapsed(),
    );

    if different_names.is_empty() && missing_names.is_empty() && errored_names.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

/// Turn a pair result into a status, writing the heat map of differing pairs.
fn classify(
    job: &PairJob,
    result: Result<Option<CompareResult>>,
    max_diff: f64,
    output: Option<&Path>,
) -> Result<PairStatus> {
    let status = match result {
        Err(e) => PairStatus::Error(format!("{e:#}")),
        Ok(None) => match job.missing_side() {
            Some(side) => PairStatus::Missing(side),
            None => PairStatus::Error("pair was not compared".into()),
        },
        Ok(Some(r)) if r.statistics.diff_percentage <= max_diff => PairStatus::Same,
        Ok(Some(r)) => {
            if let Some(out_dir) = output {
                let path = store::write_heatmap(out_dir, &job.id, &r.diff_image)?;
                debug!(path = %path.display(), "wrote heat map");
            }
            PairStatus::Differ {
                diff_pixels: r.statistics.diff_pixels,
                diff_percentage: r.statistics.diff_percentage,
                dimension_mismatch: r.dimension_mismatch,
            }
        }
    };
    Ok(status)
}
