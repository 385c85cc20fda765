use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use imgdiff::Side;

/// Two files sharing a relative path under the compared directories.
#[derive(Debug, Clone, PartialEq)]
pub struct PairJob {
    /// Relative path, used as the display name.
    pub id: String,
    pub first: Option<PathBuf>,
    pub second: Option<PathBuf>,
}

impl PairJob {
    /// Which directory lacks this file, if either.
    pub fn missing_side(&self) -> Option<Side> {
        match (&self.first, &self.second) {
            (None, _) => Some(Side::First),
            (_, None) => Some(Side::Second),
            _ => None,
        }
    }
}

/// Match `pattern` inside both directories and pair the results by
/// relative path. Sorted by id.
pub fn discover(first_dir: &Path, second_dir: &Path, pattern: &str) -> Result<Vec<PairJob>> {
    let mut jobs: BTreeMap<String, PairJob> = BTreeMap::new();

    for (dir, side) in [(first_dir, Side::First), (second_dir, Side::Second)] {
        if !dir.is_dir() {
            bail!("{} is not a directory", dir.display());
        }
        for rel in matching_files(dir, pattern)? {
            let id = rel.to_string_lossy().replace('\\', "/");
            let job = jobs.entry(id.clone()).or_insert_with(|| PairJob {
                id,
                first: None,
                second: None,
            });
            let full = dir.join(&rel);
            match side {
                Side::First => job.first = Some(full),
                Side::Second => job.second = Some(full),
            }
        }
    }

    Ok(jobs.into_values().collect())
}

/// Files under `dir` matching `pattern`, as paths relative to `dir`.
fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let mut files = Vec::new();
    for entry in glob::glob(&full).with_context(|| format!("Invalid pattern '{pattern}'"))? {
        let path = entry.context("Failed to read directory entry")?;
        if !path.is_file() {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(dir) {
            files.push(rel.to_path_buf());
        }
    }
    Ok(files)
}
