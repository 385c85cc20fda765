use serde::{Deserialize, Serialize};

pub const DEFAULT_PATTERN: &str = "**/*.png";
const DEFAULT_PARALLEL: usize = 4;

fn parse_percentage(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    validate_max_diff(v)
}

pub fn validate_max_diff(v: f64) -> Result<f64, String> {
    if !(0.0..=100.0).contains(&v) {
        return Err(format!("max_diff must be between 0 and 100, got {v}"));
    }
    Ok(v)
}

/// Settings for directory-to-directory comparison.
///
/// Fields are `Option`: `None` means "use default".
/// Serves both TOML deserialization (`[batch]`) and CLI argument parsing.
#[derive(Clone, Debug, Default, PartialEq, clap::Args, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Glob (relative to each directory) selecting the files to compare
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Number of pairs compared concurrently
    #[arg(long, short = 'p')]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,

    /// Largest diff percentage (0-100) still reported as SAME
    #[arg(long, value_parser = parse_percentage)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_diff: Option<f64>,
}

impl BatchConfig {
    /// Overlay non-None fields from `other` onto self.
    pub fn merge(&mut self, other: &BatchConfig) {
        if other.pattern.is_some() {
            self.pattern = other.pattern.clone();
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.max_diff.is_some() {
            self.max_diff = other.max_diff;
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    pub fn parallel(&self) -> usize {
        self.parallel.unwrap_or(DEFAULT_PARALLEL).max(1)
    }

    pub fn max_diff(&self) -> f64 {
        self.max_diff.unwrap_or(0.0)
    }
}
