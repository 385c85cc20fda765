use anyhow::{Context, Result};
use imgdiff::{DiffConfig, validate_threshold};

use super::batch::BatchConfig;
use super::{Config, load};

/// Values extracted from the CLI that participate in the merge.
#[derive(Default)]
pub struct CliOverrides {
    pub threshold: Option<u8>,
    pub batch: BatchConfig,
}

/// Values read from `IMGDIFF_*` environment variables.
#[derive(Default)]
struct EnvOverrides {
    threshold: Option<u8>,
    parallel: Option<usize>,
}

impl EnvOverrides {
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let threshold = lookup("IMGDIFF_THRESHOLD")
            .map(|v| -> Result<u8> {
                let v: i64 = v
                    .trim()
                    .parse()
                    .context("IMGDIFF_THRESHOLD must be an integer")?;
                validate_threshold(v).map_err(|e| anyhow::anyhow!("IMGDIFF_THRESHOLD: {e}"))
            })
            .transpose()?;
        let parallel = lookup("IMGDIFF_PARALLEL")
            .map(|v| match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(anyhow::anyhow!(
                    "IMGDIFF_PARALLEL must be a positive integer, got '{v}'"
                )),
            })
            .transpose()?;
        Ok(Self {
            threshold,
            parallel,
        })
    }
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug)]
pub struct ResolvedRunConfig {
    pub diff: DiffConfig,
    pub batch: BatchConfig,
}

impl ResolvedRunConfig {
    pub fn new(cli: CliOverrides) -> Result<Self> {
        // 1. File layer
        let file_config = load()?;

        // 2. Env layer
        let env = EnvOverrides::from_env()?;

        Ok(Self::merge(cli, env, file_config))
    }

    fn merge(cli: CliOverrides, env: EnvOverrides, file_config: Config) -> Self {
        // CLI > env > file (highest priority first)
        let threshold = cli
            .threshold
            .or(env.threshold)
            .or(file_config.threshold())
            .unwrap_or(imgdiff::engine::DEFAULT_THRESHOLD);

        // Batch: file base, env overlay, then CLI overlay
        let mut batch = file_config.batch;
        batch.merge(&BatchConfig {
            parallel: env.parallel,
            ..BatchConfig::default()
        });
        batch.merge(&cli.batch);

        Self {
            diff: DiffConfig::with_threshold(threshold),
            batch,
        }
    }
}
