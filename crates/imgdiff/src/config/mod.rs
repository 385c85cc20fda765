pub mod batch;
pub mod resolve;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use imgdiff::validate_threshold;
use serde::{Deserialize, Serialize};

pub use self::batch::BatchConfig;
pub use self::resolve::{CliOverrides, ResolvedRunConfig};
pub use self::template::write_template_in;

const CONFIG_DIR: &str = ".imgdiff";
const CONFIG_FILE: &str = "config.toml";

/// `[diff]` section. Kept as a wide integer so out-of-range values get a
/// readable error instead of a serde overflow message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub diff: DiffSection,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Validate semantic constraints that serde cannot express.
    fn validate(&self) -> Result<()> {
        if let Some(t) = self.diff.threshold {
            validate_threshold(t).map_err(|e| anyhow::anyhow!("diff.{e}"))?;
        }

        if self.batch.parallel == Some(0) {
            bail!("batch.parallel must be at least 1");
        }

        if let Some(v) = self.batch.max_diff {
            batch::validate_max_diff(v).map_err(|e| anyhow::anyhow!("batch.{e}"))?;
        }

        if let Some(pattern) = &self.batch.pattern {
            glob::Pattern::new(pattern)
                .with_context(|| format!("batch.pattern '{pattern}' is not a valid glob"))?;
        }

        Ok(())
    }

    pub fn threshold(&self) -> Option<u8> {
        // validate() already rejected out-of-range values
        self.diff.threshold.and_then(|t| u8::try_from(t).ok())
    }
}

pub fn config_path() -> PathBuf {
    config_path_in(Path::new(""))
}

/// Config file location for a project rooted at `root`.
pub fn config_path_in(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load `.imgdiff/config.toml`; a missing file yields defaults.
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
