use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config_path_in;

/// Hand-crafted config template with commented-out keys, so users can see
/// the available knobs without looking them up.
const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Difference engine — all fields optional.
# ─────────────────────────────────────────────────────────
[diff]
# threshold = 10                    # 0-255; mean channel change below this is ignored

# ─────────────────────────────────────────────────────────
# Directory comparison (`imgdiff batch`) — all fields optional.
# ─────────────────────────────────────────────────────────
[batch]
# pattern = "**/*.png"              # glob relative to each directory
# parallel = 4                      # pairs compared concurrently
# max_diff = 0.0                    # max diff percentage still reported as SAME
"#;

/// Write the hand-crafted config template (with commented-out keys) under
/// project root `root`, returning the file written.
pub fn write_template_in(root: &Path) -> Result<PathBuf> {
    let path = config_path_in(root);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_template_in(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(".imgdiff/config.toml"));
        let c = super::super::load_from(&path).unwrap();
        assert_eq!(c.threshold(), None);
        assert_eq!(c.batch, crate::config::BatchConfig::default());
    }
}
