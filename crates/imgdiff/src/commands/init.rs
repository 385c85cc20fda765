use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::config;

/// `imgdiff init` — create .imgdiff/config.toml.
pub fn init(force: bool) -> Result<()> {
    let path = init_in(Path::new(""), force)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}", path.display());
    Ok(())
}

fn init_in(root: &Path, force: bool) -> Result<PathBuf> {
    let path = config::config_path_in(root);
    if !force && path.exists() {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config::write_template_in(root)
}
