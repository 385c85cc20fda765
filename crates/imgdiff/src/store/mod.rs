use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbImage;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Where the heat map for pair `id` goes inside `out_dir`. Always PNG.
///
/// The suffix is appended to the full id, so `shot.png` and `shot.jpg` get
/// separate files.
pub fn heatmap_path(out_dir: &Path, id: &str) -> PathBuf {
    out_dir.join(format!("{id}.diff.png"))
}

/// Save `image` to `path`, creating parent directories. The format follows
/// the extension.
pub fn save_image(path: &Path, image: &RgbImage) -> Result<()> {
    ensure_parent(path)?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn write_heatmap(out_dir: &Path, id: &str, image: &RgbImage) -> Result<PathBuf> {
    let path = heatmap_path(out_dir, id);
    save_image(&path, image)?;
    Ok(path)
}
