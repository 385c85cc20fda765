use std::path::Path;

use anyhow::Result;
use imgdiff::DiffEngine;
use tracing::info;

use crate::config::ResolvedRunConfig;
use crate::report::terminal;
use crate::store;

/// `imgdiff diff` — write the heat map for one pair.
pub fn diff(
    config: &ResolvedRunConfig,
    first: &Path,
    second: &Path,
    output: &Path,
    show_stats: bool,
) -> Result<()> {
    let engine = DiffEngine::new(config.diff);
    let result = engine.compute(first, second)?;

    store::save_image(output, &result.image)?;
    info!(
        path = %output.display(),
        width = result.image.width(),
        height = result.image.height(),
        "wrote heat map"
    );

    if show_stats {
        terminal::print_statistics(&result.statistics, config.diff.threshold);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatchConfig;
    use image::{Rgb, RgbImage};
    use imgdiff::DiffConfig;

    fn config() -> ResolvedRunConfig {
        ResolvedRunConfig {
            diff: DiffConfig::default(),
            batch: BatchConfig::default(),
        }
    }

    #[test]
    fn writes_heat_map() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])).save(&first).unwrap();
        RgbImage::from_pixel(4, 4, Rgb([90, 90, 90])).save(&second).unwrap();
        let output = dir.path().join("out/diff.png");

        diff(&config(), &first, &second, &output, false).unwrap();
        let heat = image::open(&output).unwrap().to_rgb8();
        assert_eq!(heat.dimensions(), (4, 4));
        assert_eq!(heat.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn undecodable_input_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])).save(&first).unwrap();
        let second = dir.path().join("notes.txt");
        std::fs::write(&second, "not an image").unwrap();
        let output = dir.path().join("diff.png");

        let err = diff(&config(), &first, &second, &output, false).unwrap_err();
        let err = err.downcast::<imgdiff::DiffError>().unwrap();
        assert_eq!(err.side(), imgdiff::Side::Second);
        assert!(!output.exists());
    }
}
