use std::path::Path;

use image::RgbImage;
use imgdiff::{DiffConfig, DiffError, DiffStatistics};

pub struct CompareResult {
    pub statistics: DiffStatistics,
    pub diff_image: RgbImage,
    /// `Some((first_w, first_h, second_w, second_h))` when images have different dimensions.
    pub dimension_mismatch: Option<(u32, u32, u32, u32)>,
}

/// Heat map plus statistics for one pair of files.
///
/// Runs synchronously — call via `spawn_blocking`.
pub fn compare(
    first: &Path,
    second: &Path,
    config: &DiffConfig,
) -> Result<CompareResult, DiffError> {
    let output = imgdiff::compute(first, second, config)?;

    let dimension_mismatch = output.was_resized().then(|| {
        let (fw, fh) = output.first_dimensions;
        let (sw, sh) = output.second_dimensions;
        (fw, fh, sw, sh)
    });

    Ok(CompareResult {
        statistics: output.statistics,
        diff_image: output.image,
        dimension_mismatch,
    })
}
