pub mod align;
pub mod colormap;
pub mod field;
pub mod stats;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::source::ImageSource;
use crate::{DiffError, Side};

pub use self::field::DifferenceField;
pub use self::stats::DiffStatistics;

pub const DEFAULT_THRESHOLD: u8 = 10;

/// Per-call comparison settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Mean-channel intensities below this value count as "no difference".
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DiffConfig {
    pub fn with_threshold(threshold: u8) -> Self {
        Self { threshold }
    }
}

pub fn validate_threshold(v: i64) -> Result<u8, String> {
    u8::try_from(v).map_err(|_| format!("threshold must be between 0 and 255, got {v}"))
}

/// Heat map and statistics from a single decode/align pass.
pub struct DiffOutput {
    pub image: RgbImage,
    pub statistics: DiffStatistics,
    /// Decoded sizes before alignment.
    pub first_dimensions: (u32, u32),
    pub second_dimensions: (u32, u32),
}

impl DiffOutput {
    /// True when the inputs were resampled to a common size.
    pub fn was_resized(&self) -> bool {
        self.first_dimensions != self.second_dimensions
    }
}

/// Holds the configuration used for every call.
///
/// Changing the threshold needs `&mut self`, so it can never move under a
/// call that is still running. Share an engine across threads behind `Arc`
/// (read-only) or give each thread its own.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    config: DiffConfig,
}

impl DiffEngine {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> DiffConfig {
        self.config
    }

    pub fn set_threshold(&mut self, threshold: u8) {
        self.config.threshold = threshold;
    }

    pub fn compute_difference_image<'a>(
        &self,
        first: impl Into<ImageSource<'a>>,
        second: impl Into<ImageSource<'a>>,
    ) -> Result<RgbImage, DiffError> {
        compute_difference_image(first, second, &self.config)
    }

    pub fn compute_difference_statistics<'a>(
        &self,
        first: impl Into<ImageSource<'a>>,
        second: impl Into<ImageSource<'a>>,
    ) -> Result<DiffStatistics, DiffError> {
        compute_difference_statistics(first, second, &self.config)
    }

    pub fn compute<'a>(
        &self,
        first: impl Into<ImageSource<'a>>,
        second: impl Into<ImageSource<'a>>,
    ) -> Result<DiffOutput, DiffError> {
        compute(first, second, &self.config)
    }
}

struct Aligned {
    field: DifferenceField,
    first_dimensions: (u32, u32),
    second_dimensions: (u32, u32),
}

/// Decode both inputs, then bring them to a common size.
/// Nothing is produced unless both sides load.
fn aligned_field<'a>(
    first: impl Into<ImageSource<'a>>,
    second: impl Into<ImageSource<'a>>,
) -> Result<Aligned, DiffError> {
    let first = first.into().load_rgb(Side::First)?;
    let second = second.into().load_rgb(Side::Second)?;
    let first_dimensions = first.dimensions();
    let second_dimensions = second.dimensions();
    let (first, second) = align::reconcile(first, second);
    Ok(Aligned {
        field: DifferenceField::between(&first, &second),
        first_dimensions,
        second_dimensions,
    })
}

fn render(mut field: DifferenceField, config: &DiffConfig) -> RgbImage {
    field.suppress_below(config.threshold);
    let normalized = field.normalize();
    colormap::apply(&normalized)
}

/// Render the "hot" heat map of the pair: black where nothing changed, red
/// through yellow to white as the change grows.
///
/// Brightness is relative to the largest change in this pair, so heat maps
/// of different pairs are not comparable with each other.
pub fn compute_difference_image<'a>(
    first: impl Into<ImageSource<'a>>,
    second: impl Into<ImageSource<'a>>,
    config: &DiffConfig,
) -> Result<RgbImage, DiffError> {
    let aligned = aligned_field(first, second)?;
    Ok(render(aligned.field, config))
}

/// Count the pixels whose raw change exceeds the threshold.
pub fn compute_difference_statistics<'a>(
    first: impl Into<ImageSource<'a>>,
    second: impl Into<ImageSource<'a>>,
    config: &DiffConfig,
) -> Result<DiffStatistics, DiffError> {
    let aligned = aligned_field(first, second)?;
    Ok(DiffStatistics::from_field(&aligned.field, config.threshold))
}

pub fn compute<'a>(
    first: impl Into<ImageSource<'a>>,
    second: impl Into<ImageSource<'a>>,
    config: &DiffConfig,
) -> Result<DiffOutput, DiffError> {
    let Aligned {
        field,
        first_dimensions,
        second_dimensions,
    } = aligned_field(first, second)?;
    // Statistics read the raw field; rendering consumes it.
    let statistics = DiffStatistics::from_field(&field, config.threshold);
    debug!(
        width = field.width(),
        height = field.height(),
        diff_pixels = statistics.diff_pixels,
        "computed difference"
    );
    let image = render(field, config);
    Ok(DiffOutput {
        image,
        statistics,
        first_dimensions,
        second_dimensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb};

    fn solid(w: u32, h: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(color)))
    }

    /// Deterministic diagonal pattern; `seed` shifts it.
    fn patterned(w: u32, h: u32, seed: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            let v = ((x * 13 + y * 7 + seed * 31) % 256) as u8;
            Rgb([v, v.wrapping_mul(3), 255 - v])
        }))
    }

    fn all_black(image: &RgbImage) -> bool {
        image.pixels().all(|p| p.0 == [0, 0, 0])
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    // -- identity --

    #[test]
    fn identical_images_render_black() {
        let x = patterned(32, 24, 1);
        let image = compute_difference_image(&x, &x, &DiffConfig::default()).unwrap();
        assert_eq!(image.dimensions(), (32, 24));
        assert!(all_black(&image));
    }

    #[test]
    fn identical_images_are_fully_similar() {
        let x = patterned(32, 24, 1);
        let s = compute_difference_statistics(&x, &x, &DiffConfig::default()).unwrap();
        assert_eq!(s.total_pixels, 32 * 24);
        assert_eq!(s.diff_pixels, 0);
        assert_eq!(s.diff_percentage, 0.0);
        assert_eq!(s.similarity_percentage, 100.0);
    }

    #[test]
    fn identity_holds_with_zero_threshold() {
        let x = patterned(8, 8, 4);
        let config = DiffConfig::with_threshold(0);
        assert!(all_black(&compute_difference_image(&x, &x, &config).unwrap()));
        let s = compute_difference_statistics(&x, &x, &config).unwrap();
        assert_eq!(s.diff_pixels, 0);
    }

    // -- symmetry --

    #[test]
    fn heat_map_is_symmetric() {
        let a = patterned(20, 16, 1);
        let b = patterned(20, 16, 2);
        let config = DiffConfig::default();
        let ab = compute_difference_image(&a, &b, &config).unwrap();
        let ba = compute_difference_image(&b, &a, &config).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn symmetric_across_sizes() {
        let a = patterned(10, 10, 1);
        let b = patterned(14, 12, 5);
        let config = DiffConfig::default();
        let ab = compute_difference_image(&a, &b, &config).unwrap();
        let ba = compute_difference_image(&b, &a, &config).unwrap();
        assert_eq!(ab, ba);
    }

    // -- threshold --

    #[test]
    fn raising_threshold_never_raises_diff_percentage() {
        let a = patterned(40, 30, 1);
        let b = patterned(40, 30, 3);
        let mut previous = f64::INFINITY;
        for threshold in [0u8, 1, 5, 10, 30, 60, 100, 128, 200, 255] {
            let s = compute_difference_statistics(&a, &b, &DiffConfig::with_threshold(threshold))
                .unwrap();
            assert!(
                s.diff_percentage <= previous,
                "threshold {threshold}: {} > {previous}",
                s.diff_percentage
            );
            previous = s.diff_percentage;
        }
    }

    #[test]
    fn noise_below_threshold_is_invisible() {
        let a = solid(16, 16, [100, 100, 100]);
        let noisy = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 16, |x, y| {
            let n = ((x + y) % 9) as u8; // mean change at most 8
            Rgb([100 + n, 100 - n, 100 + n])
        }));
        let config = DiffConfig::default();
        assert!(all_black(&compute_difference_image(&a, &noisy, &config).unwrap()));
        let s = compute_difference_statistics(&a, &noisy, &config).unwrap();
        assert_eq!(s.diff_percentage, 0.0);
    }

    #[test]
    fn single_changed_pixel_is_white_hot() {
        let a = solid(4, 4, [0, 0, 0]);
        let mut b = a.to_rgb8();
        b.put_pixel(2, 1, Rgb([90, 90, 90]));
        let b = DynamicImage::ImageRgb8(b);
        let image = compute_difference_image(&a, &b, &DiffConfig::default()).unwrap();
        // Normalization maps the largest change to full white.
        assert_eq!(image.get_pixel(2, 1).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
        let s = compute_difference_statistics(&a, &b, &DiffConfig::default()).unwrap();
        assert_eq!(s.diff_pixels, 1);
        assert_eq!(s.total_pixels, 16);
    }

    #[test]
    fn normalization_is_relative_to_the_pair() {
        let base = solid(2, 1, [0, 0, 0]);
        let small = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([20, 20, 20]) } else { Rgb([0, 0, 0]) }
        }));
        let large = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([200, 200, 200]) } else { Rgb([0, 0, 0]) }
        }));
        let config = DiffConfig::default();
        let a = compute_difference_image(&base, &small, &config).unwrap();
        let b = compute_difference_image(&base, &large, &config).unwrap();
        assert_eq!(a.get_pixel(0, 0), b.get_pixel(0, 0));
    }

    // -- size reconciliation --

    #[test]
    fn mismatched_sizes_use_the_larger_extent() {
        let a = solid(10, 10, [0, 0, 0]);
        let b = solid(20, 10, [255, 255, 255]);
        let config = DiffConfig::default();
        let image = compute_difference_image(&a, &b, &config).unwrap();
        assert_eq!(image.dimensions(), (20, 10));
        let s = compute_difference_statistics(&a, &b, &config).unwrap();
        assert_eq!(s.total_pixels, 200);
        assert_eq!(s.diff_pixels, 200);
    }

    #[test]
    fn output_reports_sizes_before_alignment() {
        let a = solid(10, 10, [0, 0, 0]);
        let b = solid(20, 10, [0, 0, 0]);
        let out = compute(&a, &b, &DiffConfig::default()).unwrap();
        assert_eq!(out.first_dimensions, (10, 10));
        assert_eq!(out.second_dimensions, (20, 10));
        assert!(out.was_resized());
        assert!(!compute(&a, &a, &DiffConfig::default()).unwrap().was_resized());
    }

    #[test]
    fn both_sides_grow_when_neither_is_larger() {
        let a = solid(10, 30, [10, 10, 10]);
        let b = solid(30, 10, [10, 10, 10]);
        let s = compute_difference_statistics(&a, &b, &DiffConfig::default()).unwrap();
        assert_eq!(s.total_pixels, 900);
        assert_eq!(s.diff_pixels, 0);
    }

    // -- sources --

    #[test]
    fn paths_and_buffers_agree() {
        let dir = tempfile::tempdir().unwrap();
        let a = patterned(12, 9, 1);
        let b = patterned(12, 9, 2);
        let a_path = dir.path().join("a.png");
        let b_path = dir.path().join("b.png");
        a.save(&a_path).unwrap();
        b.save(&b_path).unwrap();

        let config = DiffConfig::default();
        let from_paths = compute_difference_image(&a_path, &b_path, &config).unwrap();
        let from_buffers = compute_difference_image(&a, &b, &config).unwrap();
        assert_eq!(from_paths, from_buffers);

        let a_png = png_bytes(&a);
        let from_bytes =
            compute_difference_image(a_png.as_slice(), ImageSource::Decoded(&b), &config).unwrap();
        assert_eq!(from_bytes, from_buffers);
    }

    #[test]
    fn non_image_path_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("readme.txt");
        std::fs::write(&text, "not pixels").unwrap();
        let good = patterned(4, 4, 1);

        let err = compute_difference_image(&good, &text, &DiffConfig::default()).unwrap_err();
        assert_eq!(err.side(), Side::Second);
        assert!(matches!(err, DiffError::Decode { .. }));

        let err = compute_difference_statistics(&text, &good, &DiffConfig::default()).unwrap_err();
        assert_eq!(err.side(), Side::First);
    }

    #[test]
    fn empty_input_is_rejected() {
        let empty = DynamicImage::new_rgb8(0, 0);
        let good = patterned(4, 4, 1);
        let err = compute(&good, &empty, &DiffConfig::default()).err().unwrap();
        assert!(matches!(err, DiffError::EmptyImage { side: Side::Second, .. }));
    }

    // -- engine --

    #[test]
    fn combined_matches_separate_calls() {
        let a = patterned(16, 16, 1);
        let b = patterned(16, 16, 7);
        let engine = DiffEngine::new(DiffConfig::with_threshold(20));
        let both = engine.compute(&a, &b).unwrap();
        assert_eq!(both.image, engine.compute_difference_image(&a, &b).unwrap());
        assert_eq!(
            both.statistics,
            engine.compute_difference_statistics(&a, &b).unwrap()
        );
    }

    #[test]
    fn engine_threshold_persists_across_calls() {
        let a = solid(4, 4, [0, 0, 0]);
        let b = solid(4, 4, [50, 50, 50]);
        let mut engine = DiffEngine::default();
        assert_eq!(engine.config().threshold, DEFAULT_THRESHOLD);
        assert_eq!(engine.compute_difference_statistics(&a, &b).unwrap().diff_pixels, 16);

        engine.set_threshold(60);
        assert_eq!(engine.compute_difference_statistics(&a, &b).unwrap().diff_pixels, 0);
        assert_eq!(engine.compute_difference_statistics(&a, &b).unwrap().diff_pixels, 0);
    }

    #[test]
    fn threshold_validation() {
        assert_eq!(validate_threshold(0), Ok(0));
        assert_eq!(validate_threshold(255), Ok(255));
        assert!(validate_threshold(256).is_err());
        assert!(validate_threshold(-1).is_err());
    }
}
