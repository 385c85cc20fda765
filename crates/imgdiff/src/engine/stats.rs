use serde::Serialize;

use super::field::DifferenceField;

/// How much of an aligned pair changed.
///
/// Counts come from the raw field, before normalization, so the heat map's
/// per-pair rescaling never affects these numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiffStatistics {
    pub total_pixels: u64,
    /// Pixels whose mean-channel change is strictly above the threshold.
    pub diff_pixels: u64,
    pub diff_percentage: f64,
    pub similarity_percentage: f64,
}

impl DiffStatistics {
    pub fn from_field(field: &DifferenceField, threshold: u8) -> Self {
        let total_pixels = (field.width() as u64) * (field.height() as u64);
        let diff_pixels = field.count_above(threshold);
        Self::from_counts(total_pixels, diff_pixels)
    }

    pub fn from_counts(total_pixels: u64, diff_pixels: u64) -> Self {
        let (diff_percentage, similarity_percentage) = if total_pixels > 0 {
            let total = total_pixels as f64;
            (
                diff_pixels as f64 / total * 100.0,
                (total_pixels - diff_pixels) as f64 / total * 100.0,
            )
        } else {
            (0.0, 100.0)
        };
        Self {
            total_pixels,
            diff_pixels,
            diff_percentage,
            similarity_percentage,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.diff_pixels == 0
    }
}
