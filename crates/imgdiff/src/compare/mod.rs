pub mod diff;
pub mod pairs;

use imgdiff::Side;

/// Status of a single pair in a batch comparison.
pub enum PairStatus {
    Same,
    Differ {
        diff_pixels: u64,
        diff_percentage: f64,
        dimension_mismatch: Option<(u32, u32, u32, u32)>,
    },
    /// The file exists in only one directory; the side names where it is absent.
    Missing(Side),
    Error(String),
}
