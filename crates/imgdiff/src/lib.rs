//! Pixel-difference engine: aligns two images, measures per-pixel intensity
//! change, and renders it as a "hot" heat map plus summary statistics.

use std::fmt;

use thiserror::Error;

pub mod engine;
pub mod source;

pub use engine::{
    DiffConfig, DiffEngine, DiffOutput, DiffStatistics, compute, compute_difference_image,
    compute_difference_statistics, validate_threshold,
};
pub use source::ImageSource;

/// Which of the two inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Second => f.write_str("second"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to read {side} image {origin}: {source}")]
    Read {
        side: Side,
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {side} image {origin}: {source}")]
    Decode {
        side: Side,
        origin: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{side} image is empty ({width}x{height})")]
    EmptyImage { side: Side, width: u32, height: u32 },
}

impl DiffError {
    pub fn side(&self) -> Side {
        match self {
            Self::Read { side, .. } | Self::Decode { side, .. } | Self::EmptyImage { side, .. } => {
                *side
            }
        }
    }
}
