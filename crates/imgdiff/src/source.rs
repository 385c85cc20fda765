use std::io::{BufRead, Cursor, Seek};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader, RgbImage};

use crate::{DiffError, Side};

/// Where an input image comes from.
///
/// Hosts that already decoded an image for display hand it over as
/// `Decoded`; standalone callers pass a path.
#[derive(Clone, Copy)]
pub enum ImageSource<'a> {
    Path(&'a Path),
    /// Encoded file contents (PNG, JPEG, ...) already read into memory.
    Encoded(&'a [u8]),
    Decoded(&'a DynamicImage),
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Self::Path(path.as_path())
    }
}

impl<'a> From<&'a [u8]> for ImageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Encoded(bytes)
    }
}

impl<'a> From<&'a DynamicImage> for ImageSource<'a> {
    fn from(image: &'a DynamicImage) -> Self {
        Self::Decoded(image)
    }
}

impl ImageSource<'_> {
    /// Human-readable origin used in error messages.
    pub fn origin(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Encoded(bytes) => format!("<{} bytes in memory>", bytes.len()),
            Self::Decoded(image) => format!("<decoded {}x{}>", image.width(), image.height()),
        }
    }

    /// Decode (if needed) and normalize to 8-bit RGB: alpha is dropped,
    /// grayscale is expanded, deeper formats are scaled down.
    ///
    /// Decoding runs without the `image` crate's default allocation limit,
    /// so very large inputs are accepted.
    pub(crate) fn load_rgb(&self, side: Side) -> Result<RgbImage, DiffError> {
        let read_err = |source: std::io::Error| DiffError::Read {
            side,
            origin: self.origin(),
            source,
        };
        let rgb = match self {
            Self::Path(path) => self.decode(ImageReader::open(path).map_err(read_err)?, side)?,
            Self::Encoded(bytes) => self.decode(ImageReader::new(Cursor::new(*bytes)), side)?,
            Self::Decoded(image) => image.to_rgb8(),
        };

        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(DiffError::EmptyImage {
                side,
                width,
                height,
            });
        }
        Ok(rgb)
    }

    fn decode<R: BufRead + Seek>(
        &self,
        reader: ImageReader<R>,
        side: Side,
    ) -> Result<RgbImage, DiffError> {
        let mut reader = reader
            .with_guessed_format()
            .map_err(|source| DiffError::Read {
                side,
                origin: self.origin(),
                source,
            })?;
        reader.no_limits();
        let image = reader.decode().map_err(|source| DiffError::Decode {
            side,
            origin: self.origin(),
            source,
        })?;
        Ok(image.into_rgb8())
    }
}
