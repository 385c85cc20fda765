use image::{GrayImage, Luma, RgbImage};

/// Unnormalized change magnitude per pixel: the mean of the three absolute
/// channel differences, kept as `f32` so nothing underflows.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceField {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl DifferenceField {
    /// Both images must already share dimensions (see [`super::align::reconcile`]).
    pub fn between(first: &RgbImage, second: &RgbImage) -> Self {
        debug_assert_eq!(first.dimensions(), second.dimensions());
        let (width, height) = first.dimensions();
        let values = first
            .pixels()
            .zip(second.pixels())
            .map(|(a, b)| {
                let sum: f32 = a
                    .0
                    .iter()
                    .zip(b.0.iter())
                    .map(|(&ca, &cb)| (ca as f32 - cb as f32).abs())
                    .sum();
                sum / 3.0
            })
            .collect();
        Self {
            width,
            height,
            values,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_values(width: u32, height: u32, values: Vec<f32>) -> Self {
        assert_eq!(values.len(), (width as usize) * (height as usize));
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y as usize) * (self.width as usize) + x as usize]
    }

    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    /// Hard cutoff: values strictly below `threshold` become zero.
    pub fn suppress_below(&mut self, threshold: u8) {
        let threshold = threshold as f32;
        for v in &mut self.values {
            if *v < threshold {
                *v = 0.0;
            }
        }
    }

    /// Number of pixels whose value is strictly above `threshold`.
    pub fn count_above(&self, threshold: u8) -> u64 {
        let threshold = threshold as f32;
        self.values.iter().filter(|&&v| v > threshold).count() as u64
    }

    /// Rescale so the largest value becomes 255, truncating to `u8`.
    /// An all-zero field stays all zero.
    pub fn normalize(&self) -> GrayImage {
        let max = self.max();
        let mut out = GrayImage::new(self.width, self.height);
        if max > 0.0 {
            for (px, &v) in out.pixels_mut().zip(&self.values) {
                *px = Luma([(v / max * 255.0) as u8]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn pair(a: [u8; 3], b: [u8; 3]) -> DifferenceField {
        DifferenceField::between(
            &RgbImage::from_pixel(1, 1, Rgb(a)),
            &RgbImage::from_pixel(1, 1, Rgb(b)),
        )
    }

    #[test]
    fn channel_differences_are_averaged() {
        assert_eq!(pair([10, 20, 30], [40, 20, 0]).get(0, 0), 20.0);
    }

    #[test]
    fn subtraction_does_not_underflow() {
        assert_eq!(pair([0, 0, 0], [255, 255, 255]).get(0, 0), 255.0);
        assert_eq!(pair([255, 255, 255], [0, 0, 0]).get(0, 0), 255.0);
    }

    #[test]
    fn threshold_is_strict() {
        let mut f = DifferenceField::from_values(3, 1, vec![9.9, 10.0, 10.1]);
        f.suppress_below(10);
        assert_eq!(f.get(0, 0), 0.0);
        assert_eq!(f.get(1, 0), 10.0);
        assert_eq!(f.get(2, 0), 10.1);
    }

    #[test]
    fn count_above_excludes_equal() {
        let f = DifferenceField::from_values(3, 1, vec![9.0, 10.0, 11.0]);
        assert_eq!(f.count_above(10), 1);
        assert_eq!(f.count_above(0), 3);
    }

    #[test]
    fn normalize_scales_to_max() {
        let f = DifferenceField::from_values(3, 1, vec![0.0, 50.0, 100.0]);
        let g = f.normalize();
        assert_eq!(g.get_pixel(0, 0).0, [0]);
        // 0.5 * 255 = 127.5, truncated.
        assert_eq!(g.get_pixel(1, 0).0, [127]);
        assert_eq!(g.get_pixel(2, 0).0, [255]);
    }

    #[test]
    fn zero_field_stays_black() {
        let f = DifferenceField::from_values(2, 2, vec![0.0; 4]);
        assert!(f.normalize().pixels().all(|p| p.0 == [0]));
    }
}
