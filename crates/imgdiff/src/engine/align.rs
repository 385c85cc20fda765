use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Bring both images to `max(width) x max(height)`.
///
/// Matching pairs pass through untouched. Otherwise each image that is not
/// already at the target size is resampled with Lanczos3. Images only ever
/// grow, so no source pixel is cropped away.
pub fn reconcile(first: RgbImage, second: RgbImage) -> (RgbImage, RgbImage) {
    if first.dimensions() == second.dimensions() {
        return (first, second);
    }

    let target_w = first.width().max(second.width());
    let target_h = first.height().max(second.height());
    debug!(
        first = ?first.dimensions(),
        second = ?second.dimensions(),
        target = ?(target_w, target_h),
        "resampling to common size"
    );
    (
        resize_to(first, target_w, target_h),
        resize_to(second, target_w, target_h),
    )
}

fn resize_to(image: RgbImage, w: u32, h: u32) -> RgbImage {
    if image.dimensions() == (w, h) {
        image
    } else {
        imageops::resize(&image, w, h, FilterType::Lanczos3)
    }
}
