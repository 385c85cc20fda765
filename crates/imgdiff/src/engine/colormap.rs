//! "Hot" colormap: black -> red -> yellow -> white.
//!
//! Breakpoints use half-open intervals so every `t` lands in exactly one
//! segment per channel:
//!
//! | channel | 0                | ramp             | 255        |
//! |---------|------------------|------------------|------------|
//! | red     | `t <= 0`         | `0 < t < 0.33`   | `t >= 0.33`|
//! | green   | `t <= 0.33`      | `0.33 < t < 0.66`| `t >= 0.66`|
//! | blue    | `t < 0.8`        | `0.8 <= t <= 1`  |            |

use image::{GrayImage, Rgb, RgbImage};

const RED_END: f32 = 0.33;
const GREEN_END: f32 = 0.66;
const BLUE_START: f32 = 0.8;

/// Map `t` linearly from `[lo, hi]` onto `0..=255`, truncating.
fn ramp(t: f32, lo: f32, hi: f32) -> u8 {
    ((t - lo) / (hi - lo) * 255.0).clamp(0.0, 255.0) as u8
}

/// Color for a normalized intensity `t` in `[0, 1]`.
pub fn hot(t: f32) -> Rgb<u8> {
    let red = if t >= RED_END {
        255
    } else if t > 0.0 {
        ramp(t, 0.0, RED_END)
    } else {
        0
    };

    let green = if t >= GREEN_END {
        255
    } else if t > RED_END {
        ramp(t, RED_END, GREEN_END)
    } else {
        0
    };

    // Pinned so 1.0 is white whatever the ramp rounds to.
    let blue = if t >= 1.0 {
        255
    } else if t >= BLUE_START {
        ramp(t, BLUE_START, 1.0)
    } else {
        0
    };

    Rgb([red, green, blue])
}

/// Colorize a normalized (0-255) intensity image.
pub fn apply(intensity: &GrayImage) -> RgbImage {
    let lut: Vec<Rgb<u8>> = (0..=255u8).map(|v| hot(v as f32 / 255.0)).collect();
    let mut out = RgbImage::new(intensity.width(), intensity.height());
    for (dst, src) in out.pixels_mut().zip(intensity.pixels()) {
        *dst = lut[src.0[0] as usize];
    }
    out
}
