//! Per-image clamping and cropping.
//!
//! The shared rectangle was drawn against one reference image; every other
//! image gets its own clamped copy before pixels are cut.
//!
//! # Clamp Policy
//!
//! ```text
//! x1 = clamp(x1, 0, width - min)
//! y1 = clamp(y1, 0, height - min)
//! x2 = clamp(x2, x1 + min, width)
//! y2 = clamp(y2, y1 + min, height)
//! ```
//!
//! When a bound pair is inverted (image smaller than `min`), the lower bound
//! wins.

use image::DynamicImage;

use crate::CropRect;

/// Clamp `rect` to an image of `width x height` pixels.
///
/// The result is at least `min_size` on each side and, for images at least
/// `min_size` in each dimension, lies entirely within the image. Applying the
/// clamp twice gives the same result as applying it once.
pub fn clamp_to_image(rect: CropRect, width: u32, height: u32, min_size: i32) -> CropRect {
    let (w, h, min) = (i64::from(width), i64::from(height), i64::from(min_size));

    let x1 = clamp_low_wins(i64::from(rect.x1), 0, w - min);
    let y1 = clamp_low_wins(i64::from(rect.y1), 0, h - min);
    let x2 = clamp_low_wins(i64::from(rect.x2), x1 + min, w);
    let y2 = clamp_low_wins(i64::from(rect.y2), y1 + min, h);

    CropRect::new(to_i32(x1), to_i32(y1), to_i32(x2), to_i32(y2))
}

/// `max(low, min(value, high))`; unlike `Ord::clamp` it tolerates `low > high`.
fn clamp_low_wins(value: i64, low: i64, high: i64) -> i64 {
    value.min(high).max(low)
}

fn to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Pixel region `(x, y, width, height)` of `rect` intersected with the image.
pub fn crop_region(rect: CropRect, width: u32, height: u32) -> (u32, u32, u32, u32) {
    let (w, h) = (i64::from(width), i64::from(height));
    let x1 = i64::from(rect.x1).clamp(0, w);
    let y1 = i64::from(rect.y1).clamp(0, h);
    let x2 = i64::from(rect.x2).clamp(x1, w);
    let y2 = i64::from(rect.y2).clamp(y1, h);

    // All values are within [0, width] / [0, height], so they fit in u32
    (x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32)
}

/// Clamp `rect` to `image` and cut out the clamped region.
///
/// Returns the cropped image and the rectangle that was actually used.
pub fn apply_crop(image: &DynamicImage, rect: CropRect, min_size: i32) -> (DynamicImage, CropRect) {
    let clamped = clamp_to_image(rect, image.width(), image.height(), min_size);
    let (x, y, w, h) = crop_region(clamped, image.width(), image.height());
    (image.crop_imm(x, y, w, h), clamped)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
