//! Mapping between original-image pixels and the scaled preview canvas.
//!
//! The preview is the original image shrunk (never enlarged) to fit within a
//! fraction of the viewport, then centered. A [`PreviewTransform`] captures
//! that placement; the functions here convert points and rectangles across it.
//!
//! # Coordinate System
//!
//! - Original coordinates are integer pixels of the decoded image
//! - Canvas coordinates are viewport pixels, origin at the viewport's top-left
//! - Preview coordinates are canvas coordinates of points on the preview bitmap

use crate::config::PREVIEW_FILL;
use crate::CropRect;

/// Scale and centering offset of the preview bitmap within the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    /// preview_width / original_width, applied uniformly to both axes.
    pub scale: f64,
    /// Canvas x of the preview's top-left corner.
    pub offset_x: f64,
    /// Canvas y of the preview's top-left corner.
    pub offset_y: f64,
    /// Width of the preview bitmap in canvas pixels.
    pub preview_width: u32,
    /// Height of the preview bitmap in canvas pixels.
    pub preview_height: u32,
}

impl PreviewTransform {
    /// Check whether a canvas point falls on the preview bitmap, edges included.
    pub fn contains(&self, canvas_x: f64, canvas_y: f64) -> bool {
        let rel_x = canvas_x - self.offset_x;
        let rel_y = canvas_y - self.offset_y;
        (0.0..=f64::from(self.preview_width)).contains(&rel_x)
            && (0.0..=f64::from(self.preview_height)).contains(&rel_y)
    }
}

/// A rectangle in canvas coordinates, ready for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Compute the preview placement for an image inside a viewport, using the
/// default fill ratio.
pub fn compute_transform(
    original_width: u32,
    original_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> PreviewTransform {
    compute_transform_with_fill(
        original_width,
        original_height,
        viewport_width,
        viewport_height,
        PREVIEW_FILL,
    )
}

/// Compute the preview placement for an image inside a viewport.
///
/// The image is fitted into `fill * viewport` on both axes, preserving aspect
/// ratio and never upscaling. The scale is the ratio actually achieved by the
/// fit (`preview_width / original_width`), and the preview is centered.
/// A zero-width image gets scale 1.0.
pub fn compute_transform_with_fill(
    original_width: u32,
    original_height: u32,
    viewport_width: u32,
    viewport_height: u32,
    fill: f64,
) -> PreviewTransform {
    let max_width = ((f64::from(viewport_width) * fill).floor() as u32).max(1);
    let max_height = ((f64::from(viewport_height) * fill).floor() as u32).max(1);

    let (preview_width, preview_height) =
        fit_within(original_width, original_height, max_width, max_height);

    let scale = if original_width == 0 {
        1.0
    } else {
        f64::from(preview_width) / f64::from(original_width)
    };

    let offset_x = (i64::from(viewport_width) - i64::from(preview_width)).div_euclid(2);
    let offset_y = (i64::from(viewport_height) - i64::from(preview_height)).div_euclid(2);

    PreviewTransform {
        scale,
        offset_x: offset_x as f64,
        offset_y: offset_y as f64,
        preview_width,
        preview_height,
    }
}

/// Map a canvas point to original-image coordinates.
///
/// Returns `None` when the point is off the preview bitmap.
pub fn to_original(canvas_x: f64, canvas_y: f64, transform: &PreviewTransform) -> Option<(i32, i32)> {
    if transform.scale <= 0.0 || !transform.contains(canvas_x, canvas_y) {
        return None;
    }

    let rel_x = canvas_x - transform.offset_x;
    let rel_y = canvas_y - transform.offset_y;
    Some((
        (rel_x / transform.scale).floor() as i32,
        (rel_y / transform.scale).floor() as i32,
    ))
}

/// Map an original-image point to canvas coordinates.
pub fn point_to_preview(x: i32, y: i32, transform: &PreviewTransform) -> (f64, f64) {
    (
        transform.offset_x + f64::from(x) * transform.scale,
        transform.offset_y + f64::from(y) * transform.scale,
    )
}

/// Map a crop rectangle to canvas coordinates for rendering.
pub fn to_preview(rect: &CropRect, transform: &PreviewTransform) -> PreviewRect {
    let (x1, y1) = point_to_preview(rect.x1, rect.y1, transform);
    let (x2, y2) = point_to_preview(rect.x2, rect.y2, transform);
    PreviewRect { x1, y1, x2, y2 }
}

/// Dimensions of an image shrunk to fit a bounding box, aspect preserved.
///
/// Images that already fit are returned unchanged. The constrained axis is
/// set to the box size; the other is rounded (floor or ceil) to whichever
/// value keeps the aspect ratio closest, and is never less than 1.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let aspect = f64::from(width) / f64::from(height);
    let (box_w, box_h) = (f64::from(max_width), f64::from(max_height));

    if box_w / box_h >= aspect {
        // Height-constrained
        let new_width = round_aspect(box_h * aspect, |n| (aspect - n / box_h).abs());
        (new_width, max_height)
    } else {
        // Width-constrained
        let new_height = round_aspect(box_w / aspect, |n| {
            if n == 0.0 {
                0.0
            } else {
                (aspect - box_w / n).abs()
            }
        });
        (max_width, new_height)
    }
}

/// Pick floor or ceil of `value`, whichever minimizes `error`, at least 1.
fn round_aspect(value: f64, error: impl Fn(f64) -> f64) -> u32 {
    let (low, high) = (value.floor(), value.ceil());
    let chosen = if error(high) < error(low) { high } else { low };
    (chosen as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_scale() -> PreviewTransform {
        // 1000x800 image shown at half size, offset (50, 50)
        PreviewTransform {
            scale: 0.5,
            offset_x: 50.0,
            offset_y: 50.0,
            preview_width: 500,
            preview_height: 400,
        }
    }

    #[test]
    fn test_transform_landscape() {
        let t = compute_transform(1000, 800, 600, 500);

        // Box is 540x450; 1000x800 is width-constrained
        assert_eq!(t.preview_width, 540);
        assert_eq!(t.preview_height, 432);
        assert!((t.scale - 0.54).abs() < 1e-9);
        assert_eq!(t.offset_x, 30.0);
        assert_eq!(t.offset_y, 34.0);
    }

    #[test]
    fn test_transform_portrait() {
        let t = compute_transform(800, 1600, 1000, 1000);

        assert_eq!(t.preview_height, 900);
        assert_eq!(t.preview_width, 450);
        assert!((t.scale - 450.0 / 800.0).abs() < 1e-9);
        assert_eq!(t.offset_x, 275.0);
        assert_eq!(t.offset_y, 50.0);
    }

    #[test]
    fn test_transform_never_upscales() {
        let t = compute_transform(100, 50, 1000, 1000);

        assert_eq!(t.scale, 1.0);
        assert_eq!((t.preview_width, t.preview_height), (100, 50));
        assert_eq!(t.offset_x, 450.0);
        assert_eq!(t.offset_y, 475.0);
    }

    #[test]
    fn test_transform_zero_width_image() {
        let t = compute_transform(0, 100, 600, 500);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_transform_tiny_viewport() {
        let t = compute_transform(1000, 800, 1, 1);
        assert!(t.scale > 0.0);
        assert!(t.preview_width >= 1);
        assert!(t.preview_height >= 1);
    }

    #[test]
    fn test_to_original_inside() {
        assert_eq!(to_original(300.0, 300.0, &half_scale()), Some((500, 500)));
        assert_eq!(to_original(50.0, 50.0, &half_scale()), Some((0, 0)));
        assert_eq!(to_original(550.0, 450.0, &half_scale()), Some((1000, 800)));
    }

    #[test]
    fn test_to_original_outside() {
        assert_eq!(to_original(49.0, 300.0, &half_scale()), None);
        assert_eq!(to_original(300.0, 451.0, &half_scale()), None);
        assert_eq!(to_original(-10.0, -10.0, &half_scale()), None);
    }

    #[test]
    fn test_to_preview_rect() {
        let rect = CropRect::new(500, 500, 650, 650);
        let p = to_preview(&rect, &half_scale());
        assert_eq!(p, PreviewRect { x1: 300.0, y1: 300.0, x2: 375.0, y2: 375.0 });
    }

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(fit_within(6000, 4000, 2560, 2560), (2560, 1707));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(fit_within(4000, 6000, 2560, 2560), (1707, 2560));
    }

    #[test]
    fn test_fit_within_already_fits() {
        assert_eq!(fit_within(100, 50, 256, 256), (100, 50));
    }

    #[test]
    fn test_fit_within_zero_input() {
        assert_eq!(fit_within(0, 0, 256, 256), (0, 0));
    }

    #[test]
    fn test_fit_within_extreme_aspect() {
        let (w, h) = fit_within(10000, 10, 100, 100);
        assert_eq!(w, 100);
        assert_eq!(h, 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
