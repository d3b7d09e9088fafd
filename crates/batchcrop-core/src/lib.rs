//! Batchcrop Core - crop box editing and batch cropping
//!
//! This crate provides the core of the batch cropper: a single crop
//! rectangle is drawn on a scaled preview of one representative image, then
//! applied (re-clamped per image) to a whole list of images.
//!
//! # Module Structure
//!
//! - `geometry` - Mapping between preview canvas and original image pixels
//! - `editor` - Pointer-driven create/move/resize of the crop rectangle
//! - `session` - The active image and its preview bitmap
//! - `batch` - Concurrent crop-and-save over a list of images
//! - `controller` - Image list plus session plus editor, driven by typed events
//! - `decode` / `encode` - File decoding and quality-aware saving
//! - `config` - Tunable constants

pub mod batch;
pub mod config;
pub mod controller;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod session;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use batch::{clamp_to_image, BatchCropEngine, BatchError, BatchProgress, BatchResult};
pub use config::CropConfig;
pub use controller::{ControllerError, CropController, RenderState, ShellEvent};
pub use editor::{CropEditor, Edge, EditorState, PointerEvent};
pub use geometry::{compute_transform, to_original, to_preview, PreviewRect, PreviewTransform};
pub use session::{ImageSession, LoadError};

/// The crop region, in original-image pixel coordinates.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right corner
/// (exclusive). Coordinates are signed so that intermediate values during
/// editing and clamping never wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl CropRect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Square rectangle of side `size` with its top-left corner at `(x, y)`.
    pub fn anchored(x: i32, y: i32, size: i32) -> Self {
        Self::new(x, y, x.saturating_add(size), y.saturating_add(size))
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Check whether a point lies inside the rectangle, edges included.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// Check whether the rectangle lies within `[0, width] x [0, height]`.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        let (w, h) = (i64::from(width), i64::from(height));
        0 <= self.x1
            && i64::from(self.x2) <= w
            && 0 <= self.y1
            && i64::from(self.y2) <= h
            && self.x1 < self.x2
            && self.y1 < self.y2
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Error parsing a crop rectangle from its `x1,y1,x2,y2` text form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRectError {
    #[error("expected 4 comma-separated values (x1,y1,x2,y2), got {0}")]
    WrongArity(usize),

    #[error("invalid coordinate '{0}'")]
    InvalidNumber(String),

    #[error("rectangle must satisfy x1 < x2 and y1 < y2")]
    Empty,
}

impl FromStr for CropRect {
    type Err = ParseRectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ParseRectError::WrongArity(parts.len()));
        }

        let mut values = [0i32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ParseRectError::InvalidNumber(part.to_string()))?;
        }

        let rect = CropRect::new(values[0], values[1], values[2], values[3]);
        if rect.x1 >= rect.x2 || rect.y1 >= rect.y2 {
            return Err(ParseRectError::Empty);
        }
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_rect() {
        let rect = CropRect::anchored(500, 500, 150);
        assert_eq!(rect, CropRect::new(500, 500, 650, 650));
        assert_eq!(rect.width(), 150);
        assert_eq!(rect.height(), 150);
    }

    #[test]
    fn test_anchored_rect_saturates() {
        let rect = CropRect::anchored(300, 300, i32::MAX);
        assert_eq!(rect, CropRect::new(300, 300, i32::MAX, i32::MAX));
    }

    #[test]
    fn test_contains_includes_edges() {
        let rect = CropRect::new(10, 10, 20, 20);
        assert!(rect.contains(10, 10));
        assert!(rect.contains(20, 20));
        assert!(rect.contains(15, 12));
        assert!(!rect.contains(21, 15));
        assert!(!rect.contains(15, 9));
    }

    #[test]
    fn test_is_within() {
        assert!(CropRect::new(0, 0, 100, 80).is_within(100, 80));
        assert!(!CropRect::new(-1, 0, 100, 80).is_within(100, 80));
        assert!(!CropRect::new(0, 0, 101, 80).is_within(100, 80));
        assert!(!CropRect::new(50, 0, 50, 80).is_within(100, 80));
    }

    #[test]
    fn test_display_and_parse() {
        let rect = CropRect::new(900, 700, 1100, 900);
        assert_eq!(rect.to_string(), "900,700,1100,900");
        assert_eq!("900,700,1100,900".parse::<CropRect>(), Ok(rect));
        assert_eq!(" 1, 2 ,3,4 ".parse::<CropRect>(), Ok(CropRect::new(1, 2, 3, 4)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("1,2,3".parse::<CropRect>(), Err(ParseRectError::WrongArity(3)));
        assert_eq!(
            "1,2,x,4".parse::<CropRect>(),
            Err(ParseRectError::InvalidNumber("x".to_string()))
        );
        assert_eq!("10,10,5,20".parse::<CropRect>(), Err(ParseRectError::Empty));
    }
}
