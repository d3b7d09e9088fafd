//! Tunable constants for editing and batch cropping.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;

/// Smallest width/height a crop rectangle may have, in original pixels.
pub const MIN_CROP_SIZE: i32 = 20;
/// Side length of a freshly created crop box, in original pixels.
pub const DEFAULT_BOX_SIZE: i32 = 150;
/// Upper bound for configured rectangle sides; keeps edge arithmetic in `i32`.
pub const MAX_BOX_SIDE: i32 = 65_535;
/// Distance in canvas pixels within which the pointer is "on" an edge.
pub const EDGE_TOLERANCE: f64 = 6.0;
/// Fraction of the viewport the preview may occupy on each axis.
pub const PREVIEW_FILL: f64 = 0.9;
/// Output quality for formats that take one (0-100 scale).
pub const OUTPUT_QUALITY: u8 = 95;
/// Width of the batch worker pool.
pub const WORKER_COUNT: usize = 4;

/// Configuration shared by the editor, the image session and the batch engine.
///
/// Missing fields take their default values when deserialized, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Minimum crop width/height in original pixels.
    pub min_size: i32,
    /// Side of the square box created by a click on empty canvas.
    pub default_box_size: i32,
    /// Edge-hit tolerance in canvas pixels.
    pub edge_tolerance: f64,
    /// Fraction of the viewport the preview may fill (0.0, 1.0].
    pub preview_fill: f64,
    /// Resampling filter used to build the preview bitmap.
    pub preview_filter: FilterType,
    /// Output quality (1-100) for formats that support one.
    pub quality: u8,
    /// Number of batch worker threads.
    pub workers: usize,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_CROP_SIZE,
            default_box_size: DEFAULT_BOX_SIZE,
            edge_tolerance: EDGE_TOLERANCE,
            preview_fill: PREVIEW_FILL,
            preview_filter: FilterType::Lanczos3,
            quality: OUTPUT_QUALITY,
            workers: WORKER_COUNT,
        }
    }
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every field into its valid range.
    pub fn sanitize(&mut self) {
        self.min_size = self.min_size.clamp(1, MAX_BOX_SIDE);
        self.default_box_size = self.default_box_size.clamp(self.min_size, MAX_BOX_SIDE);
        if !self.edge_tolerance.is_finite() || self.edge_tolerance < 0.0 {
            self.edge_tolerance = EDGE_TOLERANCE;
        }
        if !(self.preview_fill > 0.0 && self.preview_fill <= 1.0) {
            self.preview_fill = PREVIEW_FILL;
        }
        self.quality = self.quality.clamp(1, 100);
        self.workers = self.workers.max(1);
    }

    /// Sanitized copy.
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CropConfig::new();
        assert_eq!(config.min_size, 20);
        assert_eq!(config.default_box_size, 150);
        assert_eq!(config.quality, 95);
        assert_eq!(config.workers, 4);
        assert_eq!(config.preview_filter, FilterType::Lanczos3);
    }

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let mut config = CropConfig::default();
        config.quality = 0;
        config.workers = 0;
        config.min_size = -5;
        config.preview_fill = 1.5;
        config.edge_tolerance = f64::NAN;
        config.sanitize();

        assert_eq!(config.quality, 1);
        assert_eq!(config.workers, 1);
        assert_eq!(config.min_size, 1);
        assert_eq!(config.preview_fill, PREVIEW_FILL);
        assert_eq!(config.edge_tolerance, EDGE_TOLERANCE);
    }

    #[test]
    fn test_sanitize_keeps_valid_values() {
        let config = CropConfig::default().sanitized();
        assert_eq!(config, CropConfig::default());
    }

    #[test]
    fn test_default_box_not_smaller_than_minimum() {
        let mut config = CropConfig::default();
        config.min_size = 200;
        config.sanitize();
        assert_eq!(config.default_box_size, 200);
    }

    #[test]
    fn test_sanitize_caps_box_sides() {
        let mut config = CropConfig::default();
        config.min_size = i32::MAX;
        config.default_box_size = i32::MAX;
        config.sanitize();
        assert_eq!(config.min_size, MAX_BOX_SIDE);
        assert_eq!(config.default_box_size, MAX_BOX_SIDE);

        let mut config = CropConfig::default();
        config.default_box_size = 2_147_483_647;
        config.sanitize();
        assert_eq!(config.min_size, MIN_CROP_SIZE);
        assert_eq!(config.default_box_size, MAX_BOX_SIDE);
    }
}
