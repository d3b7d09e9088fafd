//! Decoded images and the ways decoding can fail.

use image::{DynamicImage, ImageError, ImageFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an image could not be decoded or resampled.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The content matches no supported format
    #[error("unrecognized image format")]
    Unrecognized,

    /// The format was recognized but the data is damaged or truncated
    #[error("corrupt image data: {0}")]
    Corrupt(String),

    /// The decoder's size limits were exceeded
    #[error("image exceeds decoder limits")]
    TooLarge,

    /// The file could not be read
    #[error("read failed: {0}")]
    Io(String),

    /// A resample target had a zero side
    #[error("cannot resample to {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
}

impl From<ImageError> for DecodeError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Unsupported(_) => DecodeError::Unrecognized,
            ImageError::Limits(_) => DecodeError::TooLarge,
            ImageError::IoError(e) => DecodeError::Io(e.to_string()),
            other => DecodeError::Corrupt(other.to_string()),
        }
    }
}

/// Resampling filter for preview bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Nearest,
    /// Triangle filter; cheap and smooth enough for large previews.
    #[default]
    Bilinear,
    /// Sharpest result, noticeably slower on big originals.
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType as Filter;

        match self {
            FilterType::Nearest => Filter::Nearest,
            FilterType::Bilinear => Filter::Triangle,
            FilterType::Lanczos3 => Filter::Lanczos3,
        }
    }
}

/// How the stored pixels must be turned to appear upright, from the EXIF
/// `Orientation` tag.
///
/// Crop rectangles are drawn on the upright image, so every decode applies
/// this before anything else sees the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Tag value 1, or no tag at all.
    #[default]
    Upright,
    Mirrored,
    Rotated180,
    Flipped,
    /// Mirrored across the main diagonal.
    Transposed,
    Rotated90,
    /// Mirrored across the anti-diagonal.
    Transversed,
    Rotated270,
}

impl Orientation {
    /// Map an EXIF tag value; unknown values count as upright.
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Orientation::Mirrored,
            3 => Orientation::Rotated180,
            4 => Orientation::Flipped,
            5 => Orientation::Transposed,
            6 => Orientation::Rotated90,
            7 => Orientation::Transversed,
            8 => Orientation::Rotated270,
            _ => Orientation::Upright,
        }
    }

    /// Turn `image` upright.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Upright => image,
            Orientation::Mirrored => image.fliph(),
            Orientation::Rotated180 => image.rotate180(),
            Orientation::Flipped => image.flipv(),
            Orientation::Transposed => image.rotate90().fliph(),
            Orientation::Rotated90 => image.rotate90(),
            Orientation::Transversed => image.rotate270().fliph(),
            Orientation::Rotated270 => image.rotate270(),
        }
    }
}

/// An upright decoded image and the container it came from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: DynamicImage,
    /// Format sniffed from the content; crops are saved in kind when the
    /// output name does not say otherwise.
    pub format: Option<ImageFormat>,
}

impl SourceImage {
    pub fn new(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self { image, format }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    /// 2x1 image: red on the left, green on the right.
    fn red_green() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap())
    }

    #[test]
    fn test_filter_mapping() {
        assert_eq!(FilterType::Nearest.to_image_filter(), image::imageops::FilterType::Nearest);
        assert_eq!(FilterType::Bilinear.to_image_filter(), image::imageops::FilterType::Triangle);
        assert_eq!(FilterType::Lanczos3.to_image_filter(), image::imageops::FilterType::Lanczos3);
    }

    #[test]
    fn test_orientation_from_exif() {
        assert_eq!(Orientation::from_exif(1), Orientation::Upright);
        assert_eq!(Orientation::from_exif(6), Orientation::Rotated90);
        assert_eq!(Orientation::from_exif(8), Orientation::Rotated270);
        assert_eq!(Orientation::from_exif(0), Orientation::Upright);
        assert_eq!(Orientation::from_exif(42), Orientation::Upright);
    }

    #[test]
    fn test_rotation_swaps_sides() {
        let rotated = Orientation::Rotated90.apply(red_green());
        assert_eq!((rotated.width(), rotated.height()), (1, 2));

        let upright = Orientation::Upright.apply(red_green());
        assert_eq!((upright.width(), upright.height()), (2, 1));
    }

    #[test]
    fn test_mirror_swaps_pixels() {
        let mirrored = Orientation::Mirrored.apply(red_green()).into_rgb8();
        assert_eq!(mirrored.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(mirrored.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_rotate90_moves_left_pixel_to_top() {
        // Clockwise: the left pixel ends up on top
        let rotated = Orientation::Rotated90.apply(red_green()).into_rgb8();
        assert_eq!(rotated.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rotated.get_pixel(0, 1).0, [0, 255, 0]);
    }

    #[test]
    fn test_source_image_dimensions() {
        let img = SourceImage::new(DynamicImage::new_rgb8(120, 80), Some(ImageFormat::Png));
        assert_eq!(img.dimensions(), (120, 80));
        assert_eq!((img.width(), img.height()), (120, 80));
    }

    #[test]
    fn test_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DecodeError::from(ImageError::IoError(io));
        assert!(matches!(err, DecodeError::Io(_)));
        assert_eq!(err.to_string(), "read failed: gone");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(DecodeError::Unrecognized.to_string(), "unrecognized image format");
        assert_eq!(
            DecodeError::ZeroSize { width: 0, height: 5 }.to_string(),
            "cannot resample to 0x5"
        );
    }
}
