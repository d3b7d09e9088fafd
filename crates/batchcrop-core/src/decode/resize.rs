//! Image resizing for preview generation.
//!
//! Returns new images without modifying the input. Preview dimensions come
//! from the preview transform, so bitmap and transform always agree.

use image::DynamicImage;

use super::{DecodeError, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::ZeroSize` if either target dimension is zero.
pub fn resize(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DynamicImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroSize { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    Ok(image.resize_exact(width, height, filter.to_image_filter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        // Simple gradient
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                128,
            ])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();
        assert_eq!((resized.width(), resized.height()), (50, 25));
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);
        assert!(matches!(
            resize(&img, 0, 50, FilterType::Bilinear),
            Err(DecodeError::ZeroSize { width: 0, height: 50 })
        ));
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_same_dimensions_is_copy() {
        let img = create_test_image(30, 20);
        let resized = resize(&img, 30, 20, FilterType::Lanczos3).unwrap();
        assert_eq!(resized.as_bytes(), img.as_bytes());
    }

    #[test]
    fn test_resize_preview_of_landscape() {
        let img = create_test_image(1000, 800);
        let resized = resize(&img, 540, 432, FilterType::Lanczos3).unwrap();
        assert_eq!((resized.width(), resized.height()), (540, 432));
    }

    #[test]
    fn test_all_filter_types() {
        let img = create_test_image(100, 50);
        for filter in [FilterType::Nearest, FilterType::Bilinear, FilterType::Lanczos3] {
            let resized = resize(&img, 50, 25, filter).unwrap();
            assert_eq!((resized.width(), resized.height()), (50, 25));
        }
    }
}
