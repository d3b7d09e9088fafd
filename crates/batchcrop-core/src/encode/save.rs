//! Format-aware encoding with quality control.
//!
//! JPEG output goes through the `image` crate's JPEG encoder with an explicit
//! quality; every other format uses that format's default encoder after the
//! pixels are converted to a color type it accepts.

use std::borrow::Cow;
use std::io::{Seek, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};
use thiserror::Error;

/// Errors that can occur while encoding an output image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Neither the output name nor the source tells which format to write
    #[error("Unsupported output format for '{0}'")]
    UnsupportedFormat(String),

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Pick the format to write `path` in.
///
/// The file extension wins; if it names no format this build can write,
/// `fallback` (the format the source was decoded from) is used.
pub fn output_format(path: &Path, fallback: Option<ImageFormat>) -> Result<ImageFormat, EncodeError> {
    ImageFormat::from_path(path)
        .ok()
        .filter(ImageFormat::writing_enabled)
        .or(fallback.filter(ImageFormat::writing_enabled))
        .ok_or_else(|| EncodeError::UnsupportedFormat(path.display().to_string()))
}

/// Encode `image` as `format` into `writer`.
///
/// # Arguments
///
/// * `image` - Image to encode
/// * `format` - Output container format
/// * `quality` - JPEG quality (1-100), ignored by formats without one
/// * `writer` - Destination sink
///
/// JPEG has no alpha channel, so JPEG output is flattened to RGB first.
/// GIF is always written from RGBA; BMP from RGB, or RGBA when the source
/// has alpha.
pub fn encode_to<W: Write + Seek>(
    image: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    writer: &mut W,
) -> Result<(), EncodeError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    match format {
        ImageFormat::Jpeg => {
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(writer, quality.clamp(1, 100))
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))
        }
        other => encodable(image, other)
            .write_to(writer, other)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string())),
    }
}

/// Convert `image` to a color type the `format` encoder accepts.
fn encodable(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    match format {
        ImageFormat::Gif => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        ImageFormat::Bmp if image.color().has_alpha() => {
            Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8()))
        }
        ImageFormat::Bmp => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        _ => Cow::Borrowed(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageReader, LumaA, RgbImage, RgbaImage};
    use std::io::Cursor;

    fn gray(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([128, 128, 128])))
    }

    fn encode(image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>, EncodeError> {
        let mut buffer = Cursor::new(Vec::new());
        encode_to(image, format, quality, &mut buffer)?;
        Ok(buffer.into_inner())
    }

    fn decoded_size(bytes: &[u8]) -> (u32, u32) {
        let img = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .unwrap()
            .decode()
            .unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg_bytes = encode(&gray(100, 100), ImageFormat::Jpeg, 95).unwrap();

        // SOI marker at the start, EOI at the end
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        assert!(encode(&gray(10, 10), ImageFormat::Jpeg, 0).is_ok());
        assert!(encode(&gray(10, 10), ImageFormat::Jpeg, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 4])));
        assert!(encode(&rgba, ImageFormat::Jpeg, 95).is_ok());
    }

    #[test]
    fn test_encode_luma_as_gif() {
        let luma = DynamicImage::ImageLuma8(GrayImage::from_pixel(12, 7, image::Luma([90])));
        let bytes = encode(&luma, ImageFormat::Gif, 95).unwrap();
        assert_eq!(&bytes[0..3], b"GIF");
        assert_eq!(decoded_size(&bytes), (12, 7));
    }

    #[test]
    fn test_encode_bmp_from_any_color_type() {
        let luma_alpha = DynamicImage::ImageLumaA8(image::ImageBuffer::from_pixel(5, 3, LumaA([40, 200])));
        let bytes = encode(&luma_alpha, ImageFormat::Bmp, 95).unwrap();
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(decoded_size(&bytes), (5, 3));

        let wide = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(4, 4, image::Rgb([1000u16, 2000, 3000])));
        let bytes = encode(&wide, ImageFormat::Bmp, 95).unwrap();
        assert_eq!(decoded_size(&bytes), (4, 4));
    }

    #[test]
    fn test_encode_zero_dimensions() {
        let result = encode(&DynamicImage::new_rgb8(0, 10), ImageFormat::Jpeg, 95);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_png_signature() {
        let mut buffer = Cursor::new(Vec::new());
        encode_to(&gray(4, 4), ImageFormat::Png, 95, &mut buffer).unwrap();
        assert_eq!(&buffer.into_inner()[0..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(output_format(Path::new("a/photo.jpg"), None).unwrap(), ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("photo.JPEG"), None).unwrap(), ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("scan.png"), None).unwrap(), ImageFormat::Png);
        assert_eq!(output_format(Path::new("old.bmp"), None).unwrap(), ImageFormat::Bmp);
    }

    #[test]
    fn test_output_format_falls_back_to_source() {
        let format = output_format(Path::new("no_extension"), Some(ImageFormat::Png)).unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn test_output_format_unwritable_extension_falls_back() {
        // TIFF support is not compiled in
        let format = output_format(Path::new("scan.tiff"), Some(ImageFormat::Jpeg)).unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_output_format_unknown() {
        let result = output_format(Path::new("notes.txt"), None);
        assert!(matches!(result, Err(EncodeError::UnsupportedFormat(_))));
    }
}
