//! Reading image files into upright pixels.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::ImageReader;

use super::{DecodeError, Orientation, SourceImage};

/// Read and decode the image file at `path`.
///
/// The file name plays no part in choosing the decoder; see [`decode_bytes`].
pub fn decode_file(path: &Path) -> Result<SourceImage, DecodeError> {
    let bytes = fs::read(path).map_err(|e| DecodeError::Io(e.to_string()))?;
    decode_bytes(&bytes)
}

/// Decode an in-memory image, sniffing the format from its content and
/// turning it upright according to its EXIF orientation.
///
/// # Errors
///
/// `Unrecognized` when the content matches no supported format, `Corrupt`
/// when a recognized format fails to decode.
pub fn decode_bytes(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Io(e.to_string()))?;
    let format = reader.format().ok_or(DecodeError::Unrecognized)?;
    let image = reader.decode()?;

    let upright = read_orientation(bytes).apply(image);
    Ok(SourceImage::new(upright, Some(format)))
}

/// EXIF orientation of an encoded image; `Upright` when there is no usable tag.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let Ok(exif) = Reader::new().read_from_container(&mut Cursor::new(bytes)) else {
        return Orientation::Upright;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from_exif)
        .unwrap_or_default()
}
