//! Image decoding for the batch cropper.
//!
//! This module provides functionality for:
//! - Decoding image files (JPEG, PNG, BMP, GIF) with EXIF orientation applied
//! - Remembering the source format so crops can be saved in kind
//! - Resampling images to preview size
//!
//! # Architecture
//!
//! All operations are synchronous. The batch engine calls them from its
//! worker threads; the image session calls them from the interactive thread.

mod file;
mod resize;
mod types;

pub use file::{decode_bytes, decode_file, read_orientation};
pub use resize::resize;
pub use types::{DecodeError, FilterType, Orientation, SourceImage};
