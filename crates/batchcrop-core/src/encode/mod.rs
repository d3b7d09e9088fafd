//! Image encoding for cropped outputs.
//!
//! This module provides functionality for:
//! - Choosing the output format from the output file name, falling back to
//!   the format the source was decoded from
//! - Encoding with a quality setting where the format takes one (JPEG)
//!
//! # Architecture
//!
//! Encoders write to any `Write + Seek` sink, so the batch engine can hand
//! them a file it has already claimed on disk.

mod save;

pub use save::{encode_to, output_format, EncodeError};
