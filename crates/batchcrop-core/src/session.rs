//! The active image and its preview bitmap.
//!
//! The session holds the decoded original of the image currently being
//! edited, a preview resampled to fit the viewport, and the transform that
//! relates the two. It deliberately knows nothing about the crop rectangle:
//! one rectangle is shared by every image, so switching images never resets it.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::{info, warn};
use thiserror::Error;

use crate::config::CropConfig;
use crate::decode::{decode_file, resize, DecodeError, FilterType, SourceImage};
use crate::editor::ImageFrame;
use crate::geometry::{compute_transform_with_fill, PreviewTransform};

/// An image could not be loaded for editing.
#[derive(Debug, Error)]
#[error("{file}: {source}")]
pub struct LoadError {
    /// File name (without directories) of the image that failed.
    pub file: String,
    #[source]
    pub source: DecodeError,
}

impl LoadError {
    pub fn new(path: &Path, source: DecodeError) -> Self {
        Self {
            file: file_name(path),
            source,
        }
    }
}

/// Display name of a path: its final component, or the whole path if it has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug)]
struct ActiveImage {
    path: PathBuf,
    source: SourceImage,
    preview: DynamicImage,
    transform: PreviewTransform,
    viewport: (u32, u32),
}

/// The currently loaded image, if any.
#[derive(Debug)]
pub struct ImageSession {
    active: Option<ActiveImage>,
    preview_fill: f64,
    preview_filter: FilterType,
}

impl Default for ImageSession {
    fn default() -> Self {
        Self::new(&CropConfig::default())
    }
}

impl ImageSession {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            active: None,
            preview_fill: config.preview_fill,
            preview_filter: config.preview_filter,
        }
    }

    /// Decode `path` and make it the active image, previewed in a viewport of
    /// the given size.
    ///
    /// On failure the previously active image (if any) stays active.
    pub fn load(
        &mut self,
        path: &Path,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<PreviewTransform, LoadError> {
        let active = self
            .build(path, viewport_width, viewport_height)
            .map_err(|source| {
                let err = LoadError::new(path, source);
                warn!("failed to load image: {}", err);
                err
            })?;

        info!(
            "loaded {} ({}x{}), preview {}x{} at scale {:.3}",
            path.display(),
            active.source.width(),
            active.source.height(),
            active.transform.preview_width,
            active.transform.preview_height,
            active.transform.scale
        );

        let transform = active.transform;
        self.active = Some(active);
        Ok(transform)
    }

    fn build(
        &self,
        path: &Path,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<ActiveImage, DecodeError> {
        let source = decode_file(path)?;
        let transform = compute_transform_with_fill(
            source.width(),
            source.height(),
            viewport_width,
            viewport_height,
            self.preview_fill,
        );
        let preview = resize(
            &source.image,
            transform.preview_width,
            transform.preview_height,
            self.preview_filter,
        )?;

        Ok(ActiveImage {
            path: path.to_path_buf(),
            source,
            preview,
            transform,
            viewport: (viewport_width, viewport_height),
        })
    }

    /// Re-load the active image for a new viewport size.
    ///
    /// Returns `Ok(None)` when no image is active.
    pub fn on_viewport_resize(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Option<PreviewTransform>, LoadError> {
        let Some(path) = self.path().map(Path::to_path_buf) else {
            return Ok(None);
        };
        self.load(&path, width, height).map(Some)
    }

    /// Forget the active image.
    pub fn unload(&mut self) {
        self.active = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    /// The decoded original.
    pub fn source(&self) -> Option<&SourceImage> {
        self.active.as_ref().map(|a| &a.source)
    }

    /// The preview bitmap to draw at the transform's offset.
    pub fn preview(&self) -> Option<&DynamicImage> {
        self.active.as_ref().map(|a| &a.preview)
    }

    pub fn transform(&self) -> Option<PreviewTransform> {
        self.active.as_ref().map(|a| a.transform)
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.active.as_ref().map(|a| a.viewport)
    }

    /// Geometry the crop editor needs for the active image.
    pub fn frame(&self) -> Option<ImageFrame> {
        self.active.as_ref().map(|a| ImageFrame {
            width: a.source.width(),
            height: a.source.height(),
            transform: a.transform,
        })
    }
}
