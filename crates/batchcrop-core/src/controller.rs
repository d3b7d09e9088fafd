//! The image list, the active image and the crop editor behind one
//! event-driven entry point.
//!
//! A presentation shell owns exactly one [`CropController`]. It feeds it
//! typed [`ShellEvent`]s and draws whatever [`RenderState`] comes back; no
//! state lives outside the controller.

use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::batch::{BatchCropEngine, BatchError, BatchProgress, BatchResult};
use crate::config::CropConfig;
use crate::editor::{CropEditor, EditorState, PointerEvent};
use crate::geometry::{PreviewRect, PreviewTransform};
use crate::session::{ImageSession, LoadError};
use crate::CropRect;

/// Errors surfaced to the shell.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A batch was requested with an empty image list
    #[error("no images to crop")]
    NoImages,

    /// A batch was requested before a crop box was drawn
    #[error("no crop box defined")]
    NoCropBox,

    #[error("failed to load {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Events a shell forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellEvent {
    Pointer(PointerEvent),
    ViewportResized { width: u32, height: u32 },
    ImageSelected(usize),
}

/// One entry of the image list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub path: PathBuf,
    /// Known once the image has been loaded at least once.
    pub dimensions: Option<(u32, u32)>,
}

/// Everything a shell needs to redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub status: String,
    /// Crop box in canvas coordinates.
    pub preview_rect: Option<PreviewRect>,
    /// Where the preview bitmap sits on the canvas.
    pub transform: Option<PreviewTransform>,
    /// Whether starting a batch makes sense right now.
    pub crop_enabled: bool,
    pub active: Option<usize>,
    pub editor_state: EditorState,
}

/// The batch cropper's interactive state.
#[derive(Debug)]
pub struct CropController {
    config: CropConfig,
    images: Vec<ImageHandle>,
    active: Option<usize>,
    session: ImageSession,
    editor: CropEditor,
    viewport: (u32, u32),
}

impl CropController {
    pub fn new(config: CropConfig, viewport_width: u32, viewport_height: u32) -> Self {
        let config = config.sanitized();
        Self {
            session: ImageSession::new(&config),
            editor: CropEditor::new(&config),
            config,
            images: Vec::new(),
            active: None,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn images(&self) -> &[ImageHandle] {
        &self.images
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.images.iter().map(|h| h.path.clone()).collect()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn session(&self) -> &ImageSession {
        &self.session
    }

    pub fn rect(&self) -> Option<CropRect> {
        self.editor.rect()
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Append the paths that are not yet listed, keeping their order.
    ///
    /// When the list was empty and something was added, the first image is
    /// selected. The paths stay listed even if loading it fails; the error
    /// is returned so the shell can report it.
    pub fn add_images<I, P>(&mut self, paths: I) -> Result<usize, ControllerError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let was_empty = self.images.is_empty();
        let mut added = 0;
        for path in paths {
            let path = path.into();
            if self.images.iter().any(|h| h.path == path) {
                debug!("skipping duplicate {}", path.display());
                continue;
            }
            self.images.push(ImageHandle {
                path,
                dimensions: None,
            });
            added += 1;
        }

        if added > 0 {
            info!("added {} images ({} total)", added, self.images.len());
        }
        if was_empty && added > 0 {
            self.select(0)?;
        }
        Ok(added)
    }

    /// Remove the images at `indices`; unknown indices are ignored.
    ///
    /// Removing the active image also clears the preview and the crop box.
    pub fn remove(&mut self, indices: &[usize]) {
        let mut doomed: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.images.len())
            .collect();
        doomed.sort_unstable();
        doomed.dedup();

        for &index in doomed.iter().rev() {
            self.images.remove(index);
        }

        if let Some(active) = self.active {
            if doomed.binary_search(&active).is_ok() {
                self.session.unload();
                self.editor.clear();
                self.active = None;
            } else {
                let shift = doomed.iter().filter(|&&i| i < active).count();
                self.active = Some(active - shift);
            }
        }
    }

    /// Empty the list and forget the image and the crop box.
    pub fn clear(&mut self) {
        self.images.clear();
        self.session.unload();
        self.editor.clear();
        self.active = None;
    }

    /// Make the image at `index` active. Out-of-range indices are ignored.
    ///
    /// The crop box is kept: one box is shared by every image. On failure
    /// the previous image stays active.
    pub fn select(&mut self, index: usize) -> Result<(), ControllerError> {
        let Some(handle) = self.images.get(index) else {
            return Ok(());
        };
        let path = handle.path.clone();
        self.session.load(&path, self.viewport.0, self.viewport.1)?;

        if let (Some(handle), Some(source)) = (self.images.get_mut(index), self.session.source()) {
            handle.dimensions = Some(source.dimensions());
        }
        self.active = Some(index);
        Ok(())
    }

    /// Record the new viewport size and re-fit the active image to it.
    pub fn resize_viewport(&mut self, width: u32, height: u32) -> Result<(), ControllerError> {
        self.viewport = (width, height);
        self.session.on_viewport_resize(width, height)?;
        Ok(())
    }

    /// Forward a pointer event to the editor. Returns `true` if the crop box
    /// changed.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        let frame = self.session.frame();
        self.editor.handle(event, frame.as_ref())
    }

    /// True iff an image is loaded and a crop box exists.
    pub fn crop_enabled(&self) -> bool {
        self.session.is_loaded() && self.editor.rect().is_some()
    }

    pub fn render(&self) -> RenderState {
        let loaded = self.session.is_loaded();
        let transform = self.session.transform();
        RenderState {
            status: self.editor.status(loaded),
            preview_rect: transform.and_then(|t| self.editor.preview_rect(&t)),
            transform,
            crop_enabled: self.crop_enabled(),
            active: self.active,
            editor_state: self.editor.state(loaded),
        }
    }

    /// Apply one shell event and return the state to draw.
    pub fn dispatch(&mut self, event: ShellEvent) -> Result<RenderState, ControllerError> {
        match event {
            ShellEvent::Pointer(pointer) => {
                self.pointer(pointer);
            }
            ShellEvent::ViewportResized { width, height } => self.resize_viewport(width, height)?,
            ShellEvent::ImageSelected(index) => self.select(index)?,
        }
        Ok(self.render())
    }

    /// Crop every listed image with the current box into `output_dir`.
    ///
    /// # Errors
    ///
    /// `NoImages` / `NoCropBox` when there is nothing to do, `Batch` when the
    /// output directory cannot be created. Per-image failures are part of
    /// the returned result.
    pub fn start_batch<F>(&self, output_dir: &Path, on_progress: F) -> Result<BatchResult, ControllerError>
    where
        F: FnMut(BatchProgress),
    {
        if self.images.is_empty() {
            return Err(ControllerError::NoImages);
        }
        let rect = self.editor.rect().ok_or(ControllerError::NoCropBox)?;

        let engine = BatchCropEngine::new(&self.config);
        info!("starting batch of {} images on {} workers", self.images.len(), engine.workers());
        let result = engine.run_with_progress(&self.paths(), rect, output_dir, on_progress)?;
        Ok(result)
    }
}
