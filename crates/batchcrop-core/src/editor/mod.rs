//! Pointer-driven crop box editing.
//!
//! The editor owns the single crop rectangle (in original-image pixels) and
//! turns raw canvas pointer events into create, move and edge-resize
//! operations on it.
//!
//! # State Machine
//!
//! ```text
//! no-image ── image loaded ──▶ no-box ── down on image ──▶ box-idle
//! box-idle ── down on edge ──▶ resizing ── up ──▶ box-idle
//! box-idle ── down inside ───▶ dragging ── up ──▶ box-idle
//! box-idle ── down outside ──▶ box-idle (new box)
//! ```
//!
//! Events whose position falls off the preview bitmap are ignored.

mod edge;
mod gesture;

pub use edge::{hit_edge, resize_edge, Edge};
pub use gesture::{move_rect, Gesture};

use log::debug;

use crate::config::CropConfig;
use crate::geometry::{to_original, to_preview, PreviewRect, PreviewTransform};
use crate::CropRect;

/// A pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Drag { x: f64, y: f64 },
    Up,
}

/// The active image as the editor sees it: its size and where it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
    pub transform: PreviewTransform,
}

/// Coarse editor state, for display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    NoImage,
    NoBox,
    BoxIdle,
    Dragging,
    Resizing,
}

/// Owner of the crop rectangle and the in-progress gesture.
#[derive(Debug, Clone)]
pub struct CropEditor {
    rect: Option<CropRect>,
    gesture: Gesture,
    min_size: i32,
    default_box_size: i32,
    edge_tolerance: f64,
}

impl Default for CropEditor {
    fn default() -> Self {
        Self::new(&CropConfig::default())
    }
}

impl CropEditor {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            rect: None,
            gesture: Gesture::Idle,
            min_size: config.min_size,
            default_box_size: config.default_box_size,
            edge_tolerance: config.edge_tolerance,
        }
    }

    pub fn rect(&self) -> Option<CropRect> {
        self.rect
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Replace the rectangle, e.g. with one restored by the shell.
    pub fn set_rect(&mut self, rect: Option<CropRect>) {
        self.rect = rect;
        self.gesture = Gesture::Idle;
    }

    /// Drop the rectangle and any gesture in progress.
    pub fn clear(&mut self) {
        self.set_rect(None);
    }

    pub fn state(&self, image_loaded: bool) -> EditorState {
        match (image_loaded, self.rect, self.gesture) {
            (false, _, _) => EditorState::NoImage,
            (true, None, _) => EditorState::NoBox,
            (true, Some(_), Gesture::Idle) => EditorState::BoxIdle,
            (true, Some(_), Gesture::Dragging { .. }) => EditorState::Dragging,
            (true, Some(_), Gesture::Resizing { .. }) => EditorState::Resizing,
        }
    }

    /// Feed one pointer event. Returns `true` if the rectangle changed.
    ///
    /// `frame` is `None` when no image is loaded; down and drag events are
    /// then ignored.
    pub fn handle(&mut self, event: PointerEvent, frame: Option<&ImageFrame>) -> bool {
        match event {
            PointerEvent::Down { x, y } => frame.is_some_and(|f| self.pointer_down(x, y, f)),
            PointerEvent::Drag { x, y } => frame.is_some_and(|f| self.pointer_drag(x, y, f)),
            PointerEvent::Up => {
                self.gesture = Gesture::Idle;
                false
            }
        }
    }

    fn pointer_down(&mut self, x: f64, y: f64, frame: &ImageFrame) -> bool {
        let Some(pos) = to_original(x, y, &frame.transform) else {
            return false;
        };

        if let Some(rect) = self.rect {
            let preview = to_preview(&rect, &frame.transform);
            if let Some(edge) = hit_edge(x, y, &preview, self.edge_tolerance) {
                debug!("resize {} edge from {:?}", edge, pos);
                self.gesture = Gesture::Resizing { edge, anchor: pos };
                return false;
            }
            if rect.contains(pos.0, pos.1) {
                let grab = (pos.0 - rect.x1, pos.1 - rect.y1);
                debug!("drag crop box, grab offset {:?}", grab);
                self.gesture = Gesture::Dragging { grab };
                return false;
            }
        }

        // Not clamped here; the batch engine clamps per image.
        let rect = CropRect::anchored(pos.0, pos.1, self.default_box_size);
        debug!("new crop box {}", rect);
        self.rect = Some(rect);
        self.gesture = Gesture::Idle;
        true
    }

    fn pointer_drag(&mut self, x: f64, y: f64, frame: &ImageFrame) -> bool {
        let Some(pos) = to_original(x, y, &frame.transform) else {
            return false;
        };
        let Some(rect) = self.rect else {
            return false;
        };
        let bounds = (frame.width, frame.height);

        let gesture = self.gesture;
        let updated = match gesture {
            Gesture::Idle => return false,
            Gesture::Resizing { edge, anchor } => {
                let delta = (pos.0 - anchor.0, pos.1 - anchor.1);
                self.gesture = Gesture::Resizing { edge, anchor: pos };
                resize_edge(rect, edge, delta, bounds, self.min_size)
            }
            Gesture::Dragging { grab } => {
                match move_rect(rect, pos, grab, bounds, self.min_size) {
                    Some(moved) => moved,
                    None => return false,
                }
            }
        };

        let changed = updated != rect;
        self.rect = Some(updated);
        changed
    }

    /// The rectangle in canvas coordinates, for drawing.
    pub fn preview_rect(&self, transform: &PreviewTransform) -> Option<PreviewRect> {
        self.rect.map(|rect| to_preview(&rect, transform))
    }

    /// Human-readable status line.
    pub fn status(&self, image_loaded: bool) -> String {
        match (image_loaded, self.rect) {
            (false, _) => "no image".to_string(),
            (true, None) => "image loaded, awaiting crop box".to_string(),
            (true, Some(r)) => format!(
                "crop box ({},{})-({},{}) | size {}x{} px",
                r.x1,
                r.y1,
                r.x2,
                r.y2,
                r.width(),
                r.height()
            ),
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
