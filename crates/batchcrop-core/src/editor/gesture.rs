//! Transient pointer-gesture state and the drag-move rule.

use super::Edge;
use crate::CropRect;

/// What the pointer is doing between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving the whole rectangle; `grab` is the pointer's offset from the
    /// rectangle's top-left corner at pointer-down.
    Dragging { grab: (i32, i32) },
    /// Moving one edge; `anchor` is the last original-space pointer position.
    Resizing { edge: Edge, anchor: (i32, i32) },
}

/// Place `rect` so its top-left sits at `pointer - grab`, keeping its size.
///
/// Each corner is clamped to the image independently, so a rectangle pushed
/// against a border gets trimmed on that side rather than stopping. A move
/// that would trim either side below `min_size` is rejected (`None`).
pub fn move_rect(
    rect: CropRect,
    pointer: (i32, i32),
    grab: (i32, i32),
    (width, height): (u32, u32),
    min_size: i32,
) -> Option<CropRect> {
    let width = i32::try_from(width).unwrap_or(i32::MAX);
    let height = i32::try_from(height).unwrap_or(i32::MAX);

    let x1 = pointer.0 - grab.0;
    let y1 = pointer.1 - grab.1;
    let moved = CropRect::new(
        x1.max(0),
        y1.max(0),
        x1.saturating_add(rect.width()).min(width),
        y1.saturating_add(rect.height()).min(height),
    );

    if moved.width() < min_size || moved.height() < min_size {
        return None;
    }
    Some(moved)
}
