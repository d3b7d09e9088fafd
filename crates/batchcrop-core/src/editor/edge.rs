//! Edge hit-testing and single-edge resizing.

use std::fmt;

use crate::geometry::PreviewRect;
use crate::CropRect;

/// One side of the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// Hit-test order; corners resolve to the first edge that matches.
    pub const PRIORITY: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }

    /// Whether a canvas point is within `tolerance` of this edge of `rect`.
    fn is_hit(self, x: f64, y: f64, rect: &PreviewRect, tolerance: f64) -> bool {
        let within_x = rect.x1 <= x && x <= rect.x2;
        let within_y = rect.y1 <= y && y <= rect.y2;
        match self {
            Edge::Top => (y - rect.y1).abs() <= tolerance && within_x,
            Edge::Bottom => (y - rect.y2).abs() <= tolerance && within_x,
            Edge::Left => (x - rect.x1).abs() <= tolerance && within_y,
            Edge::Right => (x - rect.x2).abs() <= tolerance && within_y,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Find the edge of `rect` (in canvas coordinates) under a canvas point.
///
/// Edges are tested top, bottom, left, right; the first match wins.
pub fn hit_edge(x: f64, y: f64, rect: &PreviewRect, tolerance: f64) -> Option<Edge> {
    Edge::PRIORITY
        .into_iter()
        .find(|edge| edge.is_hit(x, y, rect, tolerance))
}

/// Move one edge of `rect` by `(dx, dy)` original pixels.
///
/// Only the component of the delta along the edge's axis is used. The moved
/// edge is clamped to `[0, width]` / `[0, height]` on both sides, even when
/// the box itself reaches past the image; if it would come within
/// `min_size` of the opposite edge the move is rejected and the edge stays put.
pub fn resize_edge(
    rect: CropRect,
    edge: Edge,
    (dx, dy): (i32, i32),
    (width, height): (u32, u32),
    min_size: i32,
) -> CropRect {
    let width = i32::try_from(width).unwrap_or(i32::MAX);
    let height = i32::try_from(height).unwrap_or(i32::MAX);
    let mut out = rect;

    match edge {
        Edge::Top => {
            let y1 = rect.y1.saturating_add(dy).clamp(0, height);
            if y1 < rect.y2.saturating_sub(min_size) {
                out.y1 = y1;
            }
        }
        Edge::Bottom => {
            let y2 = rect.y2.saturating_add(dy).clamp(0, height);
            if y2 > rect.y1.saturating_add(min_size) {
                out.y2 = y2;
            }
        }
        Edge::Left => {
            let x1 = rect.x1.saturating_add(dx).clamp(0, width);
            if x1 < rect.x2.saturating_sub(min_size) {
                out.x1 = x1;
            }
        }
        Edge::Right => {
            let x2 = rect.x2.saturating_add(dx).clamp(0, width);
            if x2 > rect.x1.saturating_add(min_size) {
                out.x2 = x2;
            }
        }
    }

    out
}
