//! Canvas ↔ layer coordinate mapping.
//!
//! A layer is moved in the frame its own geometry lives in, which is its
//! parent's frame. Under rotated or scaled groups a canvas delta must be
//! mapped through that frame before it is applied, and each selected layer
//! may have a different one.

use kurbo::{Affine, Point, Vec2};
use vl_core::{LayerId, LayerTree};

/// Determinants below this are treated as a collapsed frame.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Coordinates flushed to zero after angle snapping.
const SNAP_NOISE: f64 = 1e-9;

/// A layer's coordinate frame, captured when a gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemFrame {
    /// Canvas coordinates → the layer's local frame.
    pub global_to_local: Affine,
    /// Reference point of the layer in canvas coordinates.
    pub anchor: Point,
}

impl ItemFrame {
    /// Build a frame from its local → canvas transform.
    /// Returns `None` when the transform can't be inverted (zero scale).
    pub fn new(local_to_global: Affine, anchor: Point) -> Option<Self> {
        if local_to_global.determinant().abs() < SINGULAR_EPSILON {
            return None;
        }
        Some(Self {
            global_to_local: local_to_global.inverse(),
            anchor,
        })
    }

    pub fn to_local(&self, canvas: Point) -> Point {
        self.global_to_local * canvas
    }

    /// The drag from `down` to `point` (both canvas space) in local space.
    pub fn local_delta(&self, down: Point, point: Point) -> Vec2 {
        self.to_local(point) - self.to_local(down)
    }
}

/// Round the direction of `v` to the nearest multiple of `step_degrees`,
/// keeping its length.
pub fn snap_vector_to_angle(v: Vec2, step_degrees: f64) -> Vec2 {
    let length = v.hypot();
    if length == 0.0 || step_degrees <= 0.0 {
        return v;
    }
    let step = step_degrees.to_radians();
    let angle = (v.atan2() / step).round() * step;
    let snapped = Vec2::from_angle(angle) * length;
    Vec2::new(flush_noise(snapped.x), flush_noise(snapped.y))
}

fn flush_noise(v: f64) -> f64 {
    if v.abs() < SNAP_NOISE { 0.0 } else { v }
}

// ─── Item lookup ─────────────────────────────────────────────────────────

/// Resolves a layer id to its coordinate frame.
pub trait ItemLookup {
    fn find_item(&self, tree: &LayerTree, id: LayerId) -> Option<ItemFrame>;
}

/// Derives frames from the layer tree itself: the frame is the inverse of
/// the composed ancestor transforms, and the anchor is the centre of the
/// layer's canvas bounds (or the frame origin for empty layers).
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeItemLookup;

impl ItemLookup for TreeItemLookup {
    fn find_item(&self, tree: &LayerTree, id: LayerId) -> Option<ItemFrame> {
        let to_canvas = tree.ancestor_transform(id)?;
        let anchor = tree
            .global_bounds(id)
            .map(|b| b.center())
            .unwrap_or_else(|| to_canvas * Point::ORIGIN);
        let frame = ItemFrame::new(to_canvas, anchor);
        if frame.is_none() {
            log::warn!("layer {id} sits in a collapsed frame and cannot be dragged");
        }
        frame
    }
}
