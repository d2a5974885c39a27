//! Alignment guides for dragged layers.
//!
//! A snap adviser watches the drag and reports guide lines where the moving
//! layers line up with the rest of the document. Guides are for display;
//! they never change where the layers end up.

use crate::input::Modifiers;
use kurbo::{Point, Rect, Vec2};
use std::collections::HashSet;
use vl_core::{LayerId, LayerNode, LayerTree};

/// Default distance, in canvas units, within which an edge counts as aligned.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 4.0;

/// One alignment line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    /// Canvas x of a vertical guide, or canvas y of a horizontal one.
    pub position: f64,
    /// Signed offset of the moving edge from the guide.
    pub distance: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapInfo {
    pub horizontal: Vec<Guide>,
    pub vertical: Vec<Guide>,
}

impl SnapInfo {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }
}

/// A pointer sample during a drag, in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub down: Point,
    pub point: Point,
    /// Where the pressed layer's anchor sat at pointer-down.
    pub anchor: Option<Point>,
    pub modifiers: Modifiers,
}

impl DragSample {
    pub fn delta(&self) -> Vec2 {
        self.point - self.down
    }
}

pub trait SnapAdviser {
    /// A drag of `moving` within `tree` may start.
    fn begin(&mut self, _tree: &LayerTree, _moving: &[LayerId]) {}

    fn on_pointer_event(&mut self, sample: &DragSample);

    fn snap_info(&self) -> SnapInfo;
}

/// Adviser that never reports guides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnap;

impl SnapAdviser for NoSnap {
    fn on_pointer_event(&mut self, _sample: &DragSample) {}

    fn snap_info(&self) -> SnapInfo {
        SnapInfo::default()
    }
}

/// Matches the moving selection's bounding box (edges and centre) against
/// the edges and centres of every other path and clip path.
#[derive(Debug, Clone)]
pub struct GuideSnapper {
    tolerance: f64,
    moving: Option<Rect>,
    reference_xs: Vec<f64>,
    reference_ys: Vec<f64>,
    info: SnapInfo,
}

impl Default for GuideSnapper {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_TOLERANCE)
    }
}

impl GuideSnapper {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            moving: None,
            reference_xs: Vec::new(),
            reference_ys: Vec::new(),
            info: SnapInfo::default(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl SnapAdviser for GuideSnapper {
    fn begin(&mut self, tree: &LayerTree, moving: &[LayerId]) {
        // The root never moves, and its bounds would swallow every reference.
        let root = tree.root_id();
        let moving_set: HashSet<LayerId> =
            moving.iter().copied().filter(|id| *id != root).collect();
        self.moving = moving
            .iter()
            .filter(|id| moving_set.contains(id))
            .filter_map(|id| tree.global_bounds(*id))
            .reduce(|a, b| a.union(b));
        self.reference_xs.clear();
        self.reference_ys.clear();
        self.info = SnapInfo::default();

        for node in tree.layers() {
            if !matches!(**node, LayerNode::Path(_) | LayerNode::ClipPath(_)) {
                continue;
            }
            let id = node.id();
            let under_moving = moving_set.contains(&id)
                || tree
                    .ancestors(id)
                    .is_some_and(|chain| chain.iter().any(|a| moving_set.contains(&a.id())));
            if under_moving {
                continue;
            }
            if let Some(b) = tree.global_bounds(id) {
                self.reference_xs.extend(edges_x(b));
                self.reference_ys.extend(edges_y(b));
            }
        }
        for refs in [&mut self.reference_xs, &mut self.reference_ys] {
            refs.sort_by(f64::total_cmp);
            refs.dedup();
        }
        log::trace!(
            "snap: {} x / {} y references for {} moving layers",
            self.reference_xs.len(),
            self.reference_ys.len(),
            moving_set.len()
        );
    }

    fn on_pointer_event(&mut self, sample: &DragSample) {
        // Layers without geometry fall back to the anchor point.
        let start = self
            .moving
            .or_else(|| sample.anchor.map(|a| Rect::from_points(a, a)));
        self.info = match start {
            Some(start) => {
                let moved = start + sample.delta();
                SnapInfo {
                    horizontal: guides(&edges_y(moved), &self.reference_ys, self.tolerance),
                    vertical: guides(&edges_x(moved), &self.reference_xs, self.tolerance),
                }
            }
            None => SnapInfo::default(),
        };
    }

    fn snap_info(&self) -> SnapInfo {
        self.info.clone()
    }
}

fn edges_x(r: Rect) -> [f64; 3] {
    [r.x0, r.center().x, r.x1]
}

fn edges_y(r: Rect) -> [f64; 3] {
    [r.y0, r.center().y, r.y1]
}

/// One guide per reference line within tolerance, keeping the closest
/// moving edge, ordered nearest first.
fn guides(moving: &[f64], references: &[f64], tolerance: f64) -> Vec<Guide> {
    let mut found: Vec<Guide> = Vec::new();
    for &reference in references {
        let best = moving
            .iter()
            .map(|&edge| edge - reference)
            .filter(|d| d.abs() <= tolerance)
            .min_by(|a, b| a.abs().total_cmp(&b.abs()));
        if let Some(distance) = best {
            found.push(Guide {
                position: reference,
                distance,
            });
        }
    }
    found.sort_by(|a, b| a.distance.abs().total_cmp(&b.distance.abs()));
    found
}
