//! Layer data model for vector documents.
//!
//! A document is a tree of `LayerNode` values under a single `VectorRoot`.
//! Groups carry a pivot/rotate/scale/translate transform; paths and clip
//! paths carry outline geometry expressed in their parent's frame.
//! Child nodes are held in `Arc`s so edited trees share untouched subtrees
//! with the tree they were derived from.

use crate::id::LayerId;
use crate::path::PathData;
use kurbo::{Affine, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ─── Layer variants ──────────────────────────────────────────────────────

/// The document root. Exactly one per tree, always at the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayer {
    pub id: LayerId,
    pub width: f64,
    pub height: f64,
    pub alpha: f64,
    pub children: Vec<Arc<LayerNode>>,
}

impl VectorLayer {
    pub fn new(id: LayerId, width: f64, height: f64) -> Self {
        Self {
            id,
            width,
            height,
            alpha: 1.0,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<LayerNode>) -> Self {
        self.children.push(Arc::new(child.into()));
        self
    }
}

/// A transformable container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLayer {
    pub id: LayerId,
    pub children: Vec<Arc<LayerNode>>,
    pub pivot_x: f64,
    pub pivot_y: f64,
    /// Degrees, clockwise in a y-down canvas.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl GroupLayer {
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            children: Vec::new(),
            pivot_x: 0.0,
            pivot_y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<LayerNode>) -> Self {
        self.children.push(Arc::new(child.into()));
        self
    }

    #[must_use]
    pub fn with_translation(mut self, x: f64, y: f64) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    /// Maps this group's child coordinates into its parent's frame:
    /// `T(pivot + translate) · R(rotation) · S(scale) · T(−pivot)`.
    pub fn local_transform(&self) -> Affine {
        let pivot = Vec2::new(self.pivot_x, self.pivot_y);
        let translate = Vec2::new(self.translate_x, self.translate_y);
        Affine::translate(pivot + translate)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(-pivot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLayer {
    pub id: LayerId,
    pub path_data: PathData,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: f64,
}

impl PathLayer {
    pub fn new(id: LayerId, path_data: PathData) -> Self {
        Self {
            id,
            path_data,
            fill_color: None,
            stroke_color: None,
            stroke_width: 0.0,
        }
    }
}

/// A mask that clips the siblings painted after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipPathLayer {
    pub id: LayerId,
    pub path_data: PathData,
}

impl ClipPathLayer {
    pub fn new(id: LayerId, path_data: PathData) -> Self {
        Self { id, path_data }
    }
}

// ─── LayerNode ───────────────────────────────────────────────────────────

/// Every kind of layer a tree can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerNode {
    VectorRoot(VectorLayer),
    Group(GroupLayer),
    Path(PathLayer),
    ClipPath(ClipPathLayer),
}

impl LayerNode {
    pub fn id(&self) -> LayerId {
        match self {
            LayerNode::VectorRoot(l) => l.id,
            LayerNode::Group(l) => l.id,
            LayerNode::Path(l) => l.id,
            LayerNode::ClipPath(l) => l.id,
        }
    }

    /// Children of container layers; `None` for leaves.
    pub fn children(&self) -> Option<&[Arc<LayerNode>]> {
        match self {
            LayerNode::VectorRoot(l) => Some(&l.children),
            LayerNode::Group(l) => Some(&l.children),
            LayerNode::Path(_) | LayerNode::ClipPath(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    /// Shallow copy with a new child list. Leaves are returned as-is.
    #[must_use]
    pub fn with_children(&self, children: Vec<Arc<LayerNode>>) -> LayerNode {
        match self {
            LayerNode::VectorRoot(l) => LayerNode::VectorRoot(VectorLayer {
                children,
                ..l.clone_without_children()
            }),
            LayerNode::Group(l) => LayerNode::Group(GroupLayer {
                children,
                ..l.clone_without_children()
            }),
            LayerNode::Path(_) | LayerNode::ClipPath(_) => self.clone(),
        }
    }

    /// Shallow copy carrying a different id. Children are shared.
    #[must_use]
    pub fn with_id(&self, id: LayerId) -> LayerNode {
        let mut node = self.clone();
        match &mut node {
            LayerNode::VectorRoot(l) => l.id = id,
            LayerNode::Group(l) => l.id = id,
            LayerNode::Path(l) => l.id = id,
            LayerNode::ClipPath(l) => l.id = id,
        }
        node
    }

    /// The transform this layer applies to its children (identity for
    /// everything but groups).
    pub fn local_transform(&self) -> Affine {
        match self {
            LayerNode::Group(g) => g.local_transform(),
            _ => Affine::IDENTITY,
        }
    }

    /// Translate this layer by `delta`, expressed in its parent's frame.
    ///
    /// Paths and clip paths have their geometry moved; groups have the delta
    /// added to their translation. The vector root is never translated.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Option<LayerNode> {
        match self {
            LayerNode::Path(l) => Some(LayerNode::Path(PathLayer {
                path_data: l.path_data.transform(Affine::translate(delta)),
                ..l.clone()
            })),
            LayerNode::ClipPath(l) => Some(LayerNode::ClipPath(ClipPathLayer {
                path_data: l.path_data.transform(Affine::translate(delta)),
                ..l.clone()
            })),
            LayerNode::Group(g) => {
                let mut moved = g.clone();
                moved.translate_x += delta.x;
                moved.translate_y += delta.y;
                Some(LayerNode::Group(moved))
            }
            LayerNode::VectorRoot(_) => None,
        }
    }

    /// Bounds in the parent's frame. Empty paths and empty groups have none.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            LayerNode::Path(l) => l.path_data.bounding_box(),
            LayerNode::ClipPath(l) => l.path_data.bounding_box(),
            LayerNode::Group(g) => {
                let inner = union_bounds(&g.children)?;
                Some(g.local_transform().transform_rect_bbox(inner))
            }
            LayerNode::VectorRoot(v) => union_bounds(&v.children),
        }
    }
}

fn union_bounds(children: &[Arc<LayerNode>]) -> Option<Rect> {
    children
        .iter()
        .filter_map(|c| c.bounds())
        .reduce(|a, b| a.union(b))
}

impl VectorLayer {
    fn clone_without_children(&self) -> Self {
        Self {
            id: self.id,
            width: self.width,
            height: self.height,
            alpha: self.alpha,
            children: Vec::new(),
        }
    }
}

impl GroupLayer {
    fn clone_without_children(&self) -> Self {
        Self {
            id: self.id,
            children: Vec::new(),
            pivot_x: self.pivot_x,
            pivot_y: self.pivot_y,
            rotation: self.rotation,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            translate_x: self.translate_x,
            translate_y: self.translate_y,
        }
    }
}

impl From<VectorLayer> for LayerNode {
    fn from(layer: VectorLayer) -> Self {
        LayerNode::VectorRoot(layer)
    }
}

impl From<GroupLayer> for LayerNode {
    fn from(layer: GroupLayer) -> Self {
        LayerNode::Group(layer)
    }
}

impl From<PathLayer> for LayerNode {
    fn from(layer: PathLayer) -> Self {
        LayerNode::Path(layer)
    }
}

impl From<ClipPathLayer> for LayerNode {
    fn from(layer: ClipPathLayer) -> Self {
        LayerNode::ClipPath(layer)
    }
}
