//! Persistent layer tree.
//!
//! A `LayerTree` is an immutable value. Edits return a new tree that
//! path-copies the nodes from the root down to the edited layer and shares
//! every other subtree with the source tree, so an edit costs O(depth) node
//! copies and earlier trees stay valid for readers holding them.

use crate::error::LayerError;
use crate::id::LayerId;
use crate::model::{LayerNode, VectorLayer};
use kurbo::{Affine, Rect};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct LayerTree {
    root: Arc<LayerNode>,
}

impl LayerTree {
    /// Build a tree from its root, checking id uniqueness and root placement.
    pub fn new(root: VectorLayer) -> Result<Self, LayerError> {
        let tree = Self {
            root: Arc::new(LayerNode::VectorRoot(root)),
        };
        tree.validate()?;
        Ok(tree)
    }

    pub fn root(&self) -> &Arc<LayerNode> {
        &self.root
    }

    pub fn root_id(&self) -> LayerId {
        self.root.id()
    }

    /// Check the tree invariants: a vector root at the top and nowhere else,
    /// and no id used twice.
    pub fn validate(&self) -> Result<(), LayerError> {
        if !matches!(*self.root, LayerNode::VectorRoot(_)) {
            return Err(LayerError::InvalidRoot(self.root.id()));
        }
        let mut seen = HashSet::new();
        for node in self.layers() {
            if !seen.insert(node.id()) {
                return Err(LayerError::DuplicateId(node.id()));
            }
            if !Arc::ptr_eq(node, &self.root) && matches!(**node, LayerNode::VectorRoot(_)) {
                return Err(LayerError::InvalidRoot(node.id()));
            }
        }
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Pre-order walk over every layer, root first.
    pub fn layers(&self) -> Layers<'_> {
        Layers {
            stack: vec![&self.root],
        }
    }

    /// All ids in pre-order.
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers().map(|n| n.id()).collect()
    }

    pub fn find(&self, id: LayerId) -> Option<&Arc<LayerNode>> {
        self.layers().find(|n| n.id() == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.find(id).is_some()
    }

    /// The chain of containers from the root down to the parent of `id`.
    /// Empty for the root itself; `None` if `id` is not in the tree.
    pub fn ancestors(&self, id: LayerId) -> Option<Vec<&Arc<LayerNode>>> {
        let mut chain = Vec::new();
        path_to(&self.root, id, &mut chain).then_some(chain)
    }

    /// The parent of `id` and the index of `id` among its children.
    pub fn parent_of(&self, id: LayerId) -> Option<(&Arc<LayerNode>, usize)> {
        let chain = self.ancestors(id)?;
        let parent = *chain.last()?;
        let index = parent.children()?.iter().position(|c| c.id() == id)?;
        Some((parent, index))
    }

    /// Composition of every ancestor's transform: maps coordinates in the
    /// frame `id` lives in (its parent's frame) to canvas coordinates.
    pub fn ancestor_transform(&self, id: LayerId) -> Option<Affine> {
        let chain = self.ancestors(id)?;
        Some(
            chain
                .iter()
                .fold(Affine::IDENTITY, |acc, node| acc * node.local_transform()),
        )
    }

    /// Bounds of `id` in canvas coordinates.
    pub fn global_bounds(&self, id: LayerId) -> Option<Rect> {
        let local = self.find(id)?.bounds()?;
        Some(self.ancestor_transform(id)?.transform_rect_bbox(local))
    }

    /// Reduce `ids` to the ones with no ancestor also in `ids`, keeping order
    /// and dropping repeats. Ids absent from the tree are kept as-is.
    ///
    /// The root never covers its descendants: it can't be moved or copied,
    /// so a listed root is kept alongside the layers under it.
    pub fn top_level(&self, ids: &[LayerId]) -> Vec<LayerId> {
        let wanted: HashSet<LayerId> = ids.iter().copied().collect();
        let mut seen = HashSet::new();
        ids.iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .filter(|id| {
                self.ancestors(*id).is_none_or(|chain| {
                    !chain.iter().any(|ancestor| {
                        !Arc::ptr_eq(ancestor, &self.root) && wanted.contains(&ancestor.id())
                    })
                })
            })
            .collect()
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Return a tree identical to this one except that layer `id` is `node`.
    ///
    /// Ancestors of `id` are rebuilt; all other subtrees are shared. The
    /// replacement keeps the tree valid: the root can only be replaced by a
    /// vector root, nothing else can be, and a replacement with a different
    /// id may not reuse an id present elsewhere. The replacement's own
    /// children are trusted as given.
    pub fn replace_layer(&self, id: LayerId, node: LayerNode) -> Result<LayerTree, LayerError> {
        let is_root = id == self.root.id();
        let new_is_root = matches!(node, LayerNode::VectorRoot(_));
        if is_root != new_is_root {
            return Err(LayerError::InvalidRoot(node.id()));
        }
        if node.id() != id && self.contains(node.id()) {
            return Err(LayerError::DuplicateId(node.id()));
        }

        let replacement = Arc::new(node);
        let root = rebuild(&self.root, id, &mut |_| Arc::clone(&replacement))
            .ok_or(LayerError::NotFound(id))?;
        Ok(LayerTree { root })
    }

    /// Return a tree with `node` inserted as child `index` of `parent`.
    ///
    /// Every id in the inserted subtree must be new to this tree.
    pub fn insert_layer(
        &self,
        parent: LayerId,
        index: usize,
        node: LayerNode,
    ) -> Result<LayerTree, LayerError> {
        let target = self.find(parent).ok_or(LayerError::NotFound(parent))?;
        let len = target
            .children()
            .ok_or(LayerError::NotAContainer(parent))?
            .len();
        if index > len {
            return Err(LayerError::IndexOutOfBounds { parent, index, len });
        }

        let inserted = Arc::new(node);
        let existing: HashSet<LayerId> = self.ids().into_iter().collect();
        let mut fresh = HashSet::new();
        for layer in (Layers {
            stack: vec![&inserted],
        }) {
            if matches!(**layer, LayerNode::VectorRoot(_)) {
                return Err(LayerError::InvalidRoot(layer.id()));
            }
            if existing.contains(&layer.id()) || !fresh.insert(layer.id()) {
                return Err(LayerError::DuplicateId(layer.id()));
            }
        }

        let root = rebuild(&self.root, parent, &mut |container| {
            let mut children = container.children().unwrap_or_default().to_vec();
            children.insert(index, Arc::clone(&inserted));
            Arc::new(container.with_children(children))
        })
        .ok_or(LayerError::NotFound(parent))?;
        Ok(LayerTree { root })
    }
}

/// Path-copy `node` down to layer `id`, replacing it with `edit(old)`.
/// Returns `None` when `id` is not under `node`.
fn rebuild(
    node: &Arc<LayerNode>,
    id: LayerId,
    edit: &mut dyn FnMut(&Arc<LayerNode>) -> Arc<LayerNode>,
) -> Option<Arc<LayerNode>> {
    if node.id() == id {
        return Some(edit(node));
    }
    let children = node.children()?;
    for (i, child) in children.iter().enumerate() {
        if let Some(updated) = rebuild(child, id, edit) {
            let mut next = children.to_vec();
            next[i] = updated;
            return Some(Arc::new(node.with_children(next)));
        }
    }
    None
}

fn path_to<'a>(node: &'a Arc<LayerNode>, id: LayerId, chain: &mut Vec<&'a Arc<LayerNode>>) -> bool {
    if node.id() == id {
        return true;
    }
    if let Some(children) = node.children() {
        chain.push(node);
        if children.iter().any(|c| path_to(c, id, chain)) {
            return true;
        }
        chain.pop();
    }
    false
}

/// Pre-order iterator over a subtree.
pub struct Layers<'a> {
    stack: Vec<&'a Arc<LayerNode>>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = &'a Arc<LayerNode>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
