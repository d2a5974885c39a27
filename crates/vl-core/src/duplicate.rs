//! Subtree duplication with fresh ids.
//!
//! Each requested layer is deep-copied, every node of the copy gets a new
//! id, and the copy is inserted directly after the original in the same
//! parent. Layers that can't be duplicated are skipped; the rest proceed.

use crate::id::{IdAllocator, LayerId};
use crate::model::LayerNode;
use crate::tree::LayerTree;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of `duplicate_layers`.
#[derive(Debug, Clone)]
pub struct Duplication {
    /// The tree with all copies inserted.
    pub tree: LayerTree,
    /// `(original, copy)` for each duplicated top-level layer, in request order.
    pub copies: Vec<(LayerId, LayerId)>,
    /// Original id → copy id for every node of every copied subtree.
    pub id_map: HashMap<LayerId, LayerId>,
    /// Requested layers that were not duplicated (missing, or the root).
    pub skipped: Vec<LayerId>,
}

impl Duplication {
    pub fn copy_of(&self, id: LayerId) -> Option<LayerId> {
        self.id_map.get(&id).copied()
    }
}

/// Duplicate `ids` within `tree`.
///
/// Layers nested under another requested layer are not copied twice; they
/// are reachable through `id_map` inside their ancestor's copy.
pub fn duplicate_layers(tree: &LayerTree, ids: &[LayerId]) -> Duplication {
    let mut alloc = IdAllocator::new(tree.ids());
    let mut current = tree.clone();
    let mut copies = Vec::new();
    let mut id_map = HashMap::new();
    let mut skipped = Vec::new();

    for id in tree.top_level(ids) {
        let Some((parent, index)) = current.parent_of(id) else {
            log::warn!("duplicate: layer {id} not found or is the root, skipping");
            skipped.push(id);
            continue;
        };
        let parent_id = parent.id();
        let Some(source) = current.find(id).map(Arc::clone) else {
            skipped.push(id);
            continue;
        };

        let mut subtree_map = HashMap::new();
        let copy = deep_copy(&source, &mut alloc, &mut subtree_map);
        let copy_id = copy.id();
        match current.insert_layer(parent_id, index + 1, copy) {
            Ok(next) => {
                log::debug!("duplicate: {id} -> {copy_id} under {parent_id} at {}", index + 1);
                current = next;
                copies.push((id, copy_id));
                id_map.extend(subtree_map);
            }
            Err(err) => {
                log::warn!("duplicate: could not insert copy of {id}: {err}");
                skipped.push(id);
            }
        }
    }

    Duplication {
        tree: current,
        copies,
        id_map,
        skipped,
    }
}

fn deep_copy(
    node: &LayerNode,
    alloc: &mut IdAllocator,
    id_map: &mut HashMap<LayerId, LayerId>,
) -> LayerNode {
    let new_id = alloc.fresh(node.id());
    id_map.insert(node.id(), new_id);
    let renamed = node.with_id(new_id);
    match node.children() {
        Some(children) => {
            let copied = children
                .iter()
                .map(|child| Arc::new(deep_copy(child, alloc, id_map)))
                .collect();
            renamed.with_children(copied)
        }
        None => renamed,
    }
}
