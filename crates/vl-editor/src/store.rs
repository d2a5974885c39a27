//! Editor state the gesture reads from and publishes to.
//!
//! The host owns the real stores; `EditorState` is a self-contained
//! implementation for embedding and tests.

use crate::selection::SelectionSet;
use vl_core::{LayerId, LayerTree};

/// Selection and hover state.
pub trait SelectionStore {
    fn selected_layers(&self) -> SelectionSet;
    fn set_selected_layers(&mut self, selection: SelectionSet);
    fn set_hovered_layer(&mut self, id: Option<LayerId>);
}

/// The published document tree.
pub trait TreeStore {
    fn vector_layer(&self) -> LayerTree;
    fn set_vector_layer(&mut self, tree: LayerTree);
}

/// In-memory selection + tree store.
#[derive(Debug, Clone)]
pub struct EditorState {
    tree: LayerTree,
    selection: SelectionSet,
    hovered: Option<LayerId>,
    /// Number of trees published through `set_vector_layer`.
    publish_count: usize,
}

impl EditorState {
    pub fn new(tree: LayerTree) -> Self {
        Self {
            tree,
            selection: SelectionSet::new(),
            hovered: None,
            publish_count: 0,
        }
    }

    pub fn tree(&self) -> &LayerTree {
        &self.tree
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn hovered(&self) -> Option<LayerId> {
        self.hovered
    }

    pub fn publish_count(&self) -> usize {
        self.publish_count
    }
}

impl SelectionStore for EditorState {
    fn selected_layers(&self) -> SelectionSet {
        self.selection.clone()
    }

    fn set_selected_layers(&mut self, selection: SelectionSet) {
        self.selection = selection;
    }

    fn set_hovered_layer(&mut self, id: Option<LayerId>) {
        self.hovered = id;
    }
}

impl TreeStore for EditorState {
    fn vector_layer(&self) -> LayerTree {
        self.tree.clone()
    }

    fn set_vector_layer(&mut self, tree: LayerTree) {
        self.publish_count += 1;
        self.tree = tree;
    }
}
