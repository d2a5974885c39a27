//! Layer selection.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use vl_core::LayerId;

/// A set of selected layer ids. Iterates in the order layers were added;
/// equality ignores order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSet(SmallVec<[LayerId; 4]>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(id: LayerId) -> Self {
        let mut set = Self::new();
        set.insert(id);
        set
    }

    /// Add `id`. Returns `false` if it was already selected.
    pub fn insert(&mut self, id: LayerId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.0.contains(&id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[LayerId] {
        &self.0
    }
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl Eq for SelectionSet {}

impl FromIterator<LayerId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = LayerId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Selection after pressing on layer `hit`.
///
/// Without the additive modifier, pressing an unselected layer selects only
/// that layer. Otherwise `hit` joins the current selection; pressing never
/// deselects, so a drag can start from any already-selected layer.
pub fn apply_click(current: &SelectionSet, hit: LayerId, additive: bool) -> SelectionSet {
    if !additive && !current.contains(hit) {
        return SelectionSet::single(hit);
    }
    let mut next = current.clone();
    next.insert(hit);
    next
}
