//! Select / drag / clone gesture.
//!
//! Pressing on a layer selects it; dragging moves every selected layer by
//! the pointer delta, each in its own coordinate frame. Holding the
//! duplicate modifier when the drag starts moves copies instead.
//!
//! ## Modifier behaviors
//!
//! | Binding | Default | Effect |
//! |---------|---------|--------|
//! | `additive_select` | Shift | Pressed layer joins the selection |
//! | `angle_snap` | Shift | Drag direction snaps to `angle_snap_degrees` |
//! | `duplicate` | Alt | Copies are dragged, originals stay (read at first move) |
//!
//! Every move rebuilds the document from the tree captured at pointer-down
//! plus the cumulative delta, so replaying a position always publishes the
//! same tree.

use crate::config::GestureConfig;
use crate::input::{InputEvent, Modifiers};
use crate::mapping::{ItemFrame, ItemLookup, TreeItemLookup, snap_vector_to_angle};
use crate::selection::{SelectionSet, apply_click};
use crate::snap::{DragSample, NoSnap, SnapAdviser, SnapInfo};
use crate::store::{SelectionStore, TreeStore};
use kurbo::Point;
use vl_core::{LayerId, LayerTree, duplicate_layers};

/// A selected layer and the frame it was captured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturedItem {
    pub id: LayerId,
    pub frame: ItemFrame,
}

/// Everything a press-drag-release needs to remember.
#[derive(Debug, Clone)]
pub struct GestureSession {
    pub hit_layer: LayerId,
    /// Pointer-down position in canvas space.
    pub down_point: Point,
    /// Tree every move is derived from. Replaced once if the drag clones.
    pub initial_tree: LayerTree,
    pub initial_selection: SelectionSet,
    /// Top-level selected layers that will move.
    pub items: Vec<CapturedItem>,
    /// Whether this drag moves copies.
    pub duplicated: bool,
}

impl GestureSession {
    pub fn item_ids(&self) -> Vec<LayerId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Anchor of the pressed layer, or of the first item when the pressed
    /// layer isn't moving itself (a copy, or covered by a selected group).
    pub fn anchor(&self) -> Option<Point> {
        self.items
            .iter()
            .find(|item| item.id == self.hit_layer)
            .or_else(|| self.items.first())
            .map(|item| item.frame.anchor)
    }
}

#[derive(Debug, Clone, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pointer is down on a layer but hasn't moved yet.
    Armed(GestureSession),
    Dragging(GestureSession),
}

impl GestureState {
    fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Armed(_) => "armed",
            GestureState::Dragging(_) => "dragging",
        }
    }
}

pub struct GestureController<L = TreeItemLookup, A = NoSnap> {
    config: GestureConfig,
    lookup: L,
    snapper: A,
    state: GestureState,
    snap_info: SnapInfo,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self::with_parts(GestureConfig::default(), TreeItemLookup, NoSnap)
    }
}

impl<L: ItemLookup, A: SnapAdviser> GestureController<L, A> {
    pub fn with_parts(config: GestureConfig, lookup: L, snapper: A) -> Self {
        Self {
            config,
            lookup,
            snapper,
            state: GestureState::Idle,
            snap_info: SnapInfo::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn session(&self) -> Option<&GestureSession> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Armed(session) | GestureState::Dragging(session) => Some(session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// Guides reported for the latest move.
    pub fn snap_info(&self) -> &SnapInfo {
        &self.snap_info
    }

    /// Dispatch one input event. `hit` is the layer under the pointer, as
    /// resolved by the host. Returns `true` if a tree was published.
    pub fn handle<S>(&mut self, store: &mut S, event: &InputEvent, hit: Option<LayerId>) -> bool
    where
        S: SelectionStore + TreeStore + ?Sized,
    {
        match *event {
            InputEvent::PointerDown { x, y, modifiers } => {
                match hit {
                    Some(hit) => self.on_pointer_down(store, hit, Point::new(x, y), modifiers),
                    None => log::debug!("gesture: pointer-down on empty canvas ignored"),
                }
                false
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                self.on_pointer_drag(store, Point::new(x, y), modifiers)
            }
            InputEvent::PointerUp { .. } => {
                self.on_pointer_up();
                false
            }
            InputEvent::Cancel => {
                self.cancel();
                false
            }
        }
    }

    pub fn on_pointer_down<S>(&mut self, store: &mut S, hit: LayerId, point: Point, modifiers: Modifiers)
    where
        S: SelectionStore + TreeStore + ?Sized,
    {
        if !matches!(self.state, GestureState::Idle) {
            log::debug!("gesture: pointer-down while {}, discarding session", self.state.name());
            self.state = GestureState::Idle;
        }

        store.set_hovered_layer(None);

        let additive = self.config.additive_select.is_held(modifiers);
        let selection = apply_click(&store.selected_layers(), hit, additive);
        store.set_selected_layers(selection.clone());

        let tree = store.vector_layer();
        let items = self.capture(&tree, &tree.top_level(selection.as_slice()));
        let ids: Vec<LayerId> = items.iter().map(|item| item.id).collect();
        self.snapper.begin(&tree, &ids);
        self.snap_info = SnapInfo::default();

        log::debug!(
            "gesture: armed on {hit} at ({}, {}) with {} item(s)",
            point.x,
            point.y,
            items.len()
        );
        self.state = GestureState::Armed(GestureSession {
            hit_layer: hit,
            down_point: point,
            initial_tree: tree,
            initial_selection: selection,
            items,
            duplicated: false,
        });
    }

    /// Move the selection so it sits `point - down_point` from where it
    /// started. Returns `true` if a tree was published.
    pub fn on_pointer_drag<S>(&mut self, store: &mut S, point: Point, modifiers: Modifiers) -> bool
    where
        S: SelectionStore + TreeStore + ?Sized,
    {
        let mut session = match std::mem::take(&mut self.state) {
            GestureState::Idle => return false,
            GestureState::Armed(mut session) => {
                if self.config.duplicate.is_held(modifiers) {
                    self.duplicate_items(store, &mut session);
                }
                log::debug!("gesture: dragging {} item(s)", session.items.len());
                session
            }
            GestureState::Dragging(session) => session,
        };

        let sample = DragSample {
            down: session.down_point,
            point,
            anchor: session.anchor(),
            modifiers,
        };
        self.snapper.on_pointer_event(&sample);
        self.snap_info = self.snapper.snap_info();
        if !self.snap_info.is_empty() {
            log::trace!("gesture: snap {:?}", self.snap_info);
        }

        let snap_angle = self.config.angle_snap.is_held(modifiers);
        let (tree, dropped) = self.translate_items(&session, point, snap_angle);
        if !dropped.is_empty() {
            session.items.retain(|item| !dropped.contains(&item.id));
        }
        store.set_vector_layer(tree);

        self.state = GestureState::Dragging(session);
        true
    }

    /// End the gesture. The last published tree stands.
    pub fn on_pointer_up(&mut self) {
        if let Some(session) = self.session() {
            log::debug!(
                "gesture: released {} (duplicated: {})",
                session.hit_layer,
                session.duplicated
            );
        }
        self.reset();
    }

    /// Abort the gesture without rolling back what was published.
    pub fn cancel(&mut self) {
        if !matches!(self.state, GestureState::Idle) {
            log::debug!("gesture: cancelled while {}", self.state.name());
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.snap_info = SnapInfo::default();
    }

    fn capture(&self, tree: &LayerTree, ids: &[LayerId]) -> Vec<CapturedItem> {
        ids.iter()
            .filter_map(|&id| match self.lookup.find_item(tree, id) {
                Some(frame) => Some(CapturedItem { id, frame }),
                None => {
                    log::warn!("gesture: no item for selected layer {id}, it will not move");
                    None
                }
            })
            .collect()
    }

    /// Swap the session over to copies of its items.
    fn duplicate_items<S>(&mut self, store: &mut S, session: &mut GestureSession)
    where
        S: SelectionStore + TreeStore + ?Sized,
    {
        let dup = duplicate_layers(&session.initial_tree, &session.item_ids());
        if dup.copies.is_empty() {
            log::warn!("gesture: nothing could be duplicated, dragging originals");
            return;
        }

        session.items = session
            .items
            .iter()
            .filter_map(|item| {
                dup.copy_of(item.id).map(|copy| CapturedItem {
                    id: copy,
                    frame: item.frame,
                })
            })
            .collect();
        let selection: SelectionSet = session
            .initial_selection
            .iter()
            .filter_map(|id| dup.copy_of(id))
            .collect();
        session.initial_tree = dup.tree;
        session.duplicated = true;

        self.snapper.begin(&session.initial_tree, &session.item_ids());
        store.set_selected_layers(selection);
        log::debug!("gesture: duplicated {:?}", dup.copies);
    }

    /// Build the tree for `point` from the session's initial tree. Also
    /// returns the items that could not be placed.
    fn translate_items(
        &self,
        session: &GestureSession,
        point: Point,
        snap_angle: bool,
    ) -> (LayerTree, Vec<LayerId>) {
        let mut tree = session.initial_tree.clone();
        let mut dropped = Vec::new();

        for item in &session.items {
            let mut delta = item.frame.local_delta(session.down_point, point);
            if snap_angle {
                delta = snap_vector_to_angle(delta, self.config.angle_snap_degrees);
            }
            // Lookups may resolve ids the tree doesn't hold.
            let Some(node) = session.initial_tree.find(item.id) else {
                log::warn!("gesture: layer {} not in the tree, skipping", item.id);
                dropped.push(item.id);
                continue;
            };
            let Some(moved) = node.translated(delta) else {
                log::trace!("gesture: {} cannot be translated", item.id);
                continue;
            };
            match tree.replace_layer(item.id, moved) {
                Ok(next) => {
                    log::trace!("gesture: {} by ({}, {})", item.id, delta.x, delta.y);
                    tree = next;
                }
                Err(err) => {
                    log::warn!("gesture: could not move {}: {err}", item.id);
                    dropped.push(item.id);
                }
            }
        }

        (tree, dropped)
    }
}
