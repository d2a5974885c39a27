//! Integration tests: select / drag / clone gesture (vl-editor).
//!
//! Drives `GestureController` with pointer events against an in-memory
//! `EditorState` and checks the published trees and selections.

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use vl_core::{
    ClipPathLayer, GroupLayer, LayerId, LayerNode, LayerTree, PathData, PathLayer, Point, Rect,
    VectorLayer,
};
use vl_editor::{
    EditorState, GestureConfig, GestureController, GuideSnapper, InputEvent, ItemFrame,
    ItemLookup, Modifiers, NoSnap, SelectionSet, SelectionStore, TreeItemLookup,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(s: &str) -> LayerId {
    LayerId::intern(s)
}

fn path(name: &str, d: &str) -> PathLayer {
    PathLayer::new(id(name), PathData::parse(d).unwrap())
}

/// root
/// ├── l1      square at the origin
/// ├── shifted group translated by (20, 30)
/// │   └── inner
/// ├── spin    group rotated 90°
/// │   └── arm
/// └── mask    clip path
fn document() -> LayerTree {
    let shifted = GroupLayer::new(id("shifted"))
        .with_translation(20.0, 30.0)
        .with_child(path("inner", "M 0 0 L 5 5"));
    let mut spin = GroupLayer::new(id("spin"));
    spin.rotation = 90.0;
    let spin = spin.with_child(path("arm", "M 0 0 L 1 0"));
    let mask = ClipPathLayer::new(
        id("mask"),
        PathData::parse("M 60 60 L 70 60 L 70 70 Z").unwrap(),
    );

    let root = VectorLayer::new(id("doc"), 100.0, 100.0)
        .with_child(path("l1", "M 0 0 L 10 0 L 10 10 Z"))
        .with_child(shifted)
        .with_child(spin)
        .with_child(mask);
    LayerTree::new(root).unwrap()
}

fn path_text(tree: &LayerTree, name: &str) -> String {
    match &**tree.find(id(name)).unwrap() {
        LayerNode::Path(p) => p.path_data.to_string(),
        LayerNode::ClipPath(c) => c.path_data.to_string(),
        other => panic!("{name} has no path data: {other:?}"),
    }
}

fn assert_rect_near(actual: Rect, expected: Rect) {
    let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
    assert!(
        close(actual.x0, expected.x0)
            && close(actual.y0, expected.y0)
            && close(actual.x1, expected.x1)
            && close(actual.y1, expected.y1),
        "{actual:?} != {expected:?}"
    );
}

fn down(x: f64, y: f64) -> InputEvent {
    InputEvent::from_pointer_down(x, y, Modifiers::NONE)
}

fn drag(x: f64, y: f64) -> InputEvent {
    InputEvent::from_pointer_move(x, y, Modifiers::NONE)
}

fn up(x: f64, y: f64) -> InputEvent {
    InputEvent::from_pointer_up(x, y, Modifiers::NONE)
}

// ─── Moving ─────────────────────────────────────────────────────────────

#[test]
fn drag_path_end_to_end() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    assert!(!gesture.handle(&mut store, &down(5.0, 5.0), Some(id("l1"))));
    assert!(gesture.handle(&mut store, &drag(10.0, 5.0), None));
    assert!(gesture.handle(&mut store, &drag(15.0, 5.0), None));
    assert!(!gesture.handle(&mut store, &up(15.0, 5.0), None));

    assert_eq!(path_text(store.tree(), "l1"), "M 10 0 L 20 0 L 20 10 Z");
    assert_eq!(store.selection(), &SelectionSet::single(id("l1")));
    assert_eq!(store.publish_count(), 2);
    assert!(gesture.session().is_none());
}

#[test]
fn untouched_layers_are_shared_with_the_initial_tree() {
    init_logging();
    let before = document();
    let mut store = EditorState::new(before.clone());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(0.0, 0.0), Some(id("l1")));
    gesture.handle(&mut store, &drag(4.0, 0.0), None);

    let after = store.tree();
    assert!(std::sync::Arc::ptr_eq(
        before.find(id("shifted")).unwrap(),
        after.find(id("shifted")).unwrap()
    ));
    assert!(!std::sync::Arc::ptr_eq(before.root(), after.root()));
}

#[test]
fn translated_group_child_moves_by_the_canvas_delta() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(22.0, 32.0), Some(id("inner")));
    gesture.handle(&mut store, &drag(32.0, 32.0), None);

    assert_eq!(path_text(store.tree(), "inner"), "M 10 0 L 15 5");
}

#[test]
fn rotated_group_child_moves_in_its_parent_frame() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    // Canvas (0, 10) is (10, 0) inside a group rotated by 90°.
    gesture.handle(&mut store, &down(0.0, 0.0), Some(id("arm")));
    gesture.handle(&mut store, &drag(0.0, 10.0), None);

    let tree = store.tree();
    let local = tree.find(id("arm")).unwrap().bounds().unwrap();
    assert_rect_near(local, Rect::new(10.0, 0.0, 11.0, 0.0));
    let global = tree.global_bounds(id("arm")).unwrap();
    assert_rect_near(global, Rect::new(0.0, 10.0, 0.0, 11.0));
}

#[test]
fn group_drag_updates_translation() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(21.0, 31.0), Some(id("shifted")));
    gesture.handle(&mut store, &drag(24.0, 27.0), None);

    match &**store.tree().find(id("shifted")).unwrap() {
        LayerNode::Group(g) => assert_eq!((g.translate_x, g.translate_y), (23.0, 26.0)),
        other => panic!("expected group, got {other:?}"),
    }
    assert_eq!(path_text(store.tree(), "inner"), "M 0 0 L 5 5");
}

#[test]
fn multi_selection_moves_every_item() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(5.0, 5.0), Some(id("l1")));
    gesture.handle(&mut store, &up(5.0, 5.0), None);
    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_down(65.0, 65.0, Modifiers::SHIFT),
        Some(id("mask")),
    );
    assert_eq!(
        store.selection(),
        &[id("l1"), id("mask")].into_iter().collect::<SelectionSet>()
    );

    gesture.handle(&mut store, &drag(65.0, 75.0), None);
    assert_eq!(path_text(store.tree(), "l1"), "M 0 10 L 10 10 L 10 20 Z");
    assert_eq!(path_text(store.tree(), "mask"), "M 60 70 L 70 70 L 70 80 Z");
}

#[test]
fn angle_snap_keeps_length_and_aligns_to_axis() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(0.0, 0.0), Some(id("l1")));
    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_move(3.0, 4.0, Modifiers::SHIFT),
        None,
    );
    assert_eq!(path_text(store.tree(), "l1"), "M 0 5 L 10 5 L 10 15 Z");

    // Releasing shift mid-drag goes back to the raw delta.
    gesture.handle(&mut store, &drag(3.0, 4.0), None);
    assert_eq!(path_text(store.tree(), "l1"), "M 3 4 L 13 4 L 13 14 Z");
}

#[test]
fn replaying_a_position_publishes_an_equal_tree() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(5.0, 5.0), Some(id("l1")));
    gesture.handle(&mut store, &drag(15.0, 5.0), None);
    let first = store.tree().clone();

    gesture.handle(&mut store, &drag(40.0, -12.0), None);
    assert_ne!(*store.tree(), first);
    gesture.handle(&mut store, &drag(15.0, 5.0), None);
    assert_eq!(*store.tree(), first);
}

#[test]
fn cancel_without_moving_leaves_the_tree_alone() {
    init_logging();
    let before = document();
    let mut store = EditorState::new(before.clone());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(5.0, 5.0), Some(id("l1")));
    gesture.handle(&mut store, &InputEvent::Cancel, None);

    assert_eq!(*store.tree(), before);
    assert_eq!(store.publish_count(), 0);
    assert_eq!(store.selection(), &SelectionSet::single(id("l1")));
}

#[test]
fn selected_root_does_not_hold_back_other_layers() {
    init_logging();
    let mut store = EditorState::new(document());
    store.set_selected_layers(SelectionSet::single(id("doc")));
    let mut gesture = GestureController::new();

    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_down(5.0, 5.0, Modifiers::SHIFT),
        Some(id("l1")),
    );
    assert_eq!(gesture.session().unwrap().item_ids(), vec![id("doc"), id("l1")]);

    gesture.handle(&mut store, &drag(15.0, 5.0), None);
    assert_eq!(path_text(store.tree(), "l1"), "M 10 0 L 20 0 L 20 10 Z");
    assert_eq!(path_text(store.tree(), "mask"), "M 60 60 L 70 60 L 70 70 Z");
}

// ─── Cloning ────────────────────────────────────────────────────────────

#[test]
fn alt_drag_moves_a_copy_and_selects_it() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(5.0, 5.0), Some(id("l1")));
    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_move(15.0, 5.0, Modifiers::ALT),
        None,
    );
    gesture.handle(&mut store, &up(15.0, 5.0), None);

    let tree = store.tree();
    assert_eq!(path_text(tree, "l1"), "M 0 0 L 10 0 L 10 10 Z");
    assert_eq!(path_text(tree, "l1_copy"), "M 10 0 L 20 0 L 20 10 Z");
    assert_eq!(store.selection(), &SelectionSet::single(id("l1_copy")));

    // The copy sits directly above the original.
    let order: Vec<LayerId> = tree
        .root()
        .children()
        .unwrap()
        .iter()
        .map(|c| c.id())
        .collect();
    assert_eq!(
        order,
        vec![id("l1"), id("l1_copy"), id("shifted"), id("spin"), id("mask")]
    );
}

#[test]
fn alt_drag_of_a_group_copies_its_subtree() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(22.0, 32.0), Some(id("shifted")));
    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_move(22.0, 42.0, Modifiers::ALT),
        None,
    );

    let tree = store.tree();
    match &**tree.find(id("shifted_copy")).unwrap() {
        LayerNode::Group(g) => {
            assert_eq!((g.translate_x, g.translate_y), (20.0, 40.0));
            assert_eq!(g.children[0].id(), id("inner_copy"));
        }
        other => panic!("expected group, got {other:?}"),
    }
    match &**tree.find(id("shifted")).unwrap() {
        LayerNode::Group(g) => assert_eq!((g.translate_x, g.translate_y), (20.0, 30.0)),
        other => panic!("expected group, got {other:?}"),
    }
}

#[test]
fn alt_drag_with_root_selected_copies_the_other_layers() {
    init_logging();
    let mut store = EditorState::new(document());
    store.set_selected_layers(SelectionSet::single(id("doc")));
    let mut gesture = GestureController::new();

    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_down(5.0, 5.0, Modifiers::SHIFT),
        Some(id("l1")),
    );
    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_move(15.0, 5.0, Modifiers::ALT),
        None,
    );

    let tree = store.tree();
    assert!(gesture.session().unwrap().duplicated);
    assert_eq!(path_text(tree, "l1"), "M 0 0 L 10 0 L 10 10 Z");
    assert_eq!(path_text(tree, "l1_copy"), "M 10 0 L 20 0 L 20 10 Z");
    assert_eq!(store.selection(), &SelectionSet::single(id("l1_copy")));
    assert!(tree.validate().is_ok());
}

#[test]
fn clone_keeps_ids_unique_and_originals_present() {
    init_logging();
    let before = document();
    let pre: HashSet<LayerId> = before.ids().into_iter().collect();
    let mut store = EditorState::new(before);
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(5.0, 5.0), Some(id("l1")));
    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_down(65.0, 65.0, Modifiers::SHIFT),
        Some(id("mask")),
    );
    for x in [10.0, 20.0, 30.0] {
        gesture.handle(
            &mut store,
            &InputEvent::from_pointer_move(x, 65.0, Modifiers::ALT),
            None,
        );
        let ids = store.tree().ids();
        let unique: HashSet<LayerId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate ids after move to {x}");
        assert!(pre.is_subset(&unique));
        assert!(store.tree().validate().is_ok());
    }
    assert_eq!(store.tree().ids().len(), pre.len() + 2);
    assert_eq!(
        store.selection(),
        &[id("l1_copy"), id("mask_copy")].into_iter().collect::<SelectionSet>()
    );
}

#[test]
fn replaying_a_position_after_clone_is_stable() {
    init_logging();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::new();

    gesture.handle(&mut store, &down(0.0, 0.0), Some(id("l1")));
    gesture.handle(
        &mut store,
        &InputEvent::from_pointer_move(5.0, 0.0, Modifiers::ALT),
        None,
    );
    let first = store.tree().clone();
    gesture.handle(&mut store, &drag(9.0, 9.0), None);
    gesture.handle(&mut store, &drag(5.0, 0.0), None);

    assert_eq!(*store.tree(), first);
    assert!(store.tree().find(id("l1_copy_2")).is_none());
}

// ─── Collaborators ──────────────────────────────────────────────────────

/// Resolves every layer except one.
struct HidingLookup(LayerId);

impl ItemLookup for HidingLookup {
    fn find_item(&self, tree: &LayerTree, id: LayerId) -> Option<ItemFrame> {
        if id == self.0 {
            return None;
        }
        TreeItemLookup.find_item(tree, id)
    }
}

#[test]
fn unresolved_items_are_skipped() {
    init_logging();
    let mut store = EditorState::new(document());
    store.set_selected_layers(SelectionSet::single(id("mask")));
    let mut gesture =
        GestureController::with_parts(GestureConfig::default(), HidingLookup(id("mask")), NoSnap);

    gesture.on_pointer_down(&mut store, id("l1"), Point::ZERO, Modifiers::SHIFT);
    assert_eq!(gesture.session().unwrap().item_ids(), vec![id("l1")]);

    gesture.on_pointer_drag(&mut store, Point::new(1.0, 1.0), Modifiers::NONE);
    assert_eq!(path_text(store.tree(), "l1"), "M 1 1 L 11 1 L 11 11 Z");
    assert_eq!(path_text(store.tree(), "mask"), "M 60 60 L 70 60 L 70 70 Z");
}

/// Frames every id with the identity transform, whether or not the tree
/// holds it.
struct EagerLookup;

impl ItemLookup for EagerLookup {
    fn find_item(&self, _tree: &LayerTree, _id: LayerId) -> Option<ItemFrame> {
        ItemFrame::new(vl_core::Affine::IDENTITY, Point::ZERO)
    }
}

#[test]
fn items_missing_from_the_tree_are_dropped_mid_drag() {
    init_logging();
    let mut store = EditorState::new(document());
    store.set_selected_layers(SelectionSet::single(id("l1")));
    let mut gesture = GestureController::with_parts(GestureConfig::default(), EagerLookup, NoSnap);

    gesture.on_pointer_down(&mut store, id("ghost"), Point::ZERO, Modifiers::SHIFT);
    assert_eq!(gesture.session().unwrap().item_ids(), vec![id("l1"), id("ghost")]);

    assert!(gesture.on_pointer_drag(&mut store, Point::new(2.0, 3.0), Modifiers::NONE));
    assert_eq!(path_text(store.tree(), "l1"), "M 2 3 L 12 3 L 12 13 Z");
    assert!(!store.tree().contains(id("ghost")));
    assert_eq!(gesture.session().unwrap().item_ids(), vec![id("l1")]);
}

#[test]
fn guides_never_change_the_result() {
    init_logging();
    let mut plain_store = EditorState::new(document());
    let mut plain = GestureController::new();
    let mut guided_store = EditorState::new(document());
    let mut guided = GestureController::with_parts(
        GestureConfig::default(),
        TreeItemLookup,
        GuideSnapper::default(),
    );

    plain.handle(&mut plain_store, &down(0.0, 0.0), Some(id("l1")));
    plain.handle(&mut plain_store, &drag(58.5, 0.0), None);
    guided.handle(&mut guided_store, &down(0.0, 0.0), Some(id("l1")));
    guided.handle(&mut guided_store, &drag(58.5, 0.0), None);

    assert!(!guided.snap_info().vertical.is_empty());
    assert!(plain.snap_info().is_empty());
    assert_eq!(guided_store.tree(), plain_store.tree());
}

#[test]
fn custom_bindings_come_from_config() {
    init_logging();
    let config: GestureConfig =
        serde_json::from_str(r#"{ "duplicate": "ctrl", "angle_snap_degrees": 45.0 }"#).unwrap();
    let mut store = EditorState::new(document());
    let mut gesture = GestureController::with_parts(config, TreeItemLookup, NoSnap);

    gesture.handle(&mut store, &down(0.0, 0.0), Some(id("l1")));
    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    gesture.handle(&mut store, &InputEvent::from_pointer_move(3.0, 0.0, ctrl), None);

    assert!(gesture.session().unwrap().duplicated);
    assert_eq!(path_text(store.tree(), "l1"), "M 0 0 L 10 0 L 10 10 Z");
    assert_eq!(path_text(store.tree(), "l1_copy"), "M 3 0 L 13 0 L 13 10 Z");
}
