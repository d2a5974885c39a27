pub mod config;
pub mod gesture;
pub mod input;
pub mod mapping;
pub mod selection;
pub mod snap;
pub mod store;

pub use config::{GestureConfig, ModifierKey};
pub use gesture::{CapturedItem, GestureController, GestureSession, GestureState};
pub use input::{InputEvent, Modifiers};
pub use mapping::{ItemFrame, ItemLookup, TreeItemLookup, snap_vector_to_angle};
pub use selection::{SelectionSet, apply_click};
pub use snap::{DragSample, Guide, GuideSnapper, NoSnap, SnapAdviser, SnapInfo};
pub use store::{EditorState, SelectionStore, TreeStore};
