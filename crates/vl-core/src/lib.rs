pub mod duplicate;
pub mod error;
pub mod id;
pub mod model;
pub mod path;
pub mod tree;

pub use duplicate::{Duplication, duplicate_layers};
pub use error::LayerError;
pub use id::{IdAllocator, LayerId};
pub use model::*;
pub use path::PathData;
pub use tree::LayerTree;

// Re-export kurbo geometry so downstream crates share one version.
pub use kurbo::{Affine, Point, Rect, Vec2};
