use crate::id::LayerId;
use thiserror::Error;

/// Errors produced by layer-tree operations and path-data parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    #[error("layer `{0}` not found")]
    NotFound(LayerId),

    #[error("layer id `{0}` is already used in this tree")]
    DuplicateId(LayerId),

    /// The tree must have exactly one vector root, at the top.
    #[error("the vector root must be the tree root and appear exactly once (at `{0}`)")]
    InvalidRoot(LayerId),

    #[error("layer `{0}` cannot hold children")]
    NotAContainer(LayerId),

    #[error("child index {index} is out of bounds for `{parent}` ({len} children)")]
    IndexOutOfBounds {
        parent: LayerId,
        index: usize,
        len: usize,
    },

    #[error("invalid path data at offset {offset}: {message}")]
    PathData { offset: usize, message: String },
}
