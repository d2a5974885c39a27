//! Gesture configuration.
//!
//! Hosts usually load this from their settings file; every field has a
//! default, so partial documents are fine.

use crate::input::Modifiers;
use serde::{Deserialize, Serialize};

/// A single modifier key that can be bound to a gesture behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKey {
    pub fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            ModifierKey::Shift => modifiers.shift,
            ModifierKey::Ctrl => modifiers.ctrl,
            ModifierKey::Alt => modifiers.alt,
            ModifierKey::Meta => modifiers.meta,
        }
    }
}

/// Configuration for the select/drag/clone gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Direction step used while angle snapping, in degrees. Default: **90**.
    pub angle_snap_degrees: f64,

    /// Adds the pressed layer to the selection instead of replacing it.
    pub additive_select: ModifierKey,

    /// Drags a copy of the selection, leaving the originals in place.
    /// Only read at the first move of a drag.
    pub duplicate: ModifierKey,

    /// Snaps the drag direction to multiples of `angle_snap_degrees`.
    pub angle_snap: ModifierKey,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            angle_snap_degrees: 90.0,
            additive_select: ModifierKey::Shift,
            duplicate: ModifierKey::Alt,
            angle_snap: ModifierKey::Shift,
        }
    }
}
