//! Play-in-editor settings.
//!
//! Mirrors the editor's preference toggles that affect the simulation.
//! Serde-round-trippable so the shell can persist them with the rest of its
//! preferences.

use serde::{Deserialize, Serialize};

/// Toggles the editor exposes for play mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaySettings {
    /// Walking onto an exit trigger starts a level transition. When off, the
    /// transition controller is forced idle and any in-flight fade is
    /// cleared at the next poll.
    pub enable_map_exits: bool,
    /// Colliders hidden by the display settings are excluded from avatar
    /// physics (matching what the designer sees).
    pub ignore_hidden_colliders: bool,
}

impl Default for PlaySettings {
    fn default() -> Self {
        Self {
            enable_map_exits: true,
            ignore_hidden_colliders: true,
        }
    }
}
