//! Per-tick collision candidate filtering.
//!
//! The avatar's probes only see colliders that carry a mesh, are not flagged
//! ignore-player, and pass the current hidden-object display settings, plus
//! any markers with entity hitboxes. The set is rebuilt every tick so edits
//! made while play mode is active take effect immediately.

use crate::config::PlaySettings;
use crate::level::{Level, ObjectId};

/// Build the collision-candidate set for this tick.
pub fn collect_candidates(level: &Level, settings: &PlaySettings) -> Vec<ObjectId> {
    let mut candidates = Vec::new();

    for (i, c) in level.colliders.iter().enumerate() {
        if c.has_mesh()
            && (!settings.ignore_hidden_colliders || !c.hidden)
            && !c.ignore_player
        {
            candidates.push(ObjectId::Collider(i));
        }
    }
    for (i, m) in level.markers.iter().enumerate() {
        if m.has_collision() {
            candidates.push(ObjectId::Marker(i));
        }
    }

    candidates
}
