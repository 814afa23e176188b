//! Level data model for the play-in-editor simulator.
//!
//! This is the minimal slice of the editor's scene the simulator needs:
//! colliders (with their player-facing flags), markers (spawn/exit points,
//! some carrying entity hitboxes), and exit triggers wired up by the level's
//! script generators. The full scene graph, models, zones and script data
//! stay in the surrounding tool.
//!
//! Levels deserialize from the editor's JSON level description via
//! [`JsonLevelSource`](loader::JsonLevelSource); the structs here derive
//! `serde` for that purpose only and carry no file-format logic themselves.
//!
//! # Submodules
//!
//! - [`loader`] - `LevelSource` seam, JSON source, background load job
//! - [`exits`] - Exit-trigger scanning beneath the avatar

pub mod exits;
pub mod loader;

pub use exits::ExitDetector;
pub use loader::{JsonLevelSource, LevelError, LevelLoadJob, LevelSource};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::Aabb;

/// Identifies a level object within probe candidate sets and hit results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectId {
    /// Index into [`Level::colliders`].
    Collider(usize),
    /// Index into [`Level::markers`].
    Marker(usize),
}

/// A collision object from the level being edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    /// Script-facing name, referenced by exit triggers.
    pub name: String,
    /// Hidden by the editor's current display settings.
    #[serde(default)]
    pub hidden: bool,
    /// The retail engine skips this collider for player physics.
    #[serde(default)]
    pub ignore_player: bool,
    /// AABB proxy for the collision mesh; `None` means no mesh at all.
    pub shape: Option<Aabb>,
}

impl Collider {
    /// Whether this collider carries any collision mesh.
    pub fn has_mesh(&self) -> bool {
        self.shape.is_some()
    }
}

/// A named point object storing position + orientation, used for avatar
/// spawn/exit alignment. Some markers stand in for entities and carry a
/// collidable hitbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub position: Vec3,
    /// Yaw in degrees, marker convention: 0 faces -Z, rotated 90 degrees
    /// from the avatar's movement-yaw convention.
    #[serde(default)]
    pub yaw: f32,
    /// Half-extents of the entity hitbox, if this marker is collidable.
    #[serde(default)]
    pub hitbox: Option<Vec3>,
}

impl Marker {
    /// Whether this marker participates in collision.
    pub fn has_collision(&self) -> bool {
        self.hitbox.is_some()
    }

    /// World-space AABB of the entity hitbox, if any.
    pub fn collision_aabb(&self) -> Option<Aabb> {
        self.hitbox.map(|half| Aabb {
            min: self.position - Vec3::new(half.x, 0.0, half.z),
            max: self.position + Vec3::new(half.x, 2.0 * half.y, half.z),
        })
    }
}

/// A level-exit trigger sourced from the level's script data.
///
/// All four names must be present and non-empty for the trigger to be
/// selectable; the detector silently skips anything less.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExitTrigger {
    /// Name of the collider the avatar must stand on.
    #[serde(default)]
    pub collider_name: Option<String>,
    /// Destination level name.
    #[serde(default)]
    pub dest_level: Option<String>,
    /// Marker in the destination level where the avatar enters.
    #[serde(default)]
    pub dest_marker: Option<String>,
    /// Marker in this level the avatar exits through.
    #[serde(default)]
    pub exit_marker: Option<String>,
}

impl ExitTrigger {
    fn field<'a>(value: &'a Option<String>) -> Option<&'a str> {
        match value.as_deref() {
            Some("") | None => None,
            Some(s) => Some(s),
        }
    }

    /// Collider name, `None` when missing or empty.
    pub fn collider_name(&self) -> Option<&str> {
        Self::field(&self.collider_name)
    }

    /// Destination level name, `None` when missing or empty.
    pub fn dest_level(&self) -> Option<&str> {
        Self::field(&self.dest_level)
    }

    /// Destination marker name, `None` when missing or empty.
    pub fn dest_marker(&self) -> Option<&str> {
        Self::field(&self.dest_marker)
    }

    /// Exit marker name, `None` when missing or empty.
    pub fn exit_marker(&self) -> Option<&str> {
        Self::field(&self.exit_marker)
    }

    /// True when all four names are present and non-empty.
    pub fn is_valid(&self) -> bool {
        self.collider_name().is_some()
            && self.dest_level().is_some()
            && self.dest_marker().is_some()
            && self.exit_marker().is_some()
    }
}

/// The slice of a loaded level the simulator operates on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    #[serde(default)]
    pub colliders: Vec<Collider>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub exits: Vec<ExitTrigger>,
    /// Unsaved changes; the transition controller prompts before leaving a
    /// modified level. Runtime editor state, not part of the file.
    #[serde(skip)]
    pub modified: bool,
}

impl Level {
    /// Look up a collider index by name.
    pub fn find_collider(&self, name: &str) -> Option<usize> {
        self.colliders.iter().position(|c| c.name == name)
    }

    /// Look up a marker by name.
    pub fn find_marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_trigger_validity() {
        let mut exit = ExitTrigger {
            collider_name: Some("ttw".into()),
            dest_level: Some("field_03".into()),
            dest_marker: Some("entry_w".into()),
            exit_marker: Some("exit_e".into()),
        };
        assert!(exit.is_valid());

        exit.dest_marker = Some(String::new());
        assert!(!exit.is_valid());

        exit.dest_marker = None;
        assert!(!exit.is_valid());
    }

    #[test]
    fn test_collider_without_shape_has_no_mesh() {
        let c = Collider {
            name: "deco".into(),
            hidden: false,
            ignore_player: false,
            shape: None,
        };
        assert!(!c.has_mesh());
    }

    #[test]
    fn test_marker_hitbox_aabb_sits_on_position() {
        let m = Marker {
            name: "npc_0".into(),
            position: Vec3::new(10.0, 5.0, -20.0),
            yaw: 0.0,
            hitbox: Some(Vec3::new(15.0, 20.0, 15.0)),
        };
        let aabb = m.collision_aabb().unwrap();
        assert_eq!(aabb.min.y, 5.0);
        assert_eq!(aabb.max.y, 45.0);
        assert_eq!(aabb.min.x, -5.0);
    }

    #[test]
    fn test_find_by_name() {
        let level = Level {
            name: "field_02".into(),
            colliders: vec![Collider {
                name: "floor".into(),
                hidden: false,
                ignore_player: false,
                shape: None,
            }],
            markers: vec![Marker {
                name: "entry_w".into(),
                position: Vec3::ZERO,
                yaw: 90.0,
                hitbox: None,
            }],
            exits: Vec::new(),
            modified: false,
        };
        assert_eq!(level.find_collider("floor"), Some(0));
        assert!(level.find_marker("entry_w").is_some());
        assert!(level.find_collider("missing").is_none());
    }
}
