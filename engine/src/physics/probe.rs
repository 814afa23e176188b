//! Ray query seam between the simulator and level geometry.
//!
//! Mirrors the editor's picking interface: a cast either hits (finite
//! distance, point, normal, object) or misses, with the miss encoded as an
//! infinite distance so callers can compare distances without branching.

use glam::Vec3;

use crate::level::{Level, ObjectId};

/// Result of a single ray cast.
///
/// A miss carries `distance == f32::INFINITY`; all other fields are then
/// meaningless. Comparisons against thresholds work unchanged on misses
/// because infinity loses every `<` test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Distance from the ray origin to the hit point, `INFINITY` on a miss.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Surface normal at the hit point (normalized).
    pub normal: Vec3,
    /// The level object that was hit, if any.
    pub object: Option<ObjectId>,
}

impl ProbeHit {
    /// A cast that found nothing.
    pub fn miss() -> Self {
        Self {
            distance: f32::INFINITY,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            object: None,
        }
    }

    /// True iff the cast found nothing.
    pub fn missed(&self) -> bool {
        self.distance == f32::INFINITY
    }
}

impl Default for ProbeHit {
    fn default() -> Self {
        Self::miss()
    }
}

/// Ray/shape intersection service the simulator calls into.
///
/// Implementations intersect `origin + t * direction` (t >= 0) against the
/// listed candidates only, returning the nearest hit. An empty candidate set
/// is an ordinary miss, never an error. `ignore_hidden` skips candidates the
/// display settings currently hide; the simulator passes `false` because its
/// candidate sets are pre-filtered.
pub trait CollisionProbe {
    fn cast(
        &self,
        level: &Level,
        origin: Vec3,
        direction: Vec3,
        candidates: &[ObjectId],
        ignore_hidden: bool,
    ) -> ProbeHit;
}
