//! Ray-AABB intersection and the stock collider-proxy probe.
//!
//! The slab method finds entry and exit times for the ray against each pair
//! of axis-aligned planes; a valid overlap of the three intervals is a hit.
//! [`AabbProbe`] runs those tests against the AABB proxies stored on level
//! colliders and markers. The editor's production probe intersects the real
//! collision triangles instead; the contract at the [`CollisionProbe`] seam
//! is identical.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::level::{Level, ObjectId};
use crate::physics::probe::{CollisionProbe, ProbeHit};

/// Axis-aligned bounding box used as a collision-mesh proxy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Construct from two corners, sorting each axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }
}

/// Ray-AABB intersection test using the slab method.
///
/// Returns the distance along the ray to the nearest intersection at or in
/// front of the origin, or `None`. A ray starting inside the box reports the
/// exit face.
pub fn ray_aabb_intersect(origin: Vec3, dir: Vec3, aabb: &Aabb) -> Option<f32> {
    // Near-zero components get a huge signed inverse instead of dividing by
    // zero; the min/max below then discard the degenerate axis.
    let inv = Vec3::new(
        if dir.x.abs() > 1e-10 { 1.0 / dir.x } else { f32::MAX * dir.x.signum() },
        if dir.y.abs() > 1e-10 { 1.0 / dir.y } else { f32::MAX * dir.y.signum() },
        if dir.z.abs() > 1e-10 { 1.0 / dir.z } else { f32::MAX * dir.z.signum() },
    );

    let t1 = (aabb.min.x - origin.x) * inv.x;
    let t2 = (aabb.max.x - origin.x) * inv.x;
    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb.min.y - origin.y) * inv.y;
    let t4 = (aabb.max.y - origin.y) * inv.y;
    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb.min.z - origin.z) * inv.z;
    let t6 = (aabb.max.z - origin.z) * inv.z;
    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Outward face normal for a point on an AABB surface.
///
/// Picks the face whose normalized local coordinate is largest.
pub fn aabb_surface_normal(point: Vec3, aabb: &Aabb) -> Vec3 {
    let center = (aabb.min + aabb.max) * 0.5;
    let half = (aabb.max - aabb.min) * 0.5;
    let local = point - center;

    let normalized = Vec3::new(
        local.x / half.x.max(1e-6),
        local.y / half.y.max(1e-6),
        local.z / half.z.max(1e-6),
    );
    let a = normalized.abs();

    if a.x >= a.y && a.x >= a.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if a.y >= a.x && a.y >= a.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Stock [`CollisionProbe`] over the AABB proxies in a [`Level`].
///
/// Brute-force over the candidate list; candidate sets in play mode are
/// small enough that spatial partitioning would be overkill here.
#[derive(Debug, Default, Clone, Copy)]
pub struct AabbProbe;

impl AabbProbe {
    fn object_aabb(level: &Level, id: ObjectId, ignore_hidden: bool) -> Option<Aabb> {
        match id {
            ObjectId::Collider(i) => {
                let c = level.colliders.get(i)?;
                if ignore_hidden && c.hidden {
                    return None;
                }
                c.shape
            }
            ObjectId::Marker(i) => level.markers.get(i)?.collision_aabb(),
        }
    }
}

impl CollisionProbe for AabbProbe {
    fn cast(
        &self,
        level: &Level,
        origin: Vec3,
        direction: Vec3,
        candidates: &[ObjectId],
        ignore_hidden: bool,
    ) -> ProbeHit {
        let mut best = ProbeHit::miss();
        for &id in candidates {
            let Some(aabb) = Self::object_aabb(level, id, ignore_hidden) else {
                continue;
            };
            if let Some(t) = ray_aabb_intersect(origin, direction, &aabb) {
                if t < best.distance {
                    let point = origin + direction * t;
                    best = ProbeHit {
                        distance: t,
                        point,
                        normal: aabb_surface_normal(point, &aabb),
                        object: Some(id),
                    };
                }
            }
        }
        best
    }
}
