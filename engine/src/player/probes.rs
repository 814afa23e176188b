//! Ground and ceiling probe fans.
//!
//! The ground check casts five downward rays from half collision height:
//! four offset from the avatar along two axes derived from the
//! camera-relative facing angle, plus a centered ray cast last. The ceiling
//! check is the same fan without the centered ray, cast upward with a
//! slightly wider radius factor.
//!
//! Two conventions here are kept exactly as the retail game ships them:
//!
//! - The second offset pair is cast at `(+dz, +dx)` / `(-dz, -dx)` instead
//!   of the perpendicular `(+dz, -dx)` / `(-dz, +dx)`, so the fan samples a
//!   non-orthogonal cross. Ledge behavior in the shipped game depends on
//!   this sampling; do not straighten it.
//! - The minimum-distance selection compares with `<=`, so a tie goes to
//!   the *last* ray in enumeration order (the centered ray for the ground
//!   fan).

use glam::Vec3;

use crate::level::{Level, ObjectId};
use crate::physics::{CollisionProbe, ProbeHit};
use crate::player::{COLLISION_HEIGHT, COLLISION_RADIUS};

const DOWN: Vec3 = Vec3::NEG_Y;
const UP: Vec3 = Vec3::Y;

/// Radius factor for the ground fan's offset rays.
const GROUND_FAN_FACTOR: f32 = 0.28;

/// Radius factor for the ceiling fan's offset rays.
const CEILING_FAN_FACTOR: f32 = 0.30;

fn fan_offsets(camera_yaw_deg: f32, face_angle_goal: f32, factor: f32) -> (f32, f32) {
    let angle = (camera_yaw_deg + face_angle_goal - 90.0).to_radians();
    let dx = angle.cos() * 2.0 * COLLISION_RADIUS * factor;
    let dz = angle.sin() * 2.0 * COLLISION_RADIUS * factor;
    (dx, dz)
}

fn nearest_hit(
    level: &Level,
    probe: &dyn CollisionProbe,
    candidates: &[ObjectId],
    origins: &[Vec3],
    direction: Vec3,
) -> ProbeHit {
    let mut min_dist = f32::MAX;
    let mut min_hit = ProbeHit::miss();
    for &origin in origins {
        let hit = probe.cast(level, origin, direction, candidates, false);
        // <= keeps the last ray on ties.
        if hit.distance <= min_dist {
            min_dist = hit.distance;
            min_hit = hit;
        }
    }
    min_hit
}

/// Distance from the avatar's feet down to the nearest ground hit, or
/// `INFINITY` when every ray misses.
///
/// The result is the height difference `feet.y - hit.y`, not the ray
/// distance: rays start at half collision height, and a floor slightly
/// *above* the feet legitimately yields a negative value (the tick loop
/// snaps the avatar up through it).
pub fn check_for_ground(
    level: &Level,
    probe: &dyn CollisionProbe,
    candidates: &[ObjectId],
    feet: Vec3,
    camera_yaw_deg: f32,
    face_angle_goal: f32,
) -> f32 {
    let (dx, dz) = fan_offsets(camera_yaw_deg, face_angle_goal, GROUND_FAN_FACTOR);
    let dy = COLLISION_HEIGHT * 0.5;

    let origins = [
        Vec3::new(feet.x + dx, feet.y + dy, feet.z + dz),
        Vec3::new(feet.x - dx, feet.y + dy, feet.z - dz),
        // Kept as shipped: this pair is NOT perpendicular to the first.
        Vec3::new(feet.x + dz, feet.y + dy, feet.z + dx),
        Vec3::new(feet.x - dz, feet.y + dy, feet.z - dx),
        // Centered ray is evaluated last so it wins ties.
        Vec3::new(feet.x, feet.y + dy, feet.z),
    ];

    let min_hit = nearest_hit(level, probe, candidates, &origins, DOWN);
    if min_hit.missed() {
        f32::INFINITY
    } else {
        feet.y - min_hit.point.y
    }
}

/// Ray distance to the nearest ceiling hit above the avatar, or `INFINITY`
/// when every ray misses. Only consulted while a jump is ascending.
pub fn check_for_ceiling(
    level: &Level,
    probe: &dyn CollisionProbe,
    candidates: &[ObjectId],
    feet: Vec3,
    camera_yaw_deg: f32,
    face_angle_goal: f32,
) -> f32 {
    let (dx, dz) = fan_offsets(camera_yaw_deg, face_angle_goal, CEILING_FAN_FACTOR);
    let dy = COLLISION_HEIGHT * 0.5;

    let origins = [
        Vec3::new(feet.x + dx, feet.y + dy, feet.z + dz),
        Vec3::new(feet.x - dx, feet.y + dy, feet.z - dz),
        // Same non-perpendicular pair as the ground fan, kept as shipped.
        Vec3::new(feet.x + dz, feet.y + dy, feet.z + dx),
        Vec3::new(feet.x - dz, feet.y + dy, feet.z - dx),
    ];

    let min_hit = nearest_hit(level, probe, candidates, &origins, UP);
    if min_hit.missed() {
        f32::INFINITY
    } else {
        min_hit.distance
    }
}
