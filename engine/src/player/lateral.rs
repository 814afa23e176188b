//! Horizontal collision resolution.
//!
//! Each tick the intended horizontal displacement is resolved in four
//! stages: a forward ray (retried from an upper height band before a block
//! is accepted), a partial slide along the blocking surface, two angled
//! whisker rays anticipating walls ahead, and four cardinal push-out rays.
//!
//! Two behaviors are kept exactly as the retail game ships them:
//!
//! - The slide projects the *unnormalized* scaled move vector onto the hit
//!   normal and applies half of the perpendicular remainder. Normalizing
//!   first would be the textbook slide; the game does not, and wall-hugging
//!   speed depends on it.
//! - When only one whisker hits, the correction computed from the *other*
//!   (non-hitting) whisker is applied, which moves nothing. The net effect
//!   of whisker detection is therefore exactly what ships: horizontal
//!   motion freezes when both whiskers hit, and nothing else.

use glam::Vec3;

use crate::level::{Level, ObjectId};
use crate::physics::CollisionProbe;
use crate::player::{COLLISION_HEIGHT, COLLISION_RADIUS};

/// Angle of the two whisker rays either side of the heading.
const WHISKER_ANGLE_DEG: f32 = 35.0;

/// Height band offset for whisker and cardinal rays.
const SIDE_RAY_HEIGHT: f32 = 0.286 * COLLISION_HEIGHT;

/// Height of the lower forward ray band.
const FORWARD_LOWER_HEIGHT: f32 = 10.01;

/// Height of the upper forward ray band.
const FORWARD_UPPER_HEIGHT: f32 = 0.75 * COLLISION_HEIGHT;

/// Resolve this tick's horizontal displacement in place.
///
/// `pos` is the avatar's live preview position; only x/z are written. A
/// zero move distance still runs the cardinal push-out so overlapping
/// geometry ejects a stationary avatar.
pub fn resolve(
    level: &Level,
    probe: &dyn CollisionProbe,
    candidates: &[ObjectId],
    pos: &mut Vec3,
    move_yaw: f32,
    move_speed: f32,
    dt: f32,
) {
    let move_dist = move_speed * dt;

    if move_dist != 0.0 {
        let mut updated = *pos;

        let lower = Vec3::new(pos.x, pos.y + FORWARD_LOWER_HEIGHT, pos.z);
        let upper = Vec3::new(pos.x, pos.y + FORWARD_UPPER_HEIGHT, pos.z);
        let forward = Vec3::new(move_yaw.cos(), 0.0, move_yaw.sin());

        let mut forward_hit = probe.cast(level, lower, forward, candidates, false);

        let trace_length = move_dist + COLLISION_RADIUS;
        if forward_hit.distance >= trace_length {
            forward_hit = probe.cast(level, upper, forward, candidates, false);
        }
        if forward_hit.distance < trace_length {
            updated.x += (forward_hit.distance - COLLISION_RADIUS) * forward.x;
            updated.z += (forward_hit.distance - COLLISION_RADIUS) * forward.z;
            add_perp(&mut updated, forward, move_dist, forward_hit.normal);
        } else {
            updated.x += move_dist * forward.x;
            updated.z += move_dist * forward.z;
        }

        let whisker = WHISKER_ANGLE_DEG.to_radians();
        let left_dir = Vec3::new((move_yaw - whisker).cos(), 0.0, (move_yaw - whisker).sin());
        let right_dir = Vec3::new((move_yaw + whisker).cos(), 0.0, (move_yaw + whisker).sin());
        let whisker_start = Vec3::new(updated.x, updated.y + SIDE_RAY_HEIGHT, updated.z);

        let left_hit = probe.cast(level, whisker_start, left_dir, candidates, false);
        let right_hit = probe.cast(level, whisker_start, right_dir, candidates, false);

        let hit_left = left_hit.distance < COLLISION_RADIUS;
        let hit_right = right_hit.distance < COLLISION_RADIUS;

        let mut left_pos = updated;
        if hit_left {
            left_pos.x += (left_hit.distance - COLLISION_RADIUS) * left_dir.x;
            left_pos.z += (left_hit.distance - COLLISION_RADIUS) * left_dir.z;
        }
        let mut right_pos = updated;
        if hit_right {
            right_pos.x += (right_hit.distance - COLLISION_RADIUS) * right_dir.x;
            right_pos.z += (right_hit.distance - COLLISION_RADIUS) * right_dir.z;
        }

        // Shipped behavior: a single whisker hit resolves from the other
        // side's position, which was never corrected. Only the both-hit
        // case changes anything (by freezing motion).
        if hit_left {
            if hit_right {
                // Both whiskers hit: keep the position from the tick start.
            } else {
                // Only the left whisker: note, the *right* position.
                pos.x = right_pos.x;
                pos.z = right_pos.z;
            }
        } else if hit_right {
            // Only the right whisker: note, the *left* position.
            pos.x = left_pos.x;
            pos.z = left_pos.z;
        } else {
            pos.x = updated.x;
            pos.z = updated.z;
        }

        push_out_cardinals(level, probe, candidates, pos, SIDE_RAY_HEIGHT);
    } else {
        push_out_cardinals(level, probe, candidates, pos, SIDE_RAY_HEIGHT);
    }
}

/// Partial slide along a blocking surface.
///
/// The move vector is scaled but not normalized before projecting onto the
/// hit normal, and only half of the perpendicular remainder is applied.
fn add_perp(pos: &mut Vec3, dir: Vec3, length: f32, normal: Vec3) {
    let mx = dir.x * length;
    let mz = dir.z * length;

    let dot = mx * normal.x + mz * normal.z;
    pos.x += (mx - dot * normal.x) * 0.5;
    pos.z += (mz - dot * normal.z) * 0.5;
}

/// Push the position out along any cardinal ray whose hit is closer than
/// the collision radius. Returns true if anything was hit.
fn push_out_cardinals(
    level: &Level,
    probe: &dyn CollisionProbe,
    candidates: &[ObjectId],
    pos: &mut Vec3,
    offset_y: f32,
) -> bool {
    let trace_dirs = [Vec3::NEG_Z, Vec3::X, Vec3::Z, Vec3::NEG_X];

    let mut hit_something = false;
    for dir in trace_dirs {
        let origin = Vec3::new(pos.x, pos.y + offset_y, pos.z);
        let hit = probe.cast(level, origin, dir, candidates, false);

        if hit.distance < COLLISION_RADIUS {
            pos.x += (hit.distance - COLLISION_RADIUS) * dir.x;
            pos.z += (hit.distance - COLLISION_RADIUS) * dir.z;
            hit_something = true;
        }
    }

    hit_something
}
