//! Movement intent resolution.
//!
//! Converts the four directional key flags plus the sprint modifier into a
//! world-space heading and speed, relative to the camera's yaw. Camera yaw
//! is in degrees (editor convention); the resulting movement yaw is in
//! radians measured from +X toward +Z.

use crate::input::MovementKeys;
use crate::mathutil::SMALL_NUMBER;
use crate::player::{SPRINT_SPEED, WALK_SPEED};

/// Resolve directional input into `(movement_yaw, movement_speed)`.
///
/// When the combined intent vector is inside the dead zone the speed is
/// zero and the previous heading is returned unchanged, so the avatar keeps
/// facing the way it was moving.
pub fn resolve(keys: &MovementKeys, camera_yaw_deg: f32, previous_yaw: f32) -> (f32, f32) {
    let mut df = 0.0f32;
    let mut dr = 0.0f32;
    if keys.forward {
        df += 1.0;
    }
    if keys.backward {
        df -= 1.0;
    }
    if keys.left {
        dr -= 1.0;
    }
    if keys.right {
        dr += 1.0;
    }

    let norm = (df * df + dr * dr).sqrt();
    if norm <= SMALL_NUMBER {
        return (previous_yaw, 0.0);
    }
    let df = df / norm;
    let dr = dr / norm;

    let cam = camera_yaw_deg.to_radians();
    let dx = dr * cam.cos() + df * cam.sin();
    let dz = dr * cam.sin() - df * cam.cos();

    let yaw = dz.atan2(dx);
    let speed = if keys.sprint { SPRINT_SPEED } else { WALK_SPEED };
    (yaw, speed)
}
