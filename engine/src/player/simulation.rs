//! Avatar state and the per-tick simulation.
//!
//! [`CursorSimulation`] owns the single [`AvatarState`] active during play
//! mode and advances it once per host tick, in a fixed order: input ->
//! movement intent -> facing/animation state -> collision candidates ->
//! lateral resolution -> hover short-circuit -> ground state -> gravity
//! (every other tick) -> ceiling check -> vertical application -> void-fall
//! recovery -> ground bookkeeping.
//!
//! The gravity tables are tuned for 30 Hz while the editor ticks at 60, so
//! the integrator advances on every second tick and the resulting distance
//! is halved and applied on both ticks (`frame_parity` tracks this).

use glam::Vec3;
use log::info;

use crate::config::PlaySettings;
use crate::input::{JumpEdge, MovementKeys};
use crate::level::Level;
use crate::mathutil;
use crate::physics::{CollisionProbe, ProbeHit, collect_candidates};
use crate::player::gravity::{FALL_TABLE, FallState, GravityIntegrator, JUMP_TABLE};
use crate::player::{
    COLLISION_HEIGHT, HOVER_RISE_SPEED, VOID_FALL_TIME, intent, lateral, probes,
};

/// The possessable avatar's full simulation state.
///
/// `preview_position` is the live simulated position; it is committed to
/// `position` only when play mode ends, so abandoning a play session leaves
/// the editor's cursor where it was.
#[derive(Debug, Clone)]
pub struct AvatarState {
    /// Committed editor position.
    pub position: Vec3,
    /// Live simulated position while play mode is active.
    pub preview_position: Vec3,
    /// Heading in radians, from +X toward +Z.
    pub movement_yaw: f32,
    /// Horizontal speed in units per second.
    pub movement_speed: f32,
    /// Vertical state machine tag.
    pub fall_state: FallState,
    /// The 4-register gravity integrator.
    pub integrator: GravityIntegrator,
    /// Tick counter; the integrator advances on every second tick.
    pub frame_parity: u64,
    /// Ground contact this tick (recomputed every tick).
    pub touching_ground: bool,
    /// Hover mode active this tick (recomputed every tick).
    pub hovering: bool,
    /// Last position with ground contact, the void-recovery target.
    pub last_ground_position: Vec3,
    /// Seconds spent continuously in `Fall`.
    pub fall_time: f32,
    /// Last height at which the follow camera may track vertically.
    pub last_valid_cam_height: f32,
    /// Edge-detected jump input.
    pub jump: JumpEdge,
    /// Vertical distance applied per tick (positive = downward).
    pub fall_speed: f32,
    /// Smoothed sprite facing angle, degrees.
    pub face_angle: f32,
    /// Facing goal (0 or 180 degrees); feeds the probe fan orientation.
    pub face_angle_goal: f32,
    /// Render the back-facing sprite variant.
    pub use_back: bool,
}

impl AvatarState {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            preview_position: position,
            movement_yaw: 0.0,
            movement_speed: 0.0,
            fall_state: FallState::OnGround,
            integrator: GravityIntegrator::default(),
            frame_parity: 0,
            touching_ground: true,
            hovering: false,
            last_ground_position: position,
            fall_time: 0.0,
            last_valid_cam_height: position.y,
            jump: JumpEdge::new(),
            fall_speed: 0.0,
            face_angle: 0.0,
            face_angle_goal: 0.0,
            use_back: false,
        }
    }
}

/// Per-tick simulation of the play-in-editor avatar.
pub struct CursorSimulation {
    avatar: AvatarState,
    preview: bool,
}

impl CursorSimulation {
    pub fn new(initial_position: Vec3) -> Self {
        Self {
            avatar: AvatarState::new(initial_position),
            preview: false,
        }
    }

    /// Read access to the avatar state (for rendering and the camera).
    pub fn avatar(&self) -> &AvatarState {
        &self.avatar
    }

    /// The position the rest of the editor should use: the live preview
    /// position during play mode, the committed one otherwise.
    pub fn position(&self) -> Vec3 {
        if self.preview {
            self.avatar.preview_position
        } else {
            self.avatar.position
        }
    }

    /// Set both the committed and preview positions (placement, teleport).
    pub fn set_position(&mut self, pos: Vec3) {
        self.avatar.position = pos;
        self.avatar.preview_position = pos;
    }

    /// Enter play mode: the preview position becomes live, seeded from the
    /// committed position. Calling again while already in play mode (the
    /// level swap re-enters preview) leaves the live position alone.
    pub fn start_preview(&mut self) {
        if !self.preview {
            self.avatar.preview_position = self.avatar.position;
            self.avatar.last_ground_position = self.avatar.position;
            self.avatar.last_valid_cam_height = self.avatar.position.y;
        }
        self.preview = true;
    }

    /// Leave play mode, committing the preview position.
    pub fn end_preview(&mut self) {
        self.preview = false;
        self.avatar.position = self.avatar.preview_position;
    }

    /// Whether play mode is active.
    pub fn in_preview(&self) -> bool {
        self.preview
    }

    /// Override the avatar's heading, used by the transition controller to
    /// walk the avatar out through an exit and in from an entry marker.
    pub fn set_move_heading(&mut self, speed: f32, yaw: f32) {
        self.avatar.movement_speed = speed;
        self.avatar.movement_yaw = yaw;
    }

    /// Whether the follow camera may track the avatar vertically.
    pub fn allow_vertical_camera_movement(&self) -> bool {
        self.preview
            && (self.avatar.fall_state == FallState::OnGround
                || self.avatar.hovering
                || self.avatar.preview_position.y < self.avatar.last_valid_cam_height)
    }

    /// Downward probe from half collision height, used by the renderer to
    /// place the avatar's drop shadow.
    pub fn shadow_probe(
        &self,
        level: &Level,
        probe: &dyn CollisionProbe,
        settings: &PlaySettings,
    ) -> ProbeHit {
        let candidates = collect_candidates(level, settings);
        let origin = Vec3::new(
            self.avatar.preview_position.x,
            self.avatar.preview_position.y + COLLISION_HEIGHT / 2.0,
            self.avatar.preview_position.z,
        );
        probe.cast(level, origin, Vec3::NEG_Y, &candidates, false)
    }

    /// Advance the simulation one host tick.
    ///
    /// `check_input` is false while a transition fade is walking the avatar
    /// (the heading set by the controller must not be overridden);
    /// `has_focus` zeroes movement when the 3D viewport is not active.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        keys: &MovementKeys,
        level: &Level,
        probe: &dyn CollisionProbe,
        settings: &PlaySettings,
        camera_yaw_deg: f32,
        dt: f32,
        has_focus: bool,
        check_input: bool,
    ) {
        let avatar = &mut self.avatar;

        avatar.touching_ground = false;
        avatar.hovering = false;

        // Process input.
        if check_input {
            if !has_focus {
                avatar.movement_speed = 0.0;
            }
            let (yaw, speed) = intent::resolve(keys, camera_yaw_deg, avatar.movement_yaw);
            avatar.movement_yaw = yaw;
            avatar.movement_speed = speed;
            avatar.jump.update(keys.jump);
        }

        // Update animation state. The facing goal flips between 0 and 180
        // depending on which side of the camera the heading falls on, and
        // also orients the ground/ceiling probe fans.
        let mut delta_angle = avatar.movement_yaw.to_degrees() - camera_yaw_deg;
        while delta_angle < 0.0 {
            delta_angle += 360.0;
        }
        while delta_angle >= 360.0 {
            delta_angle -= 360.0;
        }
        avatar.use_back = delta_angle > 180.0;

        delta_angle += 270.0;
        while delta_angle >= 360.0 {
            delta_angle -= 360.0;
        }
        if delta_angle != 0.0 && delta_angle != 180.0 {
            avatar.face_angle_goal = if delta_angle > 180.0 { 180.0 } else { 0.0 };
        }
        avatar.face_angle = mathutil::interp(avatar.face_angle, avatar.face_angle_goal, 10.0, dt);

        // Check collision.
        let candidates = collect_candidates(level, settings);

        lateral::resolve(
            level,
            probe,
            &candidates,
            &mut avatar.preview_position,
            avatar.movement_yaw,
            avatar.movement_speed,
            dt,
        );

        // Hover short-circuits the rest of the physics.
        if check_input && keys.hover {
            avatar.preview_position.y += HOVER_RISE_SPEED * dt;
            avatar.integrator.load(&FALL_TABLE);
            avatar.fall_state = FallState::Fall;
            avatar.fall_time = 0.0;

            avatar.hovering = true;
            avatar.last_valid_cam_height = avatar.preview_position.y;

            return;
        }

        // Do physics.
        if avatar.fall_state == FallState::OnGround {
            let hit_dist = probes::check_for_ground(
                level,
                probe,
                &candidates,
                avatar.preview_position,
                camera_yaw_deg,
                avatar.face_angle_goal,
            );

            if hit_dist > COLLISION_HEIGHT * 2.0 / 7.0 {
                avatar.integrator.load(&FALL_TABLE);
                avatar.fall_state = FallState::Fall;
            } else {
                avatar.preview_position.y -= hit_dist;
                avatar.touching_ground = true;
            }

            if avatar.jump.wants_jump() {
                avatar.jump.consume();
                avatar.integrator.load(&JUMP_TABLE);
                avatar.fall_state = FallState::Jump;
            }
        }

        // The gravity tables run at 30 Hz: advance on every second tick and
        // spread the distance across both.
        avatar.frame_parity += 1;
        if avatar.frame_parity % 2 == 0 {
            let (next, fall_dist) =
                crate::player::gravity::advance(avatar.fall_state, &mut avatar.integrator, avatar.jump.held);
            avatar.fall_state = next;
            avatar.fall_speed = fall_dist / 2.0;
        }

        // Check collision above.
        if avatar.fall_state == FallState::Jump {
            let hit_dist = probes::check_for_ceiling(
                level,
                probe,
                &candidates,
                avatar.preview_position,
                camera_yaw_deg,
                avatar.face_angle_goal,
            );
            if !avatar.touching_ground
                && hit_dist < COLLISION_HEIGHT / 2.0 + avatar.integrator.register0()
            {
                avatar.integrator.load(&FALL_TABLE);
                avatar.fall_state = FallState::Fall;
                avatar.preview_position.y -= COLLISION_HEIGHT / 10.0;
            }
        }

        if avatar.fall_speed > 0.0 {
            let hit_dist = probes::check_for_ground(
                level,
                probe,
                &candidates,
                avatar.preview_position,
                camera_yaw_deg,
                avatar.face_angle_goal,
            );
            if hit_dist < avatar.fall_speed {
                avatar.fall_state = FallState::OnGround;
            } else {
                avatar.preview_position.y -= avatar.fall_speed;
            }
        } else if avatar.fall_speed < 0.0 {
            // Ascending.
            avatar.preview_position.y -= avatar.fall_speed;
        }

        // Limit falling off the level.
        if avatar.fall_state == FallState::Fall {
            avatar.fall_time += dt;

            if avatar.fall_time > VOID_FALL_TIME {
                info!("void-fall recovery to {:?}", avatar.last_ground_position);
                avatar.preview_position = avatar.last_ground_position;
                avatar.fall_state = FallState::OnGround;
            }
        } else {
            avatar.fall_time = 0.0;
            if avatar.fall_state == FallState::OnGround {
                avatar.last_ground_position = avatar.preview_position;
                avatar.last_valid_cam_height = avatar.preview_position.y;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::level::Collider;
    use crate::physics::{Aabb, AabbProbe};

    fn floor_level() -> Level {
        let mut level = Level::default();
        level.colliders.push(Collider {
            name: "floor".into(),
            hidden: false,
            ignore_player: false,
            shape: Some(Aabb::new(
                Vec3::new(-1000.0, -10.0, -1000.0),
                Vec3::new(1000.0, 0.0, 1000.0),
            )),
        });
        level
    }

    fn tick(sim: &mut CursorSimulation, keys: &MovementKeys, level: &Level) {
        sim.tick(
            keys,
            level,
            &AabbProbe,
            &PlaySettings::default(),
            0.0,
            1.0 / 60.0,
            true,
            true,
        );
    }

    #[test]
    fn test_idle_on_floor_stays_grounded() {
        let level = floor_level();
        let mut sim = CursorSimulation::new(Vec3::new(0.0, 0.0, 0.0));
        sim.start_preview();
        let keys = MovementKeys::default();
        for _ in 0..10 {
            tick(&mut sim, &keys, &level);
        }
        assert_eq!(sim.avatar().fall_state, FallState::OnGround);
        assert!(sim.avatar().touching_ground);
        assert!(sim.avatar().preview_position.y.abs() < 1e-3);
    }

    #[test]
    fn test_walking_moves_horizontally() {
        let level = floor_level();
        let mut sim = CursorSimulation::new(Vec3::ZERO);
        sim.start_preview();
        let mut keys = MovementKeys::default();
        keys.handle_key(KeyCode::W, true);
        for _ in 0..60 {
            tick(&mut sim, &keys, &level);
        }
        // One second of walking at 120 u/s, camera at yaw 0 heads -Z.
        let pos = sim.avatar().preview_position;
        assert!((pos.z - (-120.0)).abs() < 1.0, "z = {}", pos.z);
        assert!(pos.x.abs() < 1.0);
    }

    #[test]
    fn test_step_off_ledge_falls_then_lands() {
        let mut level = Level::default();
        // Platform under the start, deep floor farther out.
        level.colliders.push(Collider {
            name: "platform".into(),
            hidden: false,
            ignore_player: false,
            shape: Some(Aabb::new(
                Vec3::new(-50.0, -10.0, -50.0),
                Vec3::new(50.0, 0.0, 50.0),
            )),
        });
        level.colliders.push(Collider {
            name: "floor".into(),
            hidden: false,
            ignore_player: false,
            shape: Some(Aabb::new(
                Vec3::new(-1000.0, -60.0, -1000.0),
                Vec3::new(1000.0, -50.0, 1000.0),
            )),
        });

        let mut sim = CursorSimulation::new(Vec3::ZERO);
        sim.start_preview();
        let mut keys = MovementKeys::default();
        keys.handle_key(KeyCode::W, true);

        let mut fell = false;
        for _ in 0..300 {
            tick(&mut sim, &keys, &level);
            if sim.avatar().fall_state == FallState::Fall {
                fell = true;
                keys.handle_key(KeyCode::W, false);
            }
        }
        assert!(fell, "never left the platform");
        assert_eq!(sim.avatar().fall_state, FallState::OnGround);
        let y = sim.avatar().preview_position.y;
        assert!((y - (-50.0)).abs() < 1.5, "rest height {y}");
    }

    #[test]
    fn test_jump_requires_release_first() {
        let level = floor_level();
        let mut sim = CursorSimulation::new(Vec3::ZERO);
        sim.start_preview();

        // Held from the very first tick: never armed, never jumps.
        let mut keys = MovementKeys::default();
        keys.handle_key(KeyCode::Space, true);
        for _ in 0..20 {
            tick(&mut sim, &keys, &level);
        }
        assert_eq!(sim.avatar().fall_state, FallState::OnGround);

        // Release, then press: jump starts.
        keys.handle_key(KeyCode::Space, false);
        tick(&mut sim, &keys, &level);
        keys.handle_key(KeyCode::Space, true);
        tick(&mut sim, &keys, &level);
        assert_eq!(sim.avatar().fall_state, FallState::Jump);
    }

    #[test]
    fn test_jump_arc_rises_and_returns() {
        let level = floor_level();
        let mut sim = CursorSimulation::new(Vec3::ZERO);
        sim.start_preview();
        let mut keys = MovementKeys::default();

        // Arm and start the jump.
        keys.handle_key(KeyCode::Space, true);
        tick(&mut sim, &keys, &level);
        keys.handle_key(KeyCode::Space, false);
        tick(&mut sim, &keys, &level);
        keys.handle_key(KeyCode::Space, true);

        let mut max_y = 0.0f32;
        for _ in 0..600 {
            tick(&mut sim, &keys, &level);
            max_y = max_y.max(sim.avatar().preview_position.y);
            if sim.avatar().fall_state == FallState::OnGround
                && sim.avatar().preview_position.y < 1.0
            {
                break;
            }
        }
        assert!(max_y > 20.0, "jump peaked at {max_y}");
        assert_eq!(sim.avatar().fall_state, FallState::OnGround);
    }

    #[test]
    fn test_void_fall_recovers_to_last_ground() {
        // No geometry at all: the avatar falls from the start.
        let level = Level::default();
        let mut sim = CursorSimulation::new(Vec3::new(5.0, 0.0, 5.0));
        sim.start_preview();
        let keys = MovementKeys::default();

        // First tick flips to Fall; once the fall timer passes 2 seconds
        // the next tick teleports back to the last ground position.
        let mut ticks = 0;
        loop {
            tick(&mut sim, &keys, &level);
            ticks += 1;
            if sim.avatar().fall_state == FallState::OnGround {
                break;
            }
            assert!(ticks < 200, "never recovered");
        }
        assert!(ticks > 120, "recovered after only {ticks} ticks");
        assert_eq!(sim.avatar().preview_position, Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_hover_rises_and_skips_physics() {
        let level = floor_level();
        let mut sim = CursorSimulation::new(Vec3::ZERO);
        sim.start_preview();
        let mut keys = MovementKeys::default();
        keys.handle_key(KeyCode::H, true);

        for _ in 0..60 {
            tick(&mut sim, &keys, &level);
        }
        let avatar = sim.avatar();
        assert!(avatar.hovering);
        assert_eq!(avatar.fall_state, FallState::Fall);
        assert!((avatar.preview_position.y - 120.0 * 60.0 / 60.0).abs() < 1.0);
        assert_eq!(avatar.last_valid_cam_height, avatar.preview_position.y);

        // Releasing hover drops the avatar back toward the floor.
        keys.handle_key(KeyCode::H, false);
        for _ in 0..600 {
            tick(&mut sim, &keys, &level);
            if sim.avatar().fall_state == FallState::OnGround {
                break;
            }
        }
        assert_eq!(sim.avatar().fall_state, FallState::OnGround);
    }

    #[test]
    fn test_end_preview_commits_position() {
        let level = floor_level();
        let mut sim = CursorSimulation::new(Vec3::ZERO);
        sim.start_preview();
        let mut keys = MovementKeys::default();
        keys.handle_key(KeyCode::W, true);
        for _ in 0..30 {
            tick(&mut sim, &keys, &level);
        }
        let walked = sim.avatar().preview_position;
        sim.end_preview();
        assert_eq!(sim.position(), walked);
        assert_eq!(sim.avatar().position, walked);
    }

    #[test]
    fn test_focus_loss_zeroes_movement() {
        let level = floor_level();
        let mut sim = CursorSimulation::new(Vec3::ZERO);
        sim.start_preview();
        let mut keys = MovementKeys::default();
        keys.handle_key(KeyCode::W, true);
        sim.tick(
            &keys,
            &level,
            &AabbProbe,
            &PlaySettings::default(),
            0.0,
            1.0 / 60.0,
            false, // no focus
            true,
        );
        // Intent still resolves from the keys, but a keyless tick with no
        // focus stays put.
        let keys = MovementKeys::default();
        let before = sim.avatar().preview_position;
        sim.tick(
            &keys,
            &level,
            &AabbProbe,
            &PlaySettings::default(),
            0.0,
            1.0 / 60.0,
            false,
            true,
        );
        let after = sim.avatar().preview_position;
        assert_eq!(before.x, after.x);
        assert_eq!(before.z, after.z);
    }
}
