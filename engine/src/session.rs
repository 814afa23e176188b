//! Per-frame wiring of the play-in-editor pieces.
//!
//! [`PlaySession`] owns the current level, the avatar simulation, the
//! transition controller and the play settings, and advances them in the
//! editor's frame order: gate input while a fade owns the avatar, tick the
//! simulation, build the below-avatar ray, then poll the transition state
//! machine.

use std::sync::Arc;

use glam::Vec3;

use crate::config::PlaySettings;
use crate::input::MovementKeys;
use crate::level::{Level, LevelSource};
use crate::physics::CollisionProbe;
use crate::player::CursorSimulation;
use crate::transition::{MapTransitionController, TransitionHost};

/// Height above the avatar's feet the exit-detector ray starts from.
const TRACE_ABOVE_FEET: f32 = 10.0;

/// One active play-in-editor session.
pub struct PlaySession {
    pub level: Level,
    pub sim: CursorSimulation,
    pub transition: MapTransitionController,
    pub settings: PlaySettings,
}

impl PlaySession {
    /// Create a session over `level` with the avatar's cursor at `start`.
    pub fn new(level: Level, settings: PlaySettings, start: Vec3) -> Self {
        Self {
            level,
            sim: CursorSimulation::new(start),
            transition: MapTransitionController::new(),
            settings,
        }
    }

    /// Enter play mode (possess the avatar).
    pub fn enter_play(&mut self) {
        self.sim.start_preview();
    }

    /// Leave play mode, committing the avatar's position to the editor.
    pub fn leave_play(&mut self) {
        self.sim.end_preview();
    }

    /// Advance one editor frame.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        probe: &dyn CollisionProbe,
        source: &Arc<dyn LevelSource>,
        host: &mut dyn TransitionHost,
        keys: &MovementKeys,
        camera_yaw_deg: f32,
        dt: f32,
        has_focus: bool,
    ) {
        // While a fade is walking the avatar, the transition controller
        // owns the heading and player input is ignored.
        let allow_input = self.transition.allows_input();

        self.sim.tick(
            keys,
            &self.level,
            probe,
            &self.settings,
            camera_yaw_deg,
            dt,
            has_focus,
            allow_input,
        );

        let feet = self.sim.position();
        let trace_origin = Vec3::new(feet.x, feet.y + TRACE_ABOVE_FEET, feet.z);

        self.transition.update(
            dt,
            &mut self.level,
            &mut self.sim,
            probe,
            source,
            host,
            &self.settings,
            trace_origin,
        );
    }
}
