//! Level-transition state machine.
//!
//! Coordinates everything that happens between the avatar stepping onto an
//! exit trigger and walking into the destination level: the screen fade,
//! the background level load, the save prompt for modified levels, the
//! backup check on the freshly loaded level, and avatar placement at the
//! destination marker.
//!
//! The controller runs on the simulation tick thread. Anything that must
//! happen on the UI thread (save prompt, backup check, opening the level)
//! goes through the [`TransitionHost`] seam as a request/poll pair, so the
//! controller tolerates arbitrary latency while parked. The background
//! level load publishes its single result through an mpsc channel polled
//! once per frame; there is no cancellation and at most one load in flight.
//!
//! Two phases exist purely to burn a frame: [`TransitionPhase::OpenMap`]
//! lets the fully faded frame render once before the level swap, and
//! [`TransitionPhase::EnterInit`] keeps the swap's oversized delta-time out
//! of the entering fade.

use std::sync::Arc;

use glam::Vec3;
use log::{error, warn};

use crate::config::PlaySettings;
use crate::level::{ExitDetector, Level, LevelError, LevelLoadJob, LevelSource};
use crate::mathutil::lerp_range;
use crate::physics::CollisionProbe;
use crate::player::{CursorSimulation, WALK_SPEED};

/// Seconds the exit fade takes (fade ramps over the second half).
pub const EXIT_TIME: f32 = 0.5;

/// Seconds the enter fade takes (fade clears over the first half).
pub const ENTER_TIME: f32 = 0.5;

/// Units behind the destination marker the avatar is placed on entry.
const ENTRY_DISTANCE: f32 = 60.0;

/// Phase tag of the transition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// Idle; polling the exit detector.
    #[default]
    None,
    /// An exit trigger was selected; resolve the destination next frame.
    ChoseMap,
    /// Parked while the save prompt is outstanding on the UI thread.
    LoadingMap,
    /// Destination resolved; launch the background load and start exiting.
    ReadyToLoad,
    /// The load (or the save prompt) failed; clean up next frame.
    LoadingFailed,
    /// Walking out through the exit while the screen fades to black.
    Exiting,
    /// Waiting for the UI thread's backup check on the loaded level.
    CheckMap,
    /// One fully faded frame, then swap the level in.
    OpenMap,
    /// One frame to skip the level swap's delta-time spike; places the avatar.
    EnterInit,
    /// Walking in from the entry marker while the screen fade clears.
    Entering,
}

/// Fade amount during the exit: 0 through the first half, ramping to 1 at
/// the full exit duration.
pub fn exit_fade(timer: f32) -> f32 {
    lerp_range(timer, EXIT_TIME / 2.0, EXIT_TIME, 0.0, 1.0)
}

/// Fade amount during the enter: 1 clearing to 0 across the first half.
pub fn enter_fade(timer: f32) -> f32 {
    lerp_range(timer, 0.0, ENTER_TIME / 2.0, 1.0, 0.0)
}

/// UI-thread collaborator for the transition controller.
///
/// Requests are fire-and-forget; the matching poll is called once per frame
/// until it yields. Both prompts may take any number of frames to resolve.
pub trait TransitionHost {
    /// Ask the user whether to save the modified level before leaving.
    fn request_save_confirmation(&mut self);

    /// Result of the save prompt: `Some(false)` means cancelled, treated
    /// exactly like a load failure.
    fn poll_save_confirmation(&mut self) -> Option<bool>;

    /// Hand the freshly loaded level to the UI thread for its backup check.
    fn request_backup_check(&mut self, level: Level);

    /// The checked (possibly backup-replaced) level, once available.
    fn poll_backup_check(&mut self) -> Option<Level>;

    /// The destination level is about to become current; synchronize
    /// visibility flags and any other per-level editor state.
    fn level_opened(&mut self, level: &mut Level);
}

/// State machine coordinating fade timing, asynchronous level loading, and
/// avatar placement at the destination.
pub struct MapTransitionController {
    phase: TransitionPhase,
    timer: f32,
    fade: f32,
    detector: ExitDetector,
    dest_path: Option<std::path::PathBuf>,
    load_job: Option<LevelLoadJob>,
    load_result: Option<Result<Level, LevelError>>,
    pending_level: Option<Level>,
}

impl MapTransitionController {
    pub fn new() -> Self {
        Self {
            phase: TransitionPhase::None,
            timer: 0.0,
            fade: 0.0,
            detector: ExitDetector::new(),
            dest_path: None,
            load_job: None,
            load_result: None,
            pending_level: None,
        }
    }

    /// Current phase tag.
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Normalized screen-fade opacity for the renderer.
    pub fn fade_amount(&self) -> f32 {
        self.fade
    }

    /// Whether the avatar may take player input this frame. The controller
    /// owns the heading while the fades walk the avatar through markers.
    pub fn allows_input(&self) -> bool {
        self.phase != TransitionPhase::Exiting && self.phase != TransitionPhase::Entering
    }

    /// Advance the state machine one frame.
    ///
    /// `trace_origin` is the point just above the avatar's feet the exit
    /// detector probes down from.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        level: &mut Level,
        sim: &mut CursorSimulation,
        probe: &dyn CollisionProbe,
        source: &Arc<dyn LevelSource>,
        host: &mut dyn TransitionHost,
        settings: &PlaySettings,
        trace_origin: Vec3,
    ) {
        if !settings.enable_map_exits {
            self.phase = TransitionPhase::None;
            self.fade = 0.0;
        }

        match self.phase {
            TransitionPhase::None => {
                // Reap a load abandoned by a mid-flight disable without
                // ever blocking on the worker.
                if let Some(job) = &mut self.load_job {
                    if job.poll().is_some() {
                        self.load_job = None;
                    }
                    return;
                }
                if self.detector.scan(level, probe, trace_origin) {
                    self.phase = TransitionPhase::ChoseMap;
                }
            }

            TransitionPhase::ChoseMap => {
                let Some(dest_name) = self.detector.dest_level().map(str::to_owned) else {
                    self.phase = TransitionPhase::LoadingFailed;
                    return;
                };

                self.phase = TransitionPhase::LoadingMap;
                match source.resolve(&dest_name) {
                    None => {
                        warn!("destination level `{dest_name}` does not exist");
                        self.phase = TransitionPhase::LoadingFailed;
                    }
                    Some(path) => {
                        self.dest_path = Some(path);
                        if !level.modified {
                            self.phase = TransitionPhase::ReadyToLoad;
                        } else {
                            // Park in LoadingMap until the prompt resolves.
                            host.request_save_confirmation();
                        }
                    }
                }
            }

            TransitionPhase::LoadingMap => match host.poll_save_confirmation() {
                Some(true) => self.phase = TransitionPhase::ReadyToLoad,
                Some(false) => self.phase = TransitionPhase::LoadingFailed,
                None => {}
            },

            TransitionPhase::ReadyToLoad => {
                let Some(path) = self.dest_path.take() else {
                    self.phase = TransitionPhase::LoadingFailed;
                    return;
                };

                // Load the level on a worker thread; the tick loop keeps
                // running and polls for the result during the fade.
                self.load_result = None;
                self.load_job = Some(LevelLoadJob::spawn(source.clone(), path));

                self.timer = 0.0;

                // Walk the avatar out through the exit marker. Marker yaw
                // is rotated 90 degrees from movement yaw: movement goes
                // from +X toward +Z, markers from -Z toward +X.
                if let Some(marker) = self
                    .detector
                    .exit_marker()
                    .and_then(|name| level.find_marker(name))
                {
                    let yaw = (180.0 + marker.yaw - 90.0).to_radians();
                    sim.set_move_heading(WALK_SPEED, yaw);
                } else {
                    warn!("exit marker missing, leaving heading unchanged");
                }

                self.phase = TransitionPhase::Exiting;
            }

            TransitionPhase::LoadingFailed => {
                error!("level transition failed, returning to play");
                self.fade = 0.0;
                self.phase = TransitionPhase::None;
                sim.set_move_heading(0.0, 0.0);
                self.dest_path = None;
                self.load_result = None;
                self.pending_level = None;
            }

            TransitionPhase::Exiting => {
                self.timer += dt;
                self.fade = exit_fade(self.timer);

                if let Some(job) = &mut self.load_job {
                    if let Some(result) = job.poll() {
                        self.load_result = Some(result);
                        self.load_job = None;
                    }
                }

                if self.timer >= EXIT_TIME {
                    self.timer = EXIT_TIME;
                    sim.set_move_heading(0.0, 0.0);

                    match self.load_result.take() {
                        Some(Ok(dest)) => {
                            self.phase = TransitionPhase::CheckMap;
                            host.request_backup_check(dest);
                        }
                        Some(Err(err)) => {
                            error!("cannot open destination: {err}");
                            self.phase = TransitionPhase::LoadingFailed;
                        }
                        // Load still running: hold the fade until it lands.
                        None => {}
                    }
                }
            }

            TransitionPhase::CheckMap => {
                if let Some(checked) = host.poll_backup_check() {
                    self.pending_level = Some(checked);
                    self.phase = TransitionPhase::OpenMap;
                }
            }

            TransitionPhase::OpenMap => {
                // The previous frame rendered fully faded; swap now.
                if let Some(mut dest) = self.pending_level.take() {
                    host.level_opened(&mut dest);
                    *level = dest;
                    sim.start_preview();
                }
                self.phase = TransitionPhase::EnterInit;
            }

            TransitionPhase::EnterInit => {
                // One frame gap so the level swap's delta-time spike never
                // reaches the entering fade.
                if let Some(marker) = self
                    .detector
                    .dest_marker()
                    .and_then(|name| level.find_marker(name))
                {
                    let yaw = (marker.yaw - 90.0).to_radians();
                    sim.set_move_heading(WALK_SPEED, yaw);
                    let entry = marker.position;
                    sim.set_position(Vec3::new(
                        entry.x - ENTRY_DISTANCE * yaw.cos(),
                        entry.y,
                        entry.z - ENTRY_DISTANCE * yaw.sin(),
                    ));
                } else {
                    warn!("destination marker missing, entering at origin");
                    sim.set_position(Vec3::ZERO);
                    sim.set_move_heading(0.0, 0.0);
                }
                self.phase = TransitionPhase::Entering;
                self.timer = 0.0;
            }

            TransitionPhase::Entering => {
                self.fade = enter_fade(self.timer);
                self.timer += dt;

                if self.timer >= ENTER_TIME {
                    self.fade = 0.0;
                    self.timer = 0.0;
                    self.phase = TransitionPhase::None;
                }
            }
        }
    }
}

impl Default for MapTransitionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exit_fade_envelope() {
        assert_eq!(exit_fade(0.0), 0.0);
        // First half stays clear.
        assert_eq!(exit_fade(EXIT_TIME / 2.0), 0.0);
        assert_relative_eq!(exit_fade(EXIT_TIME * 0.75), 0.5);
        assert_eq!(exit_fade(EXIT_TIME), 1.0);
        assert_eq!(exit_fade(EXIT_TIME * 2.0), 1.0);
    }

    #[test]
    fn test_enter_fade_envelope() {
        assert_eq!(enter_fade(0.0), 1.0);
        assert_relative_eq!(enter_fade(ENTER_TIME / 4.0), 0.5);
        assert_eq!(enter_fade(ENTER_TIME / 2.0), 0.0);
        assert_eq!(enter_fade(ENTER_TIME), 0.0);
    }

    #[test]
    fn test_input_gating_by_phase() {
        let mut c = MapTransitionController::new();
        assert!(c.allows_input());
        c.phase = TransitionPhase::Exiting;
        assert!(!c.allows_input());
        c.phase = TransitionPhase::Entering;
        assert!(!c.allows_input());
        c.phase = TransitionPhase::CheckMap;
        assert!(c.allows_input());
    }
}
