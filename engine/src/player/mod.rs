//! Player Module
//!
//! The possessable avatar: movement intent, the retail game's tabulated
//! gravity integrator and fall-state machine, the multi-ray collision
//! resolution, and the per-tick simulation that orchestrates them.
//!
//! The physics here reproduces the shipped console game rather than doing
//! anything physically principled: fixed tables tuned for 30 Hz, a handful
//! of raycasts per tick, and a couple of long-shipped quirks that the
//! game's movement feel depends on (see [`probes`] and [`lateral`]). The
//! point of play-in-editor is that walking a level here matches walking it
//! in game, quirks included.
//!
//! # Components
//!
//! - [`intent`] - Raw directional input + camera yaw -> heading and speed
//! - [`gravity`] - Fall-state machine and the 4-register integrator tables
//! - [`probes`] - Ground and ceiling probe fans
//! - [`lateral`] - Forward/whisker/cardinal horizontal collision resolution
//! - [`simulation`] - [`AvatarState`] and the per-tick orchestration

pub mod gravity;
pub mod intent;
pub mod lateral;
pub mod probes;
pub mod simulation;

pub use gravity::{FALL_TABLE, FallState, GravityIntegrator, JUMP_TABLE};
pub use simulation::{AvatarState, CursorSimulation};

/// Height of the avatar's collision cylinder, in world units.
pub const COLLISION_HEIGHT: f32 = 37.0;

/// Radius of the avatar's collision cylinder, in world units.
pub const COLLISION_RADIUS: f32 = 13.0;

/// Walking speed in units per second.
pub const WALK_SPEED: f32 = 120.0;

/// Sprinting speed in units per second.
pub const SPRINT_SPEED: f32 = 300.0;

/// Vertical rise rate while hover mode is held, units per second.
pub const HOVER_RISE_SPEED: f32 = 120.0;

/// Seconds of continuous falling before void recovery teleports the avatar
/// back to its last ground position.
pub const VOID_FALL_TIME: f32 = 2.0;
