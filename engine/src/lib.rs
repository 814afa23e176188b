//! Mapwalk Engine Library
//!
//! The play-in-editor core of the map editor: a faithful reproduction of the
//! retail game's avatar physics so designers can possess an in-world avatar
//! and walk it through the level being edited, plus the state machine that
//! drives level-exit streaming (screen fade, background level load, avatar
//! placement at the destination) exactly as the shipped game does.
//!
//! The surrounding tool (GUI shell, renderer, undo/redo, scene editing, file
//! formats) lives elsewhere and talks to this crate through a handful of
//! seams: [`physics::CollisionProbe`] for ray queries against level
//! geometry, [`level::LevelSource`] for locating and loading levels, and
//! [`transition::TransitionHost`] for UI-thread callbacks.
//!
//! # Modules
//!
//! - [`input`] - Platform-agnostic movement/jump key state
//! - [`physics`] - Collision probe seam and the stock AABB probe
//! - [`player`] - Avatar state, movement intent, gravity tables, collision resolution
//! - [`level`] - Level data model, exit triggers, loading
//! - [`transition`] - Level-transition state machine and fade timing
//! - [`session`] - Per-frame wiring of simulation + transition
//!
//! # Example
//!
//! ```rust,ignore
//! use mapwalk_engine::config::PlaySettings;
//! use mapwalk_engine::level::JsonLevelSource;
//! use mapwalk_engine::physics::AabbProbe;
//! use mapwalk_engine::session::PlaySession;
//!
//! let source = std::sync::Arc::new(JsonLevelSource::new("maps"));
//! let level = source.load_by_name("field_02")?;
//! let mut session = PlaySession::new(level, PlaySettings::default());
//!
//! // Each editor frame:
//! session.update(&AabbProbe, &source, &mut host, &keys, camera_yaw, dt, true);
//! ```

pub mod config;
pub mod input;
pub mod level;
pub mod mathutil;
pub mod physics;
pub mod player;
pub mod session;
pub mod transition;

pub use config::PlaySettings;
pub use input::{JumpEdge, KeyCode, MovementKeys};
pub use level::{Collider, ExitTrigger, Level, LevelError, LevelSource, Marker, ObjectId};
pub use physics::{AabbProbe, CollisionProbe, ProbeHit};
pub use player::{AvatarState, CursorSimulation, FallState};
pub use session::PlaySession;
pub use transition::{MapTransitionController, TransitionHost, TransitionPhase};
