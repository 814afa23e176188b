//! Physics module for the play-in-editor simulator.
//!
//! The simulator itself never intersects geometry; it issues ray queries
//! through the [`CollisionProbe`] seam and interprets the answers. The
//! editor supplies a triangle-accurate probe backed by its picking system;
//! this crate ships [`AabbProbe`], a collider-proxy implementation used by
//! the tests and the headless demo.
//!
//! Worst case the avatar issues ~15 rays per tick (2 forward + 2 whisker +
//! 4 cardinal + 5 ground + up to 4 ceiling); probes are expected to be cheap
//! synchronous calls.
//!
//! # Submodules
//!
//! - [`probe`] - `ProbeHit` and the `CollisionProbe` trait
//! - [`aabb`] - Slab-method ray-AABB intersection and the stock probe
//! - [`candidates`] - Per-tick collision candidate filtering

pub mod aabb;
pub mod candidates;
pub mod probe;

pub use aabb::{Aabb, AabbProbe, aabb_surface_normal, ray_aabb_intersect};
pub use candidates::collect_candidates;
pub use probe::{CollisionProbe, ProbeHit};
