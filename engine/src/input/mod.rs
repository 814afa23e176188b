//! Input Module
//!
//! Platform-agnostic key state for the play-in-editor avatar. Decoupled from
//! any specific windowing system so the GUI shell can feed events from
//! whatever toolkit it uses.
//!
//! # Example
//!
//! ```rust,ignore
//! use mapwalk_engine::input::{KeyCode, MovementKeys};
//!
//! let mut keys = MovementKeys::new();
//! keys.handle_key(KeyCode::W, true);
//! if keys.forward {
//!     // avatar walks camera-forward
//! }
//! ```

pub mod keyboard;

pub use keyboard::{JumpEdge, KeyCode, MovementKeys};
