//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into the engine's semantic
//! [`Command`](crate::types::Command)s. Held controls (left, right, soft drop)
//! become down/up command pairs; everything else is a one-shot command.
//! Repeating a held direction is the engine's job, not this crate's.
//!
//! Terminals that never report key releases are handled by
//! [`InputHandler`], which synthesizes the up command after a timeout.

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::{InputHandler, DEFAULT_KEY_RELEASE_TIMEOUT_MS};
pub use map::{held_key, one_shot_command, should_quit, HeldKey};
