//! Core rules engine - pure, deterministic, and testable
//!
//! This crate holds every rule of the game: what piece is where, which moves
//! are legal, when rows clear and how the pace escalates. It performs no I/O;
//! time comes in as caller-supplied milliseconds and state goes out as a
//! [`GameSnapshot`].
//!
//! # Module Structure
//!
//! - [`shape`]: the seven tetromino matrices, clockwise rotation, identity lookup
//! - [`rng`]: seeded LCG and the 7-bag randomizer
//! - [`board`]: grid of locked cells, collision checks, row clearing
//! - [`controller`]: the falling piece, wall kicks, hold, gravity, auto-shift
//! - [`progression`]: score, lines, level and the gravity curve
//! - [`session`]: ties it all together behind semantic commands
//! - [`snapshot`]: read-only state for presentation layers
//! - [`config`]: validated engine configuration
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every shape appears once per seven draws
//! - **Simple wall kicks**: rotation tries six fixed offsets in order
//! - **Flat scoring**: 100 points per line, 2 points per hard-dropped row
//! - **Levels**: one per 10 lines; gravity decays by 0.85 per level down to 50ms
//! - **Hold**: once per piece, the held shape keeps its rotation
//! - **Game over**: a piece that cannot spawn ends the session
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameSession};
//! use blockfall_core::types::{Command, MoveOutcome};
//!
//! let mut session = GameSession::new(GameConfig::new(12345), None, 0).unwrap();
//!
//! session.apply(Command::MoveRightDown, 0);
//! session.apply(Command::MoveRightUp, 0);
//! session.apply(Command::Rotate, 0);
//! let outcome = session.apply(Command::HardDrop, 0);
//!
//! assert!(matches!(outcome, MoveOutcome::Locked(_)));
//! assert!(session.score() > 0); // Hard drop awards points
//! assert_eq!(session.pieces_dropped(), 1);
//! ```
//!
//! # Timing
//!
//! Call [`GameSession::step`] once per frame with the pending commands and the
//! current monotonic time. Gravity runs when more than the level interval (or
//! the 50ms fast-fall interval while soft drop is held) has passed since the
//! last fall step; held directions repeat after 150ms, then every 50ms.

pub mod board;
pub mod config;
pub mod controller;
pub mod progression;
pub mod rng;
pub mod session;
pub mod shape;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, GameConfig};
pub use controller::{color_for, ActivePiece, PieceController, KICKS};
pub use progression::{FallCurve, Progression};
pub use rng::{Bag, SimpleRng};
pub use session::{GameSession, HighScore};
pub use shape::{canonical, identify, Shape, ShapeError};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
