//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules engine, terminal rendering, input mapping).
//!
//! # Grid Dimensions
//!
//! The playfield size is derived from a notional screen and block size:
//!
//! - **Width**: `DEFAULT_SCREEN_WIDTH / DEFAULT_BLOCK_SIZE` = 15 columns
//! - **Height**: `DEFAULT_SCREEN_HEIGHT / DEFAULT_BLOCK_SIZE` = 31 rows
//! - Row 0 is the top of the visible grid; pieces may sit above it (negative y)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval used by the terminal runner (~60 FPS) |
//! | `DEFAULT_BASE_FALL_MS` | 1000 | Gravity at level 1 on normal difficulty |
//! | `DEFAULT_MIN_FALL_MS` | 50 | Gravity floor |
//! | `FAST_FALL_MS` | 50 | Gravity while soft drop is held |
//! | `MOVE_DELAY_MS` | 150 | Held direction: delay before the first repeat |
//! | `MOVE_REPEAT_MS` | 50 | Held direction: interval between repeats |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Difficulty, ShapeId, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
//!
//! assert_eq!(ShapeId::T.index(), 0);
//! assert_eq!(ShapeId::ALL[4], ShapeId::I);
//!
//! assert_eq!(Difficulty::from_str("very hard"), Some(Difficulty::VeryHard));
//! assert_eq!(Difficulty::Hard.base_fall_ms(), 600);
//!
//! assert_eq!(DEFAULT_GRID_WIDTH, 15);
//! assert_eq!(DEFAULT_GRID_HEIGHT, 31);
//! ```

/// Notional screen width in pixels
pub const DEFAULT_SCREEN_WIDTH: u32 = 450;

/// Notional screen height in pixels
pub const DEFAULT_SCREEN_HEIGHT: u32 = 930;

/// Pixels per grid cell
pub const DEFAULT_BLOCK_SIZE: u32 = 30;

/// Grid width in cells (15 columns)
pub const DEFAULT_GRID_WIDTH: u16 = (DEFAULT_SCREEN_WIDTH / DEFAULT_BLOCK_SIZE) as u16;

/// Grid height in cells (31 rows)
pub const DEFAULT_GRID_HEIGHT: u16 = (DEFAULT_SCREEN_HEIGHT / DEFAULT_BLOCK_SIZE) as u16;

/// Largest supported grid height. Bounds the stack buffer used for cleared rows.
pub const MAX_GRID_HEIGHT: u16 = 64;

/// Largest supported grid width.
pub const MAX_GRID_WIDTH: u16 = 64;

/// Frame interval used by the terminal runner (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Base gravity interval at level 1 (normal difficulty)
pub const DEFAULT_BASE_FALL_MS: u32 = 1000;

/// Gravity never gets faster than this
pub const DEFAULT_MIN_FALL_MS: u32 = 50;

/// Per-level gravity decay factor
pub const DEFAULT_FALL_DECAY: f64 = 0.85;

/// Gravity interval while soft drop is held
pub const FAST_FALL_MS: u32 = 50;

/// Delay before a held direction starts repeating
pub const MOVE_DELAY_MS: u32 = 150;

/// Interval between repeats of a held direction
pub const MOVE_REPEAT_MS: u32 = 50;

/// Maximum number of next pieces exposed for preview
pub const MAX_PREVIEW: usize = 5;

/// Points per cleared line (flat, no multi-line curve)
pub const POINTS_PER_LINE: u32 = 100;

/// Points per row travelled by a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Number of distinct piece colors
pub const NUM_COLORS: u8 = 7;

/// Rows from the top that count as the danger zone
pub const DANGER_ZONE_ROWS: u16 = 4;

/// Lines cleared by a single lock that count as a "Tetris"
pub const TETRIS_LINES: u32 = 4;

/// The seven tetromino shapes, in catalog order
///
/// The catalog order fixes each shape's identity index (0..7), which feeds
/// the color formula `(index + level - 1) % 7 + 1`:
/// - **T** (0), **O** (1), **Z** (2), **S** (3), **I** (4), **J** (5), **L** (6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeId {
    T,
    O,
    Z,
    S,
    I,
    J,
    L,
}

impl ShapeId {
    /// All shapes in catalog order
    pub const ALL: [ShapeId; 7] = [
        ShapeId::T,
        ShapeId::O,
        ShapeId::Z,
        ShapeId::S,
        ShapeId::I,
        ShapeId::J,
        ShapeId::L,
    ];

    /// Catalog index (0..7)
    pub fn index(self) -> u8 {
        match self {
            ShapeId::T => 0,
            ShapeId::O => 1,
            ShapeId::Z => 2,
            ShapeId::S => 3,
            ShapeId::I => 4,
            ShapeId::J => 5,
            ShapeId::L => 6,
        }
    }
}

/// Semantic commands consumed by the rules engine
///
/// Held controls come in down/up pairs; the rest are one-shot.
/// The engine knows nothing about keyboards or controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeftDown,
    MoveLeftUp,
    MoveRightDown,
    MoveRightUp,
    /// Start fast fall
    SoftDropDown,
    /// Stop fast fall
    SoftDropUp,
    /// Rotate 90° clockwise with wall kicks
    Rotate,
    /// Drop to the lowest legal row and lock immediately
    HardDrop,
    /// Swap with the hold slot (once per piece)
    Hold,
    /// Toggle pause state
    TogglePause,
    /// Start a fresh session
    Restart,
}

/// Difficulty presets select the base gravity interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub fn base_fall_ms(self) -> u32 {
        match self {
            Difficulty::Easy => 1500,
            Difficulty::Normal => DEFAULT_BASE_FALL_MS,
            Difficulty::Hard => 600,
            Difficulty::VeryHard => 400,
        }
    }

    /// Accepts "easy", "normal", "hard", "very hard" / "very_hard" / "veryhard"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "veryhard" => Some(Difficulty::VeryHard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very hard",
        }
    }
}

/// A cell on the game board
///
/// - `0`: Empty cell
/// - `1..=7`: Locked cell with that color index
pub type Cell = u8;

/// Empty cell value
pub const EMPTY: Cell = 0;

/// Tagged result of a piece operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece moved (or rotated) and is still falling
    Moved,
    /// The attempt was illegal; nothing changed
    Rejected,
    /// The piece locked into the board and the next piece spawned
    Locked(LockEvent),
    /// The next piece could not spawn; the session is over
    GameOver,
}

impl MoveOutcome {
    pub fn is_game_over(&self) -> bool {
        matches!(self, MoveOutcome::GameOver)
    }
}

/// Emitted after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Rows travelled by the hard drop that caused this lock (0 for gravity locks)
    pub hard_drop_rows: u32,
    pub level_up: bool,
    pub tetris: bool,
}
