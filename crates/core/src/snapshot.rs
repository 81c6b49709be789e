//! Read-only view of a session for presentation layers
//!
//! A snapshot is filled in one call after a step completes, so it never
//! mixes state from before and after an operation. `snapshot_into` reuses the
//! board buffer of an existing snapshot.

use arrayvec::ArrayVec;

use crate::controller::ActivePiece;
use crate::session::HighScore;
use crate::shape::Shape;
use crate::types::{Cell, ShapeId, EMPTY, MAX_PREVIEW};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub shape: Shape,
    pub x: i16,
    pub y: i16,
    pub color: Cell,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            shape: value.shape,
            x: value.x,
            y: value.y,
            color: value.color,
        }
    }
}

impl ActiveSnapshot {
    /// Absolute grid coordinates of the occupied cells at row offset `y`
    pub fn cells_at(&self, y: i16) -> impl Iterator<Item = (i16, i16)> + '_ {
        let x = self.x;
        self.shape.cells().map(move |(dx, dy)| (x + dx, y + dy))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major locked cells
    pub board: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i16>,
    pub hold: Option<Shape>,
    pub hold_used: bool,
    pub next_queue: ArrayVec<ShapeId, MAX_PREVIEW>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub pieces_dropped: u32,
    pub fall_interval_ms: u32,
    pub paused: bool,
    pub game_over: bool,
    pub danger_zone: bool,
    /// When the most recent 4-line clear happened
    pub tetris_at_ms: Option<u64>,
    /// When the level last went up
    pub level_up_at_ms: Option<u64>,
    pub high_score: Option<HighScore>,
    pub new_high_score: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board.fill(EMPTY);
        self.active = None;
        self.ghost_y = None;
        self.hold = None;
        self.hold_used = false;
        self.next_queue.clear();
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.pieces_dropped = 0;
        self.fall_interval_ms = 0;
        self.paused = false;
        self.game_over = false;
        self.danger_zone = false;
        self.tetris_at_ms = None;
        self.level_up_at_ms = None;
        self.high_score = None;
        self.new_high_score = false;
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.board
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            board: Vec::new(),
            active: None,
            ghost_y: None,
            hold: None,
            hold_used: false,
            next_queue: ArrayVec::new(),
            score: 0,
            level: 1,
            lines: 0,
            pieces_dropped: 0,
            fall_interval_ms: 0,
            paused: false,
            game_over: false,
            danger_zone: false,
            tetris_at_ms: None,
            level_up_at_ms: None,
            high_score: None,
            new_high_score: false,
        }
    }
}
