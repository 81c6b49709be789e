//! Active piece controller - the falling piece and everything that moves it
//!
//! Owns the active piece, the hold slot, the next-piece queue and the bag it
//! is refilled from, plus the two clocks that drive the piece: gravity and
//! horizontal auto-shift. The board and progression are borrowed per call;
//! the session owns them.
//!
//! Every attempt either commits a new position/shape or leaves the piece
//! untouched. Rejections are plain `false` / [`MoveOutcome::Rejected`] values
//! and never log.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::config::GameConfig;
use crate::progression::Progression;
use crate::rng::Bag;
use crate::shape::{canonical, identify, Shape};
use crate::types::{Cell, LockEvent, MoveOutcome, ShapeId, MAX_PREVIEW, NUM_COLORS};

/// Rotation kick offsets, tried in order; the first legal one wins
pub const KICKS: [(i16, i16); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)];

/// Color index for a shape at a given level
///
/// `(identity + level - 1) % 7 + 1`. A shape outside the catalog is a bug
/// elsewhere; it is logged and colored as identity 0.
pub fn color_for(shape: &Shape, level: u32) -> Cell {
    let identity = match identify(shape) {
        Ok(id) => id.index() as u32,
        Err(err) => {
            tracing::warn!(code = err.code(), ?shape, "shape identity lookup failed");
            0
        }
    };
    let colors = NUM_COLORS as u32;
    ((identity + level.saturating_sub(1) % colors) % colors + 1) as Cell
}

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub shape: Shape,
    pub x: i16,
    pub y: i16,
    pub color: Cell,
}

impl ActivePiece {
    /// Place `shape` at the top center of a board `board_width` wide
    pub fn at_spawn(shape: Shape, board_width: u16, color: Cell) -> Self {
        Self {
            shape,
            x: (board_width / 2) as i16 - (shape.width() / 2) as i16,
            y: 0,
            color,
        }
    }

    pub fn fits(&self, board: &Board) -> bool {
        board.is_valid_position(&self.shape, self.x, self.y)
    }

    /// Rows the piece can still fall before resting
    pub fn drop_distance(&self, board: &Board) -> u32 {
        let mut rows = 0;
        while board.is_valid_position(&self.shape, self.x, self.y + rows as i16 + 1) {
            rows += 1;
        }
        rows
    }

    /// Absolute grid coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.shape
            .cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Held-direction state for horizontal auto-shift
#[derive(Debug, Clone, Copy, Default)]
struct AutoShift {
    left: bool,
    right: bool,
    last_move_ms: u64,
    repeating: bool,
}

impl AutoShift {
    /// Direction to repeat, if any; left wins when both are held
    fn direction(&self) -> Option<i16> {
        if self.left {
            Some(-1)
        } else if self.right {
            Some(1)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct PieceController {
    active: Option<ActivePiece>,
    hold: Option<Shape>,
    hold_used: bool,
    next_queue: ArrayVec<ShapeId, MAX_PREVIEW>,
    preview_len: usize,
    bag: Bag,
    fast_fall: bool,
    last_fall_ms: u64,
    shift: AutoShift,
    fast_fall_ms: u32,
    move_delay_ms: u32,
    move_repeat_ms: u32,
    /// Last lock event (consumed by the session).
    last_lock: Option<LockEvent>,
}

impl PieceController {
    /// Create a controller with a filled next queue and no active piece
    pub fn new(config: &GameConfig) -> Self {
        let preview_len = config.preview_len.clamp(1, MAX_PREVIEW);
        let mut bag = Bag::new(config.seed);
        let mut next_queue = ArrayVec::new();
        for _ in 0..preview_len {
            next_queue.push(bag.next());
        }

        Self {
            active: None,
            hold: None,
            hold_used: false,
            next_queue,
            preview_len,
            bag,
            fast_fall: false,
            last_fall_ms: 0,
            shift: AutoShift::default(),
            fast_fall_ms: config.fast_fall_ms,
            move_delay_ms: config.move_delay_ms,
            move_repeat_ms: config.move_repeat_ms,
            last_lock: None,
        }
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn hold(&self) -> Option<Shape> {
        self.hold
    }

    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn next_queue(&self) -> &[ShapeId] {
        &self.next_queue
    }

    pub fn fast_fall(&self) -> bool {
        self.fast_fall
    }

    /// Current bag RNG state
    pub fn bag_seed(&self) -> u32 {
        self.bag.seed()
    }

    /// Take and clear the last lock event.
    pub fn take_last_lock(&mut self) -> Option<LockEvent> {
        self.last_lock.take()
    }

    /// Row the active piece would land on
    pub fn ghost_y(&self, board: &Board) -> Option<i16> {
        let active = self.active?;
        Some(active.y + active.drop_distance(board) as i16)
    }

    /// Spawn `shape` at the top center
    ///
    /// Returns false when the spawn position is illegal (game over); the board
    /// is never touched and no piece becomes active.
    pub fn spawn(&mut self, board: &Board, shape: Shape, level: u32) -> bool {
        let piece = ActivePiece::at_spawn(shape, board.width(), color_for(&shape, level));
        if board.is_game_over(&piece.shape, piece.x, piece.y) {
            self.active = None;
            return false;
        }
        tracing::trace!(?shape, x = piece.x, color = piece.color, "spawn");
        self.active = Some(piece);
        true
    }

    /// Spawn the head of the next queue and top the queue up from the bag
    pub fn spawn_next(&mut self, board: &Board, level: u32) -> bool {
        let id = if self.next_queue.is_empty() {
            self.bag.next()
        } else {
            self.next_queue.remove(0)
        };
        while self.next_queue.len() < self.preview_len {
            self.next_queue.push(self.bag.next());
        }
        self.spawn(board, canonical(id), level)
    }

    /// Move by (dx, dy) if the target position is legal
    pub fn try_move(&mut self, board: &Board, dx: i16, dy: i16) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        if !board.is_valid_position(&active.shape, active.x + dx, active.y + dy) {
            return false;
        }
        self.active = Some(ActivePiece {
            x: active.x + dx,
            y: active.y + dy,
            ..active
        });
        true
    }

    /// Rotate clockwise, trying each offset of [`KICKS`] in order
    pub fn rotate_with_kick(&mut self, board: &Board) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let rotated = active.shape.rotate_cw();
        for (kx, ky) in KICKS {
            let (x, y) = (active.x + kx, active.y + ky);
            if board.is_valid_position(&rotated, x, y) {
                self.active = Some(ActivePiece {
                    shape: rotated,
                    x,
                    y,
                    ..active
                });
                return true;
            }
        }
        false
    }

    pub fn soft_drop(&mut self, board: &Board) -> bool {
        self.try_move(board, 0, 1)
    }

    /// Drop to the resting row, award the bonus and lock immediately
    pub fn hard_drop(&mut self, board: &mut Board, progression: &mut Progression) -> MoveOutcome {
        let Some(active) = self.active else {
            return MoveOutcome::Rejected;
        };
        let rows = active.drop_distance(board);
        self.active = Some(ActivePiece {
            y: active.y + rows as i16,
            ..active
        });
        progression.on_hard_drop(rows);
        self.lock(board, progression, rows)
    }

    /// Swap the active piece with the hold slot, once per piece
    ///
    /// An empty slot takes the active shape and the next piece spawns. An
    /// occupied slot swaps shapes; the incoming shape keeps the rotation it was
    /// held in and spawns at the top center.
    pub fn hold_swap(&mut self, board: &Board, level: u32) -> MoveOutcome {
        if self.hold_used {
            return MoveOutcome::Rejected;
        }
        let Some(active) = self.active else {
            return MoveOutcome::Rejected;
        };

        self.hold_used = true;
        let spawned = match self.hold.replace(active.shape) {
            Some(held) => self.spawn(board, held, level),
            None => self.spawn_next(board, level),
        };
        tracing::debug!(held = ?active.shape, "hold swap");

        if spawned {
            MoveOutcome::Moved
        } else {
            MoveOutcome::GameOver
        }
    }

    /// Lock the active piece: place, clear rows, score, spawn the next piece
    ///
    /// The gravity clock is left alone, so after a hard drop the new piece
    /// falls when the old piece's interval runs out.
    pub fn lock(
        &mut self,
        board: &mut Board,
        progression: &mut Progression,
        hard_drop_rows: u32,
    ) -> MoveOutcome {
        let Some(active) = self.active.take() else {
            return MoveOutcome::Rejected;
        };

        board.place(&active.shape, active.x, active.y, active.color);
        let cleared = board.clear_full_rows();
        let result = progression.on_lines_cleared(cleared.len() as u32);
        if !cleared.is_empty() {
            tracing::debug!(rows = ?cleared.as_slice(), score = progression.score(), "lines cleared");
        }
        if result.level_up {
            tracing::debug!(
                level = progression.level(),
                fall_interval_ms = progression.fall_interval_ms(),
                "level up"
            );
        }

        let event = LockEvent {
            lines_cleared: cleared.len() as u32,
            hard_drop_rows,
            level_up: result.level_up,
            tetris: result.tetris,
        };
        self.last_lock = Some(event);
        self.hold_used = false;

        if self.spawn_next(board, progression.level()) {
            MoveOutcome::Locked(event)
        } else {
            MoveOutcome::GameOver
        }
    }

    /// Run one gravity step if it is due
    ///
    /// Due when more than the current interval (the fast-fall interval while
    /// soft drop is held) has passed since the last step. Returns `None` when
    /// not due.
    pub fn gravity(
        &mut self,
        board: &mut Board,
        progression: &mut Progression,
        now_ms: u64,
    ) -> Option<MoveOutcome> {
        if self.active.is_none() {
            return None;
        }
        let interval = if self.fast_fall {
            self.fast_fall_ms
        } else {
            progression.fall_interval_ms()
        };
        if now_ms.saturating_sub(self.last_fall_ms) <= interval as u64 {
            return None;
        }
        self.last_fall_ms = now_ms;

        if self.soft_drop(board) {
            Some(MoveOutcome::Moved)
        } else {
            Some(self.lock(board, progression, 0))
        }
    }

    pub fn set_fast_fall(&mut self, on: bool) {
        self.fast_fall = on;
    }

    /// Restart both clocks from `now_ms` (session start, resume)
    pub fn reset_clocks(&mut self, now_ms: u64) {
        self.last_fall_ms = now_ms;
        self.shift.last_move_ms = now_ms;
        self.shift.repeating = false;
    }

    /// Direction key pressed: move once immediately and arm the repeat
    pub fn press_direction(&mut self, board: &Board, dx: i16, now_ms: u64) -> bool {
        if dx < 0 {
            self.shift.left = true;
        } else {
            self.shift.right = true;
        }
        self.shift.last_move_ms = now_ms;
        self.shift.repeating = false;
        self.try_move(board, dx, 0)
    }

    pub fn release_direction(&mut self, dx: i16) {
        if dx < 0 {
            self.shift.left = false;
        } else {
            self.shift.right = false;
        }
        self.shift.repeating = false;
    }

    /// Repeat a held direction once its delay has elapsed
    ///
    /// The first repeat waits the move delay, later ones the repeat interval.
    pub fn auto_shift(&mut self, board: &Board, now_ms: u64) -> bool {
        let Some(dx) = self.shift.direction() else {
            return false;
        };
        let wait = if self.shift.repeating {
            self.move_repeat_ms
        } else {
            self.move_delay_ms
        };
        if now_ms.saturating_sub(self.shift.last_move_ms) < wait as u64 {
            return false;
        }
        self.shift.last_move_ms = now_ms;
        self.shift.repeating = true;
        self.try_move(board, dx, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PieceController, Board, Progression) {
        let config = GameConfig::new(12345).with_grid(10, 20);
        let controller = PieceController::new(&config);
        let board = Board::new(10, 20);
        let progression = Progression::new(config.fall_curve());
        (controller, board, progression)
    }

    #[test]
    fn test_spawn_is_top_center() {
        let (mut c, board, _) = setup();
        assert!(c.spawn(&board, canonical(ShapeId::T), 1));
        let a = c.active().unwrap();
        assert_eq!((a.x, a.y), (4, 0));

        assert!(c.spawn(&board, canonical(ShapeId::I), 1));
        assert_eq!(c.active().unwrap().x, 3);

        assert!(c.spawn(&board, canonical(ShapeId::O), 1));
        assert_eq!(c.active().unwrap().x, 4);
    }

    #[test]
    fn test_color_formula_cycles_with_level() {
        let t = canonical(ShapeId::T);
        let l = canonical(ShapeId::L);
        assert_eq!(color_for(&t, 1), 1);
        assert_eq!(color_for(&l, 1), 7);
        assert_eq!(color_for(&l, 2), 1);
        assert_eq!(color_for(&t.rotate_cw(), 3), 3);
    }

    #[test]
    fn test_unknown_shape_colors_as_identity_zero() {
        let dot = Shape::from_rows(&[&[1]]).unwrap();
        assert_eq!(color_for(&dot, 1), 1);
        assert_eq!(color_for(&dot, 4), 4);
    }

    #[test]
    fn test_rotation_kicks_off_right_wall() {
        let (mut c, board, _) = setup();
        // Vertical I one column off the right wall: only (-2, 0) fits
        let vertical = canonical(ShapeId::I).rotate_cw();
        c.active = Some(ActivePiece {
            shape: vertical,
            x: 8,
            y: 5,
            color: 5,
        });
        assert!(c.rotate_with_kick(&board));
        let a = c.active().unwrap();
        assert_eq!(a.shape, vertical.rotate_cw());
        assert_eq!((a.x, a.y), (6, 5));
    }

    #[test]
    fn test_rotation_rejected_leaves_piece_unchanged() {
        let (mut c, _, _) = setup();
        // Walls on both sides of a 1-wide shaft
        let board = Board::from_text(&[
            "####.#####",
            "####.#####",
            "####.#####",
            "####.#####",
            "####.#####",
        ]);
        let vertical = canonical(ShapeId::I).rotate_cw();
        let before = ActivePiece {
            shape: vertical,
            x: 4,
            y: 1,
            color: 5,
        };
        c.active = Some(before);
        assert!(!c.rotate_with_kick(&board));
        assert_eq!(c.active(), Some(before));
    }

    #[test]
    fn test_hold_swap_once_per_piece() {
        let (mut c, board, _) = setup();
        assert!(c.spawn_next(&board, 1));
        let first = c.active().unwrap().shape;

        assert_eq!(c.hold_swap(&board, 1), MoveOutcome::Moved);
        assert_eq!(c.hold(), Some(first));
        let after_first = c.active();

        assert_eq!(c.hold_swap(&board, 1), MoveOutcome::Rejected);
        assert_eq!(c.active(), after_first);
        assert_eq!(c.hold(), Some(first));
    }

    #[test]
    fn test_hold_keeps_rotation_state() {
        let (mut c, mut board, mut p) = setup();
        assert!(c.spawn(&board, canonical(ShapeId::J), 1));
        assert!(c.rotate_with_kick(&board));
        let rotated = c.active().unwrap().shape;

        c.hold_swap(&board, 1);
        assert_eq!(c.hold(), Some(rotated));

        // Lock resets the single-use flag
        c.hard_drop(&mut board, &mut p);
        assert!(!c.hold_used());
        assert_eq!(c.hold_swap(&board, 1), MoveOutcome::Moved);
        assert_eq!(c.active().unwrap().shape, rotated);
    }

    #[test]
    fn test_hard_drop_awards_two_per_row_and_locks() {
        let (mut c, mut board, mut p) = setup();
        assert!(c.spawn(&board, canonical(ShapeId::O), 1));

        let outcome = c.hard_drop(&mut board, &mut p);
        assert!(matches!(
            outcome,
            MoveOutcome::Locked(LockEvent {
                hard_drop_rows: 18,
                ..
            })
        ));
        assert_eq!(p.score(), 36);
        assert!(board.is_occupied(4, 19));
        assert!(board.is_occupied(5, 18));
        assert!(c.active().is_some());
    }

    #[test]
    fn test_gravity_waits_for_interval() {
        let (mut c, mut board, mut p) = setup();
        assert!(c.spawn(&board, canonical(ShapeId::T), 1));
        c.reset_clocks(0);

        assert_eq!(c.gravity(&mut board, &mut p, 1000), None);
        assert_eq!(c.gravity(&mut board, &mut p, 1001), Some(MoveOutcome::Moved));
        assert_eq!(c.active().unwrap().y, 1);

        c.set_fast_fall(true);
        assert_eq!(c.gravity(&mut board, &mut p, 1051), None);
        assert_eq!(c.gravity(&mut board, &mut p, 1052), Some(MoveOutcome::Moved));
    }

    #[test]
    fn test_gravity_locks_resting_piece() {
        let (mut c, mut board, mut p) = setup();
        assert!(c.spawn(&board, canonical(ShapeId::O), 1));
        c.reset_clocks(0);
        c.active = Some(ActivePiece {
            y: 18,
            ..c.active().unwrap()
        });

        let outcome = c.gravity(&mut board, &mut p, 2000);
        assert!(matches!(outcome, Some(MoveOutcome::Locked(_))));
        assert_eq!(board.get(4, 19), Some(2));
        assert_eq!(c.take_last_lock().map(|e| e.lines_cleared), Some(0));
        assert_eq!(c.take_last_lock(), None);
    }

    #[test]
    fn test_auto_shift_delay_then_repeat() {
        let (mut c, board, _) = setup();
        assert!(c.spawn(&board, canonical(ShapeId::O), 1));
        let x0 = c.active().unwrap().x;

        assert!(c.press_direction(&board, -1, 0));
        assert_eq!(c.active().unwrap().x, x0 - 1);

        assert!(!c.auto_shift(&board, 149));
        assert!(c.auto_shift(&board, 150));
        assert!(!c.auto_shift(&board, 199));
        assert!(c.auto_shift(&board, 200));
        assert_eq!(c.active().unwrap().x, x0 - 3);

        c.release_direction(-1);
        assert!(!c.auto_shift(&board, 1000));
    }

    #[test]
    fn test_left_wins_when_both_held() {
        let (mut c, board, _) = setup();
        assert!(c.spawn(&board, canonical(ShapeId::O), 1));
        c.press_direction(&board, 1, 0);
        c.press_direction(&board, -1, 0);
        let x = c.active().unwrap().x;
        assert!(c.auto_shift(&board, 150));
        assert_eq!(c.active().unwrap().x, x - 1);
    }

    #[test]
    fn test_next_queue_keeps_preview_len() {
        let config = GameConfig::new(9).with_preview_len(3);
        let mut c = PieceController::new(&config);
        let board = Board::default();
        for _ in 0..10 {
            let expected = c.next_queue()[0];
            assert!(c.spawn_next(&board, 1));
            assert_eq!(c.active().unwrap().shape, canonical(expected));
            assert_eq!(c.next_queue().len(), 3);
        }
    }
}
