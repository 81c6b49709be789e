//! Board module - manages the grid of locked cells
//!
//! The board is a `width x height` grid where each cell is empty (0) or holds a
//! color index (1..=7). Storage is a single row-major allocation made once at
//! construction; row compaction moves rows in place with `copy_within`.
//!
//! Coordinates: (x, y) where x grows to the right and y grows downward, row 0 is
//! the top visible row. Piece cells may sit above the grid (y < 0); those are
//! legal as long as x is in range.

use arrayvec::ArrayVec;

use crate::shape::Shape;
use crate::types::{Cell, DANGER_ZONE_ROWS, EMPTY, MAX_GRID_HEIGHT, NUM_COLORS};

/// Row indices removed by one clear, as they were before removal (top to bottom)
pub type ClearedRows = ArrayVec<u16, { MAX_GRID_HEIGHT as usize }>;

/// The game board - flat array storage, row-major (y * width + x)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    ///
    /// Dimensions are clamped to `1..=MAX_GRID_*`; `GameConfig::validate` rejects
    /// out-of-range sizes before they get here.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.clamp(1, crate::types::MAX_GRID_WIDTH);
        let height = height.clamp(1, MAX_GRID_HEIGHT);
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds or if `cell` is not a valid color index
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        if cell > NUM_COLORS {
            return false;
        }
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(c) if c != EMPTY)
    }

    /// Check whether `shape` fits with its top-left corner at (x, y)
    ///
    /// A cell is illegal if its column is outside `[0, width)`, its row is at or
    /// below `height`, or it lands on a locked cell. Cells above the grid
    /// (y < 0) never collide.
    pub fn is_valid_position(&self, shape: &Shape, x: i16, y: i16) -> bool {
        shape.cells().all(|(dx, dy)| {
            let px = x + dx;
            let py = y + dy;
            if px < 0 || px >= self.width as i16 || py >= self.height as i16 {
                return false;
            }
            py < 0 || !self.is_occupied(px, py)
        })
    }

    /// Write `color` into every cell of `shape` at (x, y) that lies on the grid
    ///
    /// Cells outside the grid (including above it) are skipped.
    /// Returns the number of cells written.
    pub fn place(&mut self, shape: &Shape, x: i16, y: i16, color: Cell) -> u32 {
        let mut written = 0;
        for (dx, dy) in shape.cells() {
            if self.set(x + dx, y + dy, color) {
                written += 1;
            }
        }
        written
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: u16) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|&c| c != EMPTY))
            .unwrap_or(false)
    }

    /// Clear all full rows and return their original indices (top to bottom)
    ///
    /// Non-full rows keep their relative order and sink by the number of full
    /// rows below them; the same number of empty rows appear at the top.
    /// Uses a two-pointer pass with zero allocation.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y as u16) {
                cleared.push(read_y as u16);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        // Blank the rows vacated at the top
        self.cells[..write_y * width].fill(EMPTY);

        cleared.reverse();
        cleared
    }

    /// Game-over test for a spawn: true when `shape` cannot be placed at (x, y)
    pub fn is_game_over(&self, shape: &Shape, x: i16, y: i16) -> bool {
        !self.is_valid_position(shape, x, y)
    }

    /// True if any cell of the top visible row is locked
    pub fn is_top_row_occupied(&self) -> bool {
        self.row(0)
            .map(|row| row.iter().any(|&c| c != EMPTY))
            .unwrap_or(false)
    }

    /// True if any of the top rows holds a locked cell (stack is close to the top)
    pub fn is_danger_zone(&self) -> bool {
        let rows = DANGER_ZONE_ROWS.min(self.height) as usize;
        self.cells[..rows * self.width as usize]
            .iter()
            .any(|&c| c != EMPTY)
    }

    /// Borrow one row
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Build from text rows for tests: `.` is empty, a digit is that color index,
    /// any other character is color 1.
    pub fn from_text(rows: &[&str]) -> Self {
        let height = rows.len() as u16;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as u16;
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => EMPTY,
                    d if d.is_ascii_digit() => d as u8 - b'0',
                    _ => 1,
                };
                board.set(x as i16, y as i16, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(
            crate::types::DEFAULT_GRID_WIDTH,
            crate::types::DEFAULT_GRID_HEIGHT,
        )
    }
}
