//! Progression module - score, lines, level and gravity curve
//!
//! Scoring is flat: every cleared line is worth the same, and a hard drop adds
//! a bonus per row travelled. Level is a pure function of total lines, and the
//! gravity interval decays geometrically per level down to a floor.

use crate::types::{HARD_DROP_POINTS_PER_ROW, LINES_PER_LEVEL, POINTS_PER_LINE};

/// Gravity curve parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallCurve {
    pub base_ms: u32,
    pub decay: f64,
    pub min_ms: u32,
}

impl FallCurve {
    /// Gravity interval for `level` (1-based)
    ///
    /// `max(min_ms, floor(base_ms * decay^(level - 1)))`
    pub fn interval_ms(&self, level: u32) -> u32 {
        let exp = level.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = (self.base_ms as f64) * self.decay.powi(exp);
        (raw.floor() as u32).max(self.min_ms)
    }
}

/// Result of feeding one lock's line count into the progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClearResult {
    pub points: u32,
    pub level_up: bool,
    pub tetris: bool,
}

/// Level for a total line count
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Line clear score (flat per line)
pub fn line_clear_points(lines: u32) -> u32 {
    lines.saturating_mul(POINTS_PER_LINE)
}

/// Hard drop bonus
pub fn hard_drop_points(rows: u32) -> u32 {
    rows.saturating_mul(HARD_DROP_POINTS_PER_ROW)
}

/// Score, lines, level and current gravity interval
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    score: u32,
    lines: u32,
    level: u32,
    fall_interval_ms: u32,
    curve: FallCurve,
}

impl Progression {
    pub fn new(curve: FallCurve) -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            fall_interval_ms: curve.interval_ms(1),
            curve,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    pub fn curve(&self) -> FallCurve {
        self.curve
    }

    /// Apply a lock's cleared line count
    ///
    /// Level only moves up; the new interval applies from the next gravity
    /// scheduling on.
    pub fn on_lines_cleared(&mut self, lines: u32) -> LineClearResult {
        let points = line_clear_points(lines);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines);

        let new_level = level_for_lines(self.lines);
        let level_up = new_level > self.level;
        if level_up {
            self.level = new_level;
            self.fall_interval_ms = self.curve.interval_ms(new_level);
        }

        LineClearResult {
            points,
            level_up,
            tetris: lines == crate::types::TETRIS_LINES,
        }
    }

    /// Award the hard drop bonus
    pub fn on_hard_drop(&mut self, rows: u32) -> u32 {
        let points = hard_drop_points(rows);
        self.score = self.score.saturating_add(points);
        points
    }
}
