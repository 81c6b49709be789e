//! Game configuration
//!
//! Everything the engine needs is passed in here at construction; the engine
//! never reads ambient state.

use std::fmt;

use crate::progression::FallCurve;
use crate::types::{
    Difficulty, DEFAULT_BLOCK_SIZE, DEFAULT_FALL_DECAY, DEFAULT_MIN_FALL_MS,
    DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, FAST_FALL_MS, MAX_GRID_HEIGHT, MAX_GRID_WIDTH,
    MAX_PREVIEW, MOVE_DELAY_MS, MOVE_REPEAT_MS,
};

/// Smallest grid side that still fits every tetromino in every rotation
const MIN_GRID_SIDE: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    BlockSizeZero,
    GridTooSmall { width: u16, height: u16 },
    GridTooLarge { width: u16, height: u16 },
    ZeroInterval(&'static str),
    DecayOutOfRange(f64),
    PreviewOutOfRange(usize),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::BlockSizeZero => "block_size_zero",
            ConfigError::GridTooSmall { .. } => "grid_too_small",
            ConfigError::GridTooLarge { .. } => "grid_too_large",
            ConfigError::ZeroInterval(_) => "zero_interval",
            ConfigError::DecayOutOfRange(_) => "decay_out_of_range",
            ConfigError::PreviewOutOfRange(_) => "preview_out_of_range",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BlockSizeZero => write!(f, "block size must be non-zero"),
            ConfigError::GridTooSmall { width, height } => write!(
                f,
                "grid {width}x{height} is smaller than {MIN_GRID_SIDE}x{MIN_GRID_SIDE}"
            ),
            ConfigError::GridTooLarge { width, height } => write!(
                f,
                "grid {width}x{height} exceeds {MAX_GRID_WIDTH}x{MAX_GRID_HEIGHT}"
            ),
            ConfigError::ZeroInterval(name) => write!(f, "{name} must be non-zero"),
            ConfigError::DecayOutOfRange(d) => write!(f, "fall decay {d} must be in (0, 1]"),
            ConfigError::PreviewOutOfRange(n) => {
                write!(f, "preview length {n} must be in 1..={MAX_PREVIEW}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub block_size: u32,
    pub difficulty: Difficulty,
    /// Overrides the difficulty's base fall interval when set
    pub base_fall_ms: Option<u32>,
    pub fall_decay: f64,
    pub min_fall_ms: u32,
    pub fast_fall_ms: u32,
    pub move_delay_ms: u32,
    pub move_repeat_ms: u32,
    pub preview_len: usize,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            block_size: DEFAULT_BLOCK_SIZE,
            difficulty: Difficulty::Normal,
            base_fall_ms: None,
            fall_decay: DEFAULT_FALL_DECAY,
            min_fall_ms: DEFAULT_MIN_FALL_MS,
            fast_fall_ms: FAST_FALL_MS,
            move_delay_ms: MOVE_DELAY_MS,
            move_repeat_ms: MOVE_REPEAT_MS,
            preview_len: 1,
            seed: 1,
        }
    }
}

impl GameConfig {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Set the grid size directly (screen = cells * block size)
    pub fn with_grid(mut self, width: u16, height: u16) -> Self {
        self.screen_width = width as u32 * self.block_size;
        self.screen_height = height as u32 * self.block_size;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_base_fall_ms(mut self, ms: u32) -> Self {
        self.base_fall_ms = Some(ms);
        self
    }

    pub fn with_preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn grid_width(&self) -> u16 {
        (self.screen_width / self.block_size.max(1)).min(u16::MAX as u32) as u16
    }

    pub fn grid_height(&self) -> u16 {
        (self.screen_height / self.block_size.max(1)).min(u16::MAX as u32) as u16
    }

    pub fn fall_curve(&self) -> FallCurve {
        FallCurve {
            base_ms: self
                .base_fall_ms
                .unwrap_or_else(|| self.difficulty.base_fall_ms()),
            decay: self.fall_decay,
            min_ms: self.min_fall_ms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::BlockSizeZero);
        }
        let (width, height) = (self.grid_width(), self.grid_height());
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall { width, height });
        }
        if width > MAX_GRID_WIDTH || height > MAX_GRID_HEIGHT {
            return Err(ConfigError::GridTooLarge { width, height });
        }

        let curve = self.fall_curve();
        for (name, value) in [
            ("base fall interval", curve.base_ms),
            ("minimum fall interval", self.min_fall_ms),
            ("fast fall interval", self.fast_fall_ms),
            ("move delay", self.move_delay_ms),
            ("move repeat interval", self.move_repeat_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval(name));
            }
        }

        if !(self.fall_decay > 0.0 && self.fall_decay <= 1.0) {
            return Err(ConfigError::DecayOutOfRange(self.fall_decay));
        }
        if self.preview_len == 0 || self.preview_len > MAX_PREVIEW {
            return Err(ConfigError::PreviewOutOfRange(self.preview_len));
        }
        Ok(())
    }
}
