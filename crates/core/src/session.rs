//! Game session - owns the board, the piece controller and the progression
//!
//! The session is the only mutable entry point for a running game. Callers feed
//! it semantic [`Command`]s and a monotonic clock (`now_ms`), then read a
//! [`GameSnapshot`] between steps. Game over is terminal: after it, only
//! `Restart` changes anything.

use crate::board::Board;
use crate::config::{ConfigError, GameConfig};
use crate::controller::{ActivePiece, PieceController};
use crate::progression::Progression;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Command, MoveOutcome};

/// Best known score and the initials it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    pub score: u32,
    pub name: String,
}

impl HighScore {
    pub const MAX_NAME_LEN: usize = 3;

    /// Build a record; the name is reduced to at most three uppercase
    /// letters or digits
    pub fn new(score: u32, name: &str) -> Self {
        Self {
            score,
            name: normalize_name(name),
        }
    }
}

/// Initials as shown on the high score line
pub fn normalize_name(name: &str) -> String {
    let initials: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(HighScore::MAX_NAME_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if initials.is_empty() {
        "AAA".to_string()
    } else {
        initials
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    controller: PieceController,
    progression: Progression,
    high_score: Option<HighScore>,
    player: String,
    pieces_dropped: u32,
    paused: bool,
    game_over: bool,
    tetris_at_ms: Option<u64>,
    level_up_at_ms: Option<u64>,
}

impl GameSession {
    /// Start a session on an empty board and spawn the first piece
    pub fn new(
        config: GameConfig,
        high_score: Option<HighScore>,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.grid_width(), config.grid_height());
        Ok(Self::start(config, board, high_score, now_ms))
    }

    /// Start a session on a prepared board (grid size follows the board)
    pub fn with_board(
        config: GameConfig,
        board: Board,
        high_score: Option<HighScore>,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        let config = config.with_grid(board.width(), board.height());
        config.validate()?;
        Ok(Self::start(config, board, high_score, now_ms))
    }

    fn start(
        config: GameConfig,
        board: Board,
        high_score: Option<HighScore>,
        now_ms: u64,
    ) -> Self {
        let mut session = Self {
            controller: PieceController::new(&config),
            progression: Progression::new(config.fall_curve()),
            config,
            board,
            high_score,
            player: normalize_name(""),
            pieces_dropped: 0,
            paused: false,
            game_over: false,
            tetris_at_ms: None,
            level_up_at_ms: None,
        };

        tracing::info!(
            seed = session.config.seed,
            difficulty = session.config.difficulty.as_str(),
            width = session.board.width(),
            height = session.board.height(),
            "session started"
        );

        session.controller.reset_clocks(now_ms);
        if !session
            .controller
            .spawn_next(&session.board, session.progression.level())
        {
            session.end_game();
        }
        session
    }

    /// Initials recorded if this session sets a new high score
    pub fn with_player(mut self, name: &str) -> Self {
        self.player = normalize_name(name);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn controller(&self) -> &PieceController {
        &self.controller
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.controller.active()
    }

    pub fn score(&self) -> u32 {
        self.progression.score()
    }

    pub fn level(&self) -> u32 {
        self.progression.level()
    }

    pub fn lines(&self) -> u32 {
        self.progression.lines()
    }

    pub fn pieces_dropped(&self) -> u32 {
        self.pieces_dropped
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn high_score(&self) -> Option<&HighScore> {
        self.high_score.as_ref()
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// True when the current score beats the best known one
    pub fn is_new_high_score(&self) -> bool {
        let best = self.high_score.as_ref().map(|h| h.score).unwrap_or(0);
        self.progression.score() > best
    }

    /// The record to persist, if the current score is a new high score
    pub fn new_record(&self) -> Option<HighScore> {
        self.is_new_high_score()
            .then(|| HighScore::new(self.progression.score(), &self.player))
    }

    /// Apply one command
    ///
    /// `Moved` means the command took effect, `Rejected` that it was illegal
    /// or ignored (paused, hold already used). Key releases are honored even
    /// while paused so held state never sticks.
    pub fn apply(&mut self, command: Command, now_ms: u64) -> MoveOutcome {
        match command {
            Command::Restart => {
                self.restart(now_ms);
                return MoveOutcome::Moved;
            }
            _ if self.game_over => return MoveOutcome::GameOver,
            Command::TogglePause => {
                self.paused = !self.paused;
                if !self.paused {
                    self.controller.reset_clocks(now_ms);
                }
                tracing::debug!(paused = self.paused, "pause toggled");
                return MoveOutcome::Moved;
            }
            Command::MoveLeftUp => {
                self.controller.release_direction(-1);
                return MoveOutcome::Moved;
            }
            Command::MoveRightUp => {
                self.controller.release_direction(1);
                return MoveOutcome::Moved;
            }
            Command::SoftDropUp => {
                self.controller.set_fast_fall(false);
                return MoveOutcome::Moved;
            }
            _ if self.paused => return MoveOutcome::Rejected,
            _ => {}
        }

        let level = self.progression.level();
        let outcome = match command {
            Command::MoveLeftDown => {
                moved(self.controller.press_direction(&self.board, -1, now_ms))
            }
            Command::MoveRightDown => {
                moved(self.controller.press_direction(&self.board, 1, now_ms))
            }
            Command::SoftDropDown => {
                self.controller.set_fast_fall(true);
                MoveOutcome::Moved
            }
            Command::Rotate => moved(self.controller.rotate_with_kick(&self.board)),
            Command::HardDrop => self
                .controller
                .hard_drop(&mut self.board, &mut self.progression),
            Command::Hold => self.controller.hold_swap(&self.board, level),
            _ => MoveOutcome::Rejected,
        };
        self.absorb(outcome, now_ms);
        outcome
    }

    /// Advance the clocks: auto-shift first, then gravity if it is due
    ///
    /// Returns the gravity outcome, or `None` when no gravity step ran.
    pub fn tick(&mut self, now_ms: u64) -> Option<MoveOutcome> {
        if self.paused || self.game_over {
            return None;
        }
        self.controller.auto_shift(&self.board, now_ms);
        let outcome = self
            .controller
            .gravity(&mut self.board, &mut self.progression, now_ms)?;
        self.absorb(outcome, now_ms);
        Some(outcome)
    }

    /// One frame: every pending command in order, then one tick
    pub fn step(&mut self, commands: &[Command], now_ms: u64) -> Option<MoveOutcome> {
        for &command in commands {
            self.apply(command, now_ms);
        }
        self.tick(now_ms)
    }

    /// Record lock side effects and game over
    fn absorb(&mut self, outcome: MoveOutcome, now_ms: u64) {
        if let Some(event) = self.controller.take_last_lock() {
            self.pieces_dropped = self.pieces_dropped.saturating_add(1);
            if event.tetris {
                self.tetris_at_ms = Some(now_ms);
            }
            if event.level_up {
                self.level_up_at_ms = Some(now_ms);
            }
        }
        if outcome.is_game_over() {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        tracing::info!(
            score = self.progression.score(),
            lines = self.progression.lines(),
            level = self.progression.level(),
            pieces = self.pieces_dropped,
            new_high_score = self.is_new_high_score(),
            "game over"
        );
    }

    /// Fresh board and progression, same configuration, advanced seed
    ///
    /// A beaten high score carries over as the best known record.
    pub fn restart(&mut self, now_ms: u64) {
        let high_score = self.new_record().or_else(|| self.high_score.take());
        let config = self.config.clone().with_seed(self.controller.bag_seed());
        let board = Board::new(self.board.width(), self.board.height());
        let player = std::mem::take(&mut self.player);

        tracing::info!(score = self.progression.score(), "session restarting");
        *self = Self::start(config, board, high_score, now_ms);
        self.player = player;
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());

        out.active = self.controller.active().map(ActiveSnapshot::from);
        out.ghost_y = self.controller.ghost_y(&self.board);
        out.hold = self.controller.hold();
        out.hold_used = self.controller.hold_used();
        out.next_queue.clear();
        out.next_queue
            .extend(self.controller.next_queue().iter().copied());

        out.score = self.progression.score();
        out.level = self.progression.level();
        out.lines = self.progression.lines();
        out.pieces_dropped = self.pieces_dropped;
        out.fall_interval_ms = self.progression.fall_interval_ms();
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.danger_zone = self.board.is_danger_zone();
        out.tetris_at_ms = self.tetris_at_ms;
        out.level_up_at_ms = self.level_up_at_ms;
        out.high_score.clone_from(&self.high_score);
        out.new_high_score = self.is_new_high_score();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

fn moved(ok: bool) -> MoveOutcome {
    if ok {
        MoveOutcome::Moved
    } else {
        MoveOutcome::Rejected
    }
}
