//! Terminal runner (default binary).
//!
//! Reads settings from the environment, drives a `GameSession` from crossterm
//! key events and a monotonic clock, and draws through the framebuffer
//! renderer. High scores are written when a game ends.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use arrayvec::ArrayVec;
use crossterm::event::{self, Event, KeyEventKind};

use blockfall::core::{GameSession, GameSnapshot};
use blockfall::highscore::HighScoreStore;
use blockfall::input::{should_quit, InputHandler};
use blockfall::settings::Settings;
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::{Command, TICK_MS};

/// Commands collected during one frame
const MAX_FRAME_COMMANDS: usize = 32;

fn main() -> Result<()> {
    let settings = Settings::from_env();
    blockfall::logging::init(&settings)?;

    let store = HighScoreStore::new(&settings.high_score_path);
    let best = store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "starting without a high score");
        None
    });

    let config = settings.to_config(clock_seed());
    let session = GameSession::new(config, best, 0)?.with_player(&settings.player);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let input = InputHandler::new().with_key_release_timeout_ms(settings.key_release_ms);
    let result = run(&mut term, session, input, &store);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(
    term: &mut TerminalRenderer,
    mut session: GameSession,
    mut input: InputHandler,
    store: &HighScoreStore,
) -> Result<()> {
    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut commands: ArrayVec<Command, MAX_FRAME_COMMANDS> = ArrayVec::new();

    let started = Instant::now();
    let tick = Duration::from_millis(TICK_MS as u64);
    let mut record_saved = false;

    loop {
        let frame_start = Instant::now();
        let now_ms = started.elapsed().as_millis() as u64;

        session.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, now_ms, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Drain input until the next frame is due.
        commands.clear();
        loop {
            let timeout = tick.saturating_sub(frame_start.elapsed());
            if !event::poll(timeout)? {
                break;
            }
            let now_ms = started.elapsed().as_millis() as u64;
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        save_record(&session, store, &mut record_saved);
                        return Ok(());
                    }
                    for command in input.handle_key_event(key, now_ms) {
                        let _ = commands.try_push(command);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let now_ms = started.elapsed().as_millis() as u64;
        for command in input.update(now_ms) {
            let _ = commands.try_push(command);
        }

        if commands.contains(&Command::Restart) {
            save_record(&session, store, &mut record_saved);
            record_saved = false;
        }

        session.step(&commands, now_ms);

        if session.game_over() {
            save_record(&session, store, &mut record_saved);
        }
    }
}

/// Persist the session's record once, if it beat the best known score
fn save_record(session: &GameSession, store: &HighScoreStore, saved: &mut bool) {
    if *saved {
        return;
    }
    let Some(record) = session.new_record() else {
        return;
    };
    *saved = true;
    if let Err(e) = store.save_if_better(&record) {
        tracing::warn!(error = %e, "could not save high score");
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
        | 1
}
