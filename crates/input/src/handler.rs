//! Held-key tracker for terminal environments.
//!
//! Turns key events into commands and keeps track of which held controls are
//! down. Terminals that do not emit key release events get their releases
//! synthesized after a timeout.

use arrayvec::ArrayVec;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{held_key, one_shot_command, HeldKey};
use crate::types::Command;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state. The terminal's own key repeat
// keeps a really held key alive, but only once it starts: a repeat delay longer
// than the timeout shows up as one release and a fresh press, so auto-shift
// restarts its delay there. Raise the timeout above the terminal's repeat delay
// to avoid that, at the cost of taps sliding further.
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks held controls and emits down/up command pairs.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Last time each held control was seen (press or repeat)
    held: [Option<u64>; 3],
    /// Set once the terminal has reported any key release
    release_events: bool,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held: [None; 3],
            release_events: false,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_held(&self, key: HeldKey) -> bool {
        self.held[key.index()].is_some()
    }

    /// Translate one key event
    ///
    /// A held control produces its down command on the first press only;
    /// repeats just keep it alive. A release produces the up command.
    /// Pause and restart release every held control first, so nothing stays
    /// stuck down across them.
    pub fn handle_key_event(&mut self, key: KeyEvent, now_ms: u64) -> ArrayVec<Command, 4> {
        let mut commands = ArrayVec::new();

        if let Some(held) = held_key(key.code) {
            let slot = &mut self.held[held.index()];
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if slot.is_none() {
                        commands.push(held.down());
                    }
                    *slot = Some(now_ms);
                }
                KeyEventKind::Release => {
                    self.release_events = true;
                    if slot.take().is_some() {
                        commands.push(held.up());
                    }
                }
            }
            return commands;
        }

        match key.kind {
            KeyEventKind::Press => {
                if let Some(command) = one_shot_command(key.code) {
                    if matches!(command, Command::TogglePause | Command::Restart) {
                        commands.extend(self.reset());
                    }
                    commands.push(command);
                }
            }
            KeyEventKind::Repeat => {}
            KeyEventKind::Release => self.release_events = true,
        }
        commands
    }

    /// Synthesize releases for held controls that went quiet
    ///
    /// Does nothing once the terminal has shown it reports releases.
    pub fn update(&mut self, now_ms: u64) -> ArrayVec<Command, 3> {
        let mut commands = ArrayVec::new();
        if self.release_events {
            return commands;
        }

        for key in HeldKey::ALL {
            let slot = &mut self.held[key.index()];
            if let Some(seen) = *slot {
                if now_ms.saturating_sub(seen) > self.key_release_timeout_ms as u64 {
                    *slot = None;
                    commands.push(key.up());
                }
            }
        }
        commands
    }

    /// Release everything, returning the up commands for what was held
    pub fn reset(&mut self) -> ArrayVec<Command, 3> {
        let mut commands = ArrayVec::new();
        for key in HeldKey::ALL {
            if self.held[key.index()].take().is_some() {
                commands.push(key.up());
            }
        }
        commands
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
