//! Key mapping from terminal events to engine commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Controls that stay active while the key is down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldKey {
    Left,
    Right,
    SoftDrop,
}

impl HeldKey {
    pub const ALL: [HeldKey; 3] = [HeldKey::Left, HeldKey::Right, HeldKey::SoftDrop];

    pub fn index(self) -> usize {
        match self {
            HeldKey::Left => 0,
            HeldKey::Right => 1,
            HeldKey::SoftDrop => 2,
        }
    }

    pub fn down(self) -> Command {
        match self {
            HeldKey::Left => Command::MoveLeftDown,
            HeldKey::Right => Command::MoveRightDown,
            HeldKey::SoftDrop => Command::SoftDropDown,
        }
    }

    pub fn up(self) -> Command {
        match self {
            HeldKey::Left => Command::MoveLeftUp,
            HeldKey::Right => Command::MoveRightUp,
            HeldKey::SoftDrop => Command::SoftDropUp,
        }
    }
}

/// Map a key to a held control.
pub fn held_key(code: KeyCode) -> Option<HeldKey> {
    match code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(HeldKey::Left)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(HeldKey::Right)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(HeldKey::SoftDrop)
        }
        _ => None,
    }
}

/// Map a key to a one-shot command.
pub fn one_shot_command(code: KeyCode) -> Option<Command> {
    match code {
        // Rotation (clockwise only)
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(Command::Rotate),

        // Actions
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Command::TogglePause),

        // Restart
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_held_keys() {
        assert_eq!(held_key(KeyCode::Left), Some(HeldKey::Left));
        assert_eq!(held_key(KeyCode::Right), Some(HeldKey::Right));
        assert_eq!(held_key(KeyCode::Down), Some(HeldKey::SoftDrop));

        assert_eq!(held_key(KeyCode::Char('H')), Some(HeldKey::Left));
        assert_eq!(held_key(KeyCode::Char('d')), Some(HeldKey::Right));
        assert_eq!(held_key(KeyCode::Char('J')), Some(HeldKey::SoftDrop));
        assert_eq!(held_key(KeyCode::Up), None);
    }

    #[test]
    fn test_held_key_command_pairs() {
        assert_eq!(HeldKey::Left.down(), Command::MoveLeftDown);
        assert_eq!(HeldKey::Left.up(), Command::MoveLeftUp);
        assert_eq!(HeldKey::SoftDrop.up(), Command::SoftDropUp);
        for (i, key) in HeldKey::ALL.into_iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_one_shot_keys() {
        assert_eq!(one_shot_command(KeyCode::Up), Some(Command::Rotate));
        assert_eq!(one_shot_command(KeyCode::Char('W')), Some(Command::Rotate));
        assert_eq!(one_shot_command(KeyCode::Char(' ')), Some(Command::HardDrop));
        assert_eq!(one_shot_command(KeyCode::Char('c')), Some(Command::Hold));
        assert_eq!(one_shot_command(KeyCode::Char('p')), Some(Command::TogglePause));
        assert_eq!(one_shot_command(KeyCode::Esc), Some(Command::TogglePause));
        assert_eq!(one_shot_command(KeyCode::Char('R')), Some(Command::Restart));
        assert_eq!(one_shot_command(KeyCode::Left), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
