//! Key mapping from terminal events to session commands.

use crate::types::{Direction, GameError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A decoded user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Move(Direction),
    Restart,
}

/// Map keyboard input to session commands.
pub fn handle_key_event(key: KeyEvent) -> Option<InputCommand> {
    let dir = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k' | 'K') => Direction::Up,
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => Direction::Down,
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => Direction::Left,
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => Direction::Right,

        KeyCode::Char('r' | 'R') | KeyCode::Enter => return Some(InputCommand::Restart),

        _ => return None,
    };
    Some(InputCommand::Move(dir))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Decode a textual direction token ("up", "D", " left ").
pub fn decode_direction(token: &str) -> Result<Direction, GameError> {
    token.parse()
}
