//! Input decoding wired through to a live session

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind, KeyModifiers};
use diamond_quest::core::{CascadeMode, Grid, Level, Session, SessionConfig};
use diamond_quest::input::{decode_direction, handle_key_event, InputCommand, SwipeTracker};
use diamond_quest::types::{Direction, GameError, Position, Tile};

fn corridor() -> Session {
    let grid = Grid::from_ascii(&["#######", "#..P..#", "#######"]).unwrap();
    let config = SessionConfig::default()
        .with_size(7, 3)
        .with_cascade(CascadeMode::Immediate);
    Session::with_level(
        config,
        Level {
            grid,
            spawn: Position::new(3, 1),
            exit: Position::new(1, 1),
            diamonds_required: 10,
        },
    )
}

fn drag(tracker: &mut SwipeTracker, from: (u16, u16), to: (u16, u16)) -> Option<Direction> {
    let event = |kind, (column, row): (u16, u16)| MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    };
    tracker.handle_mouse_event(event(MouseEventKind::Down(MouseButton::Left), from));
    tracker.handle_mouse_event(event(MouseEventKind::Up(MouseButton::Left), to))
}

#[test]
fn test_keys_drive_the_session() {
    let mut session = corridor();
    for code in [KeyCode::Char('d'), KeyCode::Right] {
        if let Some(InputCommand::Move(dir)) = handle_key_event(KeyEvent::from(code)) {
            session.apply_direction(dir);
        }
    }
    assert_eq!(session.player(), Position::new(5, 1));
    assert_eq!(session.grid().tile(Position::new(3, 1)), Some(Tile::Empty));
}

#[test]
fn test_swipe_drives_the_session() {
    let mut session = corridor();
    let mut tracker = SwipeTracker::default();

    let dir = drag(&mut tracker, (20, 5), (10, 6)).unwrap();
    assert_eq!(dir, Direction::Left);
    session.apply_direction(dir);
    assert_eq!(session.player(), Position::new(2, 1));

    // A twitch is not a swipe.
    assert_eq!(drag(&mut tracker, (10, 5), (11, 5)), None);
}

#[test]
fn test_text_tokens() {
    for (token, dir) in [
        ("up", Direction::Up),
        ("DOWN", Direction::Down),
        ("l", Direction::Left),
        ("  right  ", Direction::Right),
    ] {
        assert_eq!(decode_direction(token), Ok(dir));
    }
    for bad in ["", "upp", "north-east", "1"] {
        assert_eq!(
            decode_direction(bad),
            Err(GameError::InvalidDirection(bad.to_string()))
        );
    }
}
