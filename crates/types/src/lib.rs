//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game: tiles,
//! positions, directions, session events and the library error type. Everything
//! here is plain data, usable from core logic, terminal rendering and the
//! headless runner alike.
//!
//! # Grid Dimensions
//!
//! The default playfield is 20 columns by 15 rows, indexed from the top-left
//! corner. The outermost ring of cells is always [`Tile::Wall`].
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds of the session's logical clock:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval of the terminal front-end |
//! | `COUNTDOWN_STEP_MS` | 1000 | One countdown decrement |
//! | `PHYSICS_STEP_MS` | 100 | Delay between cascading physics ticks |
//! | `CRUSH_DELAY_MS` | 500 | Time to escape a boulder before it crushes |
//! | `EXIT_HINT_MS` | 3000 | How long the "exit revealed" hint stays up |
//!
//! # Level Generation
//!
//! Interior cells are drawn with cumulative thresholds: dirt below 0.45,
//! boulder below 0.60, diamond below 0.70, empty otherwise. The diamond quota
//! is `max(10, floor(0.8 * diamonds))`.
//!
//! # Examples
//!
//! ```
//! use diamond_quest_types::{Direction, Position, Tile};
//!
//! let dir: Direction = "up".parse().unwrap();
//! assert_eq!(dir.delta(), (0, -1));
//!
//! let p = Position::new(5, 5).step(dir);
//! assert_eq!(p, Position::new(5, 4));
//!
//! assert_eq!(Tile::from_char('*'), Some(Tile::Diamond));
//! assert!(Tile::Boulder.is_movable());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Default grid width in cells (20 columns)
pub const GRID_WIDTH: u16 = 20;

/// Default grid height in cells (15 rows)
pub const GRID_HEIGHT: u16 = 15;

/// Smallest grid that still has a spawn region after the 2-cell inset
pub const MIN_GRID_SIZE: u16 = 5;

/// Largest grid side accepted from configuration
pub const MAX_GRID_SIZE: u16 = 256;

/// Frame interval of the terminal front-end (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Round length in seconds
pub const ROUND_SECONDS: u32 = 60;

/// One countdown decrement
pub const COUNTDOWN_STEP_MS: u32 = 1000;

/// Delay between chained physics ticks while a cascade is in progress
pub const PHYSICS_STEP_MS: u32 = 100;

/// Time from arming the crush timer until the player is crushed
pub const CRUSH_DELAY_MS: u32 = 500;

/// Lifetime of the "exit revealed" hint
pub const EXIT_HINT_MS: u32 = 3000;

/// Cumulative draw threshold below which an interior cell is dirt
pub const DIRT_THRESHOLD: f64 = 0.45;

/// Cumulative draw threshold below which an interior cell is a boulder
pub const BOULDER_THRESHOLD: f64 = 0.60;

/// Cumulative draw threshold below which an interior cell is a diamond
pub const DIAMOND_THRESHOLD: f64 = 0.70;

/// Spawn and exit cells are drawn this many cells away from every border
pub const SPAWN_INSET: u16 = 2;

/// Exit must be strictly farther than this (Manhattan) from the spawn
pub const EXIT_MIN_DISTANCE: u32 = 10;

/// Floor for the diamond quota
pub const MIN_DIAMONDS_REQUIRED: u32 = 10;

/// Fraction of generated diamonds the player must collect
pub const DIAMOND_QUOTA_RATIO: f64 = 0.8;

/// Rejection-sampling cap for spawn and exit placement
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Minimum swipe length (in input units) before it counts as a move
pub const SWIPE_THRESHOLD: i32 = 30;

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Dirt,
    Boulder,
    Diamond,
    Player,
    Exit,
}

impl Tile {
    /// Boulders and diamonds are subject to gravity.
    pub fn is_movable(self) -> bool {
        matches!(self, Tile::Boulder | Tile::Diamond)
    }

    /// ASCII form used by fixtures and headless dumps.
    ///
    /// ```
    /// use diamond_quest_types::Tile;
    ///
    /// assert_eq!(Tile::Wall.as_char(), '#');
    /// assert_eq!(Tile::Empty.as_char(), ' ');
    /// ```
    pub fn as_char(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Dirt => '.',
            Tile::Boulder => 'o',
            Tile::Diamond => '*',
            Tile::Player => 'P',
            Tile::Exit => 'E',
        }
    }

    /// Parse the ASCII form produced by [`Tile::as_char`].
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' | '_' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            '.' => Some(Tile::Dirt),
            'o' | 'O' => Some(Tile::Boulder),
            '*' => Some(Tile::Diamond),
            'P' => Some(Tile::Player),
            'E' => Some(Tile::Exit),
            _ => None,
        }
    }
}

/// Cardinal movement directions. Diagonals are not part of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid offset `(dx, dy)`; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = GameError;

    /// Accepts full names or single letters (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(GameError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell coordinate. Signed so neighbour arithmetic can step off the grid
/// and be rejected by bounds checks instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Lifecycle of a session.
///
/// `Won` and `Lost` are terminal; only an explicit restart leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Won,
    Lost,
}

impl SessionState {
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Won | SessionState::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LossCause {
    Timeout,
    Crushed,
}

/// Discrete state changes reported alongside each snapshot.
///
/// The presentation layer reacts to these instead of diffing grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted { episode_id: u32 },
    DiamondCollected { at: Position, total: u32 },
    ExitRevealed { at: Position },
    /// A boulder is about to land on the player.
    CrushArmed { boulder: Position },
    CrushCancelled,
    /// The crush timer ran out with the player at `at`.
    BoulderCrushed { at: Position },
    SessionWon,
    SessionLost { cause: LossCause },
}

/// Library error type.
///
/// Session endings (timeout, crush, victory) are state transitions and never
/// show up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Coordinate outside the grid.
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },

    /// Level generation could not satisfy its placement rules.
    #[error("level generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// Input could not be decoded into a direction.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_cumulative() {
        assert!(DIRT_THRESHOLD < BOULDER_THRESHOLD);
        assert!(BOULDER_THRESHOLD < DIAMOND_THRESHOLD);
        assert!(DIAMOND_THRESHOLD < 1.0);
    }

    #[test]
    fn tile_char_roundtrip() {
        for tile in [
            Tile::Empty,
            Tile::Wall,
            Tile::Dirt,
            Tile::Boulder,
            Tile::Diamond,
            Tile::Player,
            Tile::Exit,
        ] {
            assert_eq!(Tile::from_char(tile.as_char()), Some(tile));
        }
        assert_eq!(Tile::from_char('?'), None);
    }

    #[test]
    fn only_boulders_and_diamonds_move() {
        assert!(Tile::Boulder.is_movable());
        assert!(Tile::Diamond.is_movable());
        assert!(!Tile::Dirt.is_movable());
        assert!(!Tile::Player.is_movable());
    }

    #[test]
    fn direction_parse() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("d".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!(" left ".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(
            "north".parse::<Direction>(),
            Err(GameError::InvalidDirection("north".to_string()))
        );
    }

    #[test]
    fn direction_deltas_are_cardinal() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1, "{dir} is not cardinal");
        }
    }

    #[test]
    fn manhattan_distance() {
        let a = Position::new(2, 3);
        let b = Position::new(7, 1);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(b.manhattan(a), 7);
    }

    #[test]
    fn error_messages() {
        let err = GameError::OutOfRange {
            x: -1,
            y: 4,
            width: 20,
            height: 15,
        };
        assert_eq!(err.to_string(), "position (-1, 4) is outside the 20x15 grid");
    }
}
