//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the boulder puzzle: grid, level generation,
//! gravity, player movement and the session state machine. It has no
//! dependencies on terminal, input or I/O code, so the same session runs in
//! the TUI, in the headless script runner and in tests.
//!
//! # Module Structure
//!
//! - [`grid`]: rectangular tile store with bounds-checked access
//! - [`level`]: seeded random level generation
//! - [`physics`]: gravity step and settle for boulders and diamonds
//! - [`player`]: movement, pushing, collection and the escape dash
//! - [`session`]: state machine, countdown and crush timers
//! - [`clock`]: logical-millisecond timer slots
//! - [`snapshot`]: immutable views for the presentation layer
//! - [`rng`]: deterministic LCG
//!
//! # Rules
//!
//! - Dig through dirt, collect diamonds, avoid falling boulders.
//! - Collecting the quota reveals a hidden exit; walking into it wins.
//! - A boulder resting on the player arms a 500ms crush timer. Stepping out
//!   from under it (or dashing two cells down) cancels it.
//! - The round lasts 60 seconds.
//!
//! # Example
//!
//! ```
//! use diamond_quest_core::{Session, SessionConfig};
//! use diamond_quest_types::{Direction, SessionState};
//!
//! let mut session = Session::new(SessionConfig::default(), 12345);
//! session.start().unwrap();
//!
//! let snap = session.submit_direction(Direction::Right);
//! assert!(snap.state == SessionState::Running || snap.state == SessionState::Lost);
//!
//! // Time only moves when the caller says so.
//! let snap = session.advance_clock(16);
//! assert!(snap.clock_ms >= 16);
//! ```
//!
//! # Timing
//!
//! Sessions never read the wall clock. Callers feed elapsed milliseconds to
//! [`Session::advance_clock`](session::Session::advance_clock):
//! - **Countdown**: one second per 1000ms
//! - **Physics cascade**: one gravity step per 100ms while anything moves
//! - **Crush**: fires 500ms after being armed unless cancelled

pub mod clock;
pub mod grid;
pub mod level;
pub mod physics;
pub mod player;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use diamond_quest_types as types;

pub use grid::Grid;
pub use level::{diamond_quota, generate, Level};
pub use player::{MoveOutcome, MoveReport};
pub use rng::SimpleRng;
pub use session::{CascadeMode, Session, SessionConfig};
pub use snapshot::SessionSnapshot;

use types::GameError;

/// Create a session for a `width` x `height` grid and start it.
pub fn start_session(width: u16, height: u16, seed: u32) -> Result<Session, GameError> {
    let mut session = Session::new(SessionConfig::default().with_size(width, height), seed);
    session.start()?;
    Ok(session)
}
