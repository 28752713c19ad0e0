//! Terminal input module (session-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key and
//! mouse events into [`InputCommand`]s and decodes textual direction tokens for
//! the headless runner.

pub mod map;
pub mod swipe;

pub use diamond_quest_types as types;

pub use map::{decode_direction, handle_key_event, should_quit, InputCommand};
pub use swipe::{decode_swipe, SwipeTracker};
