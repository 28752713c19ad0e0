//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal play. It skips widget toolkits and
//! renders into a plain framebuffer that is diffed and flushed to the
//! terminal through crossterm.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Render purely from a `SessionSnapshot`
//! - Control aspect ratio precisely (2 chars wide per grid cell)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use diamond_quest_core as core;
pub use diamond_quest_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
