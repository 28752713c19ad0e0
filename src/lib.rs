//! Diamond Quest (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof
//! (`diamond_quest::{core,input,term,types}`) and hosts the pieces shared by
//! the binary: runtime configuration and the headless script runner.

pub mod config;
pub mod headless;

pub use diamond_quest_core as core;
pub use diamond_quest_input as input;
pub use diamond_quest_term as term;
pub use diamond_quest_types as types;
