//! Squarix - dodge the pursuing squares for as long as you can.
//!
//! - `entities`: plain game data
//! - `compute`: pure per-frame state transitions
//! - `game`: the session, the menu and the frame loop
//! - `surface` / `input` / `clock`: terminal-backed collaborators behind traits
//! - `terminal`: raw-mode session setup and teardown

pub mod clock;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod surface;
pub mod terminal;

pub use error::InitError;
pub use game::{MenuChoice, MenuResult, RunOutcome, Session};
