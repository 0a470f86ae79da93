//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! `GameSession` is the entry point for a frontend: feed it elapsed time and
//! input, read back a `RenderState`.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod motion;
pub mod session;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{AutopilotConfig, GameConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use grid::{Grid, Position};
pub use session::{EndCause, GameSession, RenderState, SessionEnd};
pub use snake::Snake;
pub use state::{CollisionType, GameState};
