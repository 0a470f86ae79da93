//! FSD Snake - a terminal Snake game with a self-driving mode
//!
//! This library provides:
//! - Core game logic and the session tick loop (game module)
//! - The autopilot state machine and move planner (autopilot module)
//! - TUI rendering and keyboard mapping (render, input modules)
//! - Interactive and headless execution modes (modes module)

pub mod autopilot;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
