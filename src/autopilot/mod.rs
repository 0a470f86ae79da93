//! Self-driving mode for the snake
//!
//! The controller owns the Off/Engaging/Active/Malfunctioning state machine
//! and its timers; the planner turns a board into a direction.

pub mod controller;
pub mod planner;

pub use controller::{Autopilot, AutopilotState};
pub use planner::{decide, freedom, malfunction_direction};
