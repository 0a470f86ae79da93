use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::planner;
use crate::game::{AutopilotConfig, Direction, Grid, Position, Snake};

/// Phase of the autopilot
///
/// ```text
/// Off -> Engaging -> Active -> Malfunctioning
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutopilotState {
    /// Player has control
    Off,
    /// Takeover popup is showing; the game is frozen
    Engaging,
    /// Autopilot is steering toward the item
    Active,
    /// Autopilot is steering toward a crash
    Malfunctioning,
}

impl AutopilotState {
    /// Autopilot owns the controls (manual input is ignored)
    pub fn is_engaged(&self) -> bool {
        !matches!(self, AutopilotState::Off)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AutopilotState::Off => "off",
            AutopilotState::Engaging => "engaging",
            AutopilotState::Active => "active",
            AutopilotState::Malfunctioning => "malfunctioning",
        }
    }
}

/// Decision cached for a specific head position
#[derive(Debug, Clone, Copy, PartialEq)]
struct Plan {
    head: Position,
    direction: Option<Direction>,
}

/// Autopilot state machine and timers
///
/// All time flows in through [`Autopilot::advance`]; nothing here reads a
/// clock, so a test can drive every transition with synthetic durations.
#[derive(Debug, Clone)]
pub struct Autopilot {
    config: AutopilotConfig,
    state: AutopilotState,
    /// Time spent in the current phase
    phase_elapsed: Duration,
    /// Active time before the malfunction, drawn on each activation
    crash_delay: Duration,
    /// Move interval in effect when the autopilot was switched on
    saved_interval: Option<Duration>,
    since_decision: Duration,
    plan: Option<Plan>,
}

impl Autopilot {
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            config,
            state: AutopilotState::Off,
            phase_elapsed: Duration::ZERO,
            crash_delay: Duration::ZERO,
            saved_interval: None,
            since_decision: Duration::ZERO,
            plan: None,
        }
    }

    pub fn state(&self) -> AutopilotState {
        self.state
    }

    pub fn config(&self) -> &AutopilotConfig {
        &self.config
    }

    /// Delay drawn at the last activation
    pub fn crash_delay(&self) -> Duration {
        self.crash_delay
    }

    /// Interval recorded at activation, restored on deactivation
    pub fn saved_interval(&self) -> Option<Duration> {
        self.saved_interval
    }

    /// Move interval to use while active: half the interval at activation
    pub fn active_interval(&self) -> Option<Duration> {
        self.saved_interval
            .map(|interval| (interval / 2).max(Duration::from_millis(1)))
    }

    /// Time left on the takeover popup
    pub fn engaging_remaining(&self) -> Option<Duration> {
        match self.state {
            AutopilotState::Engaging => Some(
                self.config
                    .engaging_delay()
                    .saturating_sub(self.phase_elapsed),
            ),
            _ => None,
        }
    }

    /// Last direction the planner picked, if any
    pub fn planned_direction(&self) -> Option<Direction> {
        self.plan.and_then(|plan| plan.direction)
    }

    /// Switch on: Off -> Engaging
    ///
    /// Draws a fresh crash delay from the configured range and records the
    /// current move interval. Returns false if the autopilot was not off.
    pub fn activate<R: Rng>(&mut self, rng: &mut R, current_interval: Duration) -> bool {
        if self.state != AutopilotState::Off {
            return false;
        }

        let delay_ms =
            rng.gen_range(self.config.crash_delay_min_ms..=self.config.crash_delay_max_ms);
        self.crash_delay = Duration::from_millis(delay_ms);
        self.saved_interval = Some(current_interval);
        self.state = AutopilotState::Engaging;
        self.phase_elapsed = Duration::ZERO;
        self.since_decision = Duration::ZERO;
        self.plan = None;

        tracing::info!(
            crash_delay_ms = delay_ms,
            interval_ms = current_interval.as_millis() as u64,
            "autopilot engaging"
        );
        true
    }

    /// Switch off from any engaged state
    ///
    /// Returns the interval recorded at activation so the caller can restore
    /// it exactly, or `None` if the autopilot was already off.
    pub fn deactivate(&mut self) -> Option<Duration> {
        if self.state == AutopilotState::Off {
            return None;
        }

        tracing::info!(from = self.state.as_str(), "autopilot off");
        self.state = AutopilotState::Off;
        self.phase_elapsed = Duration::ZERO;
        self.since_decision = Duration::ZERO;
        self.plan = None;
        self.saved_interval.take()
    }

    /// Feed elapsed time; returns the new state if a transition happened
    ///
    /// At most one transition fires per call.
    pub fn advance(&mut self, elapsed: Duration) -> Option<AutopilotState> {
        self.since_decision = self.since_decision.saturating_add(elapsed);

        match self.state {
            AutopilotState::Engaging => {
                self.phase_elapsed = self.phase_elapsed.saturating_add(elapsed);
                if self.phase_elapsed >= self.config.engaging_delay() {
                    self.enter(AutopilotState::Active);
                    return Some(AutopilotState::Active);
                }
            }
            AutopilotState::Active => {
                self.phase_elapsed = self.phase_elapsed.saturating_add(elapsed);
                if self.phase_elapsed >= self.crash_delay {
                    self.enter(AutopilotState::Malfunctioning);
                    return Some(AutopilotState::Malfunctioning);
                }
            }
            AutopilotState::Off | AutopilotState::Malfunctioning => {}
        }

        None
    }

    fn enter(&mut self, next: AutopilotState) {
        match next {
            AutopilotState::Active => tracing::info!("autopilot active"),
            AutopilotState::Malfunctioning => tracing::warn!(
                after_ms = self.phase_elapsed.as_millis() as u64,
                "autopilot malfunction"
            ),
            _ => {}
        }
        self.state = next;
        self.phase_elapsed = Duration::ZERO;
        self.plan = None;
    }

    /// A fresh decision is due while active
    pub fn decision_due(&self) -> bool {
        self.state == AutopilotState::Active
            && self.since_decision >= self.config.decision_interval()
    }

    /// Recompute the active-mode decision for the current board
    pub fn replan(&mut self, grid: &Grid, snake: &Snake, item: Position) -> Option<Direction> {
        let direction = planner::decide(grid, snake, item);
        self.plan = Some(Plan {
            head: snake.head(),
            direction,
        });
        self.since_decision = Duration::ZERO;
        direction
    }

    /// Direction for the move about to happen
    ///
    /// Active mode reuses the last plan when it was made for the current head
    /// and is not yet due for a refresh; otherwise it replans. Malfunction
    /// mode always steers toward a crash. Returns `None` when the autopilot
    /// is not steering or no safe move exists.
    pub fn steer(&mut self, grid: &Grid, snake: &Snake, item: Position) -> Option<Direction> {
        match self.state {
            AutopilotState::Active => match self.plan {
                Some(plan) if plan.head == snake.head() && !self.decision_due() => plan.direction,
                _ => self.replan(grid, snake, item),
            },
            AutopilotState::Malfunctioning => {
                let direction = planner::malfunction_direction(grid, snake);
                self.plan = Some(Plan {
                    head: snake.head(),
                    direction: Some(direction),
                });
                Some(direction)
            }
            AutopilotState::Off | AutopilotState::Engaging => None,
        }
    }
}
