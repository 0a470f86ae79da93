use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    engine::GameEngine,
    grid::{Grid, Position},
    state::{CollisionType, GameState},
};
use crate::autopilot::{Autopilot, AutopilotState};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCause {
    /// Player left the game
    Quit,
    /// Snake hit a wall or itself
    Collision,
    /// Snake covers the whole grid
    GridFilled,
}

impl EndCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndCause::Quit => "quit",
            EndCause::Collision => "collision",
            EndCause::GridFilled => "grid_filled",
        }
    }
}

impl fmt::Display for EndCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final report of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEnd {
    pub score: u32,
    pub cause: EndCause,
    /// What the snake hit, for `EndCause::Collision`
    pub collision: Option<CollisionType>,
    /// Autopilot phase at the moment the session ended
    pub autopilot: AutopilotState,
    pub steps: u32,
}

/// Read-only snapshot for drawing a frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub item: Position,
    pub grid: Grid,
    pub score: u32,
    pub steps: u32,
    pub direction: Direction,
    pub autopilot: AutopilotState,
    pub planned_direction: Option<Direction>,
    pub engaging_remaining: Option<Duration>,
    pub tick_interval: Duration,
    pub outcome: Option<SessionEnd>,
}

impl RenderState {
    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

/// One game from spawn to game over
///
/// Owns the board, the autopilot and the move timer. A frontend calls
/// [`GameSession::on_tick`] once per frame with the real elapsed time and
/// forwards player input; the session never reads a clock itself.
///
/// Within a move the order is fixed: resolve the direction, advance the
/// snake, then check collision and pickup.
pub struct GameSession<R = StdRng> {
    engine: GameEngine<R>,
    state: GameState,
    autopilot: Autopilot,
    move_interval: Duration,
    since_move: Duration,
    pending_direction: Option<Direction>,
    outcome: Option<SessionEnd>,
    ticks: u64,
}

impl GameSession<StdRng> {
    /// Create a session, seeded from the config when a seed is set
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameSession<R> {
    /// Create a session around a caller-supplied random source
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let autopilot = Autopilot::new(config.autopilot.clone());
        let move_interval = config.initial_move_interval();
        let mut engine = GameEngine::with_rng(config, rng);
        let state = engine.reset();

        Self {
            engine,
            state,
            autopilot,
            move_interval,
            since_move: Duration::ZERO,
            pending_direction: None,
            outcome: None,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable board access for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    pub fn autopilot_state(&self) -> AutopilotState {
        self.autopilot.state()
    }

    /// Current time between moves
    pub fn move_interval(&self) -> Duration {
        self.move_interval
    }

    /// Number of `on_tick` calls processed
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn outcome(&self) -> Option<&SessionEnd> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advance the session by `elapsed` wall-clock time
    ///
    /// Returns the session report on the tick the session ends, `None`
    /// otherwise (including every tick after the end).
    pub fn on_tick(&mut self, elapsed: Duration) -> Option<SessionEnd> {
        if self.outcome.is_some() {
            return None;
        }
        self.ticks += 1;

        if let Some(next) = self.autopilot.advance(elapsed) {
            self.on_autopilot_transition(next);

            // the board stays frozen for the rest of the takeover tick
            if next == AutopilotState::Active {
                return None;
            }
        }

        // the takeover popup freezes the board
        if self.autopilot.state() == AutopilotState::Engaging {
            return None;
        }

        if self.autopilot.decision_due() {
            self.autopilot
                .replan(&self.state.grid, &self.state.snake, self.state.item);
        }

        self.since_move = self.since_move.saturating_add(elapsed);
        if self.since_move < self.move_interval {
            return None;
        }
        // keep the phase; a long stall still yields a single move
        self.since_move = carry_over(self.since_move, self.move_interval);

        self.advance_snake()
    }

    /// Queue a direction change from the player
    ///
    /// Ignored (returns false) while the autopilot is engaged or after the
    /// session ended.
    pub fn on_manual_direction(&mut self, direction: Direction) -> bool {
        if self.outcome.is_some() || self.autopilot.state().is_engaged() {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Toggle the autopilot
    ///
    /// Off starts engaging; Engaging or Active switch off and restore the
    /// interval recorded at activation. A malfunction can only be switched
    /// off when `allow_malfunction_override` is set. Returns the new state.
    pub fn on_toggle_autopilot(&mut self) -> AutopilotState {
        if self.outcome.is_some() {
            return self.autopilot.state();
        }

        match self.autopilot.state() {
            AutopilotState::Off => {
                if self
                    .autopilot
                    .activate(self.engine.rng(), self.move_interval)
                {
                    self.pending_direction = None;
                    self.since_move = Duration::ZERO;
                }
            }
            AutopilotState::Engaging | AutopilotState::Active => self.disengage(),
            AutopilotState::Malfunctioning => {
                if self.autopilot.config().allow_malfunction_override {
                    self.disengage();
                } else {
                    tracing::debug!("toggle ignored during malfunction");
                }
            }
        }

        self.autopilot.state()
    }

    /// End the session at the player's request
    pub fn quit(&mut self) -> SessionEnd {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        self.finish(EndCause::Quit, None)
    }

    /// Snapshot for the renderer
    pub fn render_state(&self) -> RenderState {
        RenderState {
            snake: self.state.snake.to_vec(),
            item: self.state.item,
            grid: self.state.grid,
            score: self.state.score,
            steps: self.state.steps,
            direction: self.state.snake.direction(),
            autopilot: self.autopilot.state(),
            planned_direction: self.autopilot.planned_direction(),
            engaging_remaining: self.autopilot.engaging_remaining(),
            tick_interval: self.move_interval,
            outcome: self.outcome.clone(),
        }
    }

    fn on_autopilot_transition(&mut self, next: AutopilotState) {
        if next == AutopilotState::Active {
            if let Some(interval) = self.autopilot.active_interval() {
                tracing::debug!(
                    interval_ms = interval.as_millis() as u64,
                    "autopilot speed-up"
                );
                self.move_interval = interval;
            }
            self.since_move = Duration::ZERO;
        }
    }

    fn disengage(&mut self) {
        if let Some(saved) = self.autopilot.deactivate() {
            self.move_interval = saved;
        }
    }

    fn advance_snake(&mut self) -> Option<SessionEnd> {
        let action = if self.autopilot.state().is_engaged() {
            self.pending_direction = None;
            Action::from(
                self.autopilot
                    .steer(&self.state.grid, &self.state.snake, self.state.item),
            )
        } else {
            Action::from(self.pending_direction.take())
        };

        let result = self.engine.step(&mut self.state, action);

        if let Some(collision) = result.info.collision_type {
            return Some(self.finish(EndCause::Collision, Some(collision)));
        }

        if result.info.ate_item {
            let config = self.engine.config();
            let floor = config.min_move_interval();
            // the halved active interval may already sit below the floor
            if self.move_interval > floor {
                self.move_interval = self
                    .move_interval
                    .saturating_sub(config.speed_step())
                    .max(floor);
            }
            tracing::debug!(
                score = self.state.score,
                interval_ms = self.move_interval.as_millis() as u64,
                "item picked up"
            );
        }

        if result.info.grid_filled {
            return Some(self.finish(EndCause::GridFilled, None));
        }

        None
    }

    fn finish(&mut self, cause: EndCause, collision: Option<CollisionType>) -> SessionEnd {
        let outcome = SessionEnd {
            score: self.state.score,
            cause,
            collision,
            autopilot: self.autopilot.state(),
            steps: self.state.steps,
        };

        tracing::info!(
            score = outcome.score,
            cause = %outcome.cause,
            autopilot = outcome.autopilot.as_str(),
            "session ended"
        );

        self.state.is_alive = false;
        self.disengage();
        self.outcome = Some(outcome.clone());
        outcome
    }
}

/// Time left over after one move, always below `interval`
fn carry_over(since_move: Duration, interval: Duration) -> Duration {
    let nanos = since_move.as_nanos() % interval.as_nanos().max(1);
    Duration::from_nanos(nanos as u64)
}
