use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    grid::{Grid, Position},
    motion,
    snake::Snake,
    state::{CollisionType, GameState},
};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake picked up the item this step
    pub ate_item: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// The snake covers every cell, so no item could be placed
    pub grid_filled: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn finished() -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_item: false,
                collision_type: None,
                grid_filled: false,
            },
        }
    }
}

/// Applies moves to a `GameState` and places items
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine, seeded from the config when a seed is set
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine around a caller-supplied random source
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Random source shared with the rest of the session
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let grid = self.config.grid();
        let length = self.config.initial_snake_length;
        assert!(
            length >= 1 && length <= grid.width / 2 + 1,
            "initial snake of length {length} does not fit a {}x{} grid",
            grid.width,
            grid.height
        );

        let snake = Snake::new(grid.center(), Direction::Right, length);
        let item = self
            .spawn_item(&grid, &snake)
            .expect("a fresh grid always has a free cell");

        GameState::new(snake, item, grid)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult::finished();
        }

        // Update direction based on action (180° turns are ignored)
        if let Action::Move(new_direction) = action {
            state.snake.turn(new_direction);
        }

        let direction = state.snake.direction();
        let new_head = motion::step(state.snake.head(), direction);

        if let Some(collision_type) = motion::collides(&state.grid, &state.snake, new_head) {
            state.is_alive = false;
            state.steps += 1;

            return StepResult {
                terminated: true,
                info: StepInfo {
                    ate_item: false,
                    collision_type: Some(collision_type),
                    grid_filled: false,
                },
            };
        }

        let ate_item = new_head == state.item;
        motion::advance_mut(&mut state.snake, direction, ate_item);
        state.steps += 1;

        let mut grid_filled = false;
        if ate_item && motion::picked_up(&state.snake, state.item) {
            state.score += self.config.score_increment;

            match self.spawn_item(&state.grid, &state.snake) {
                Some(item) => state.item = item,
                None => {
                    grid_filled = true;
                    state.is_alive = false;
                }
            }
        }

        StepResult {
            terminated: grid_filled,
            info: StepInfo {
                ate_item,
                collision_type: None,
                grid_filled,
            },
        }
    }

    /// Pick a uniformly random cell not covered by the snake
    ///
    /// Returns `None` when the snake fills the whole grid.
    pub fn spawn_item(&mut self, grid: &Grid, snake: &Snake) -> Option<Position> {
        grid.free_cells(snake).choose(&mut self.rng).copied()
    }
}
