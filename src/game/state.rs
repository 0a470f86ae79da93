use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};
use super::snake::Snake;

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

impl CollisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionType::Wall => "wall",
            CollisionType::SelfCollision => "self",
        }
    }
}

/// Complete board state for one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub item: Position,
    pub grid: Grid,
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, item: Position, grid: Grid) -> Self {
        Self {
            snake,
            item,
            grid,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.grid.in_bounds(pos)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.grid.is_occupied(pos, &self.snake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    #[test]
    fn test_new_state_is_alive() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(10, 10),
            Grid::new(20, 20),
        );

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(20, 19)));
        assert!(state.is_occupied_by_snake(Position::new(4, 5)));
        assert!(!state.is_occupied_by_snake(state.item));
    }

    #[test]
    fn test_collision_labels() {
        assert_eq!(CollisionType::Wall.as_str(), "wall");
        assert_eq!(CollisionType::SelfCollision.as_str(), "self");
    }
}
