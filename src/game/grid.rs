use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::snake::Snake;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Manhattan distance to another cell
    pub fn manhattan(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Fixed-size playing field, `[0, width) x [0, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied(&self, pos: Position, snake: &Snake) -> bool {
        snake.contains(pos)
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Cells not covered by the snake, in row-major order
    pub fn free_cells(&self, snake: &Snake) -> Vec<Position> {
        self.cells().filter(|&pos| !snake.contains(pos)).collect()
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    pub fn on_left_edge(&self, pos: Position) -> bool {
        pos.x == 0
    }

    pub fn on_right_edge(&self, pos: Position) -> bool {
        pos.x == self.width as i32 - 1
    }

    pub fn on_top_edge(&self, pos: Position) -> bool {
        pos.y == 0
    }

    pub fn on_bottom_edge(&self, pos: Position) -> bool {
        pos.y == self.height as i32 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(5, 5);
        assert_eq!(a.manhattan(Position::new(8, 5)), 3);
        assert_eq!(a.manhattan(Position::new(2, 9)), 7);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20, 20);

        assert!(grid.in_bounds(Position::new(0, 0)));
        assert!(grid.in_bounds(Position::new(19, 19)));
        assert!(!grid.in_bounds(Position::new(-1, 0)));
        assert!(!grid.in_bounds(Position::new(20, 0)));
        assert!(!grid.in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_occupancy() {
        let grid = Grid::new(10, 10);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        assert!(grid.is_occupied(Position::new(5, 5), &snake));
        assert!(grid.is_occupied(Position::new(3, 5), &snake));
        assert!(!grid.is_occupied(Position::new(6, 5), &snake));
    }

    #[test]
    fn test_free_cells_excludes_snake() {
        let grid = Grid::new(5, 5);
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 3);
        let free = grid.free_cells(&snake);

        assert_eq!(free.len(), 25 - 3);
        assert!(!free.contains(&Position::new(1, 2)));
        assert_eq!(grid.cells().count(), grid.area());
    }

    #[test]
    fn test_edges() {
        let grid = Grid::new(8, 6);
        assert!(grid.on_left_edge(Position::new(0, 3)));
        assert!(grid.on_right_edge(Position::new(7, 3)));
        assert!(grid.on_top_edge(Position::new(4, 0)));
        assert!(grid.on_bottom_edge(Position::new(4, 5)));
        assert!(!grid.on_right_edge(Position::new(6, 3)));
    }
}
