//! Movement and collision rules
//!
//! Everything here is a pure function of its inputs so the autopilot can probe
//! prospective moves without touching the live game state.

use super::action::Direction;
use super::grid::{Grid, Position};
use super::snake::Snake;
use super::state::CollisionType;

/// Cell the head would occupy after moving one step in `direction`
pub fn step(head: Position, direction: Direction) -> Position {
    head.moved_in_direction(direction)
}

/// Move `snake` one step in `direction` in place
///
/// The direction is committed as given; callers are responsible for
/// rejecting reversals before getting here.
pub fn advance_mut(snake: &mut Snake, direction: Direction, grew: bool) {
    let new_head = step(snake.head(), direction);
    snake.set_direction(direction);
    snake.push_head(new_head, grew);
}

/// Return the snake after moving one step in `direction`
pub fn advance(snake: &Snake, direction: Direction, grew: bool) -> Snake {
    let mut next = snake.clone();
    advance_mut(&mut next, direction, grew);
    next
}

/// Classify what a prospective head at `candidate` would hit
///
/// The candidate is checked against the full current body, tail included.
pub fn collides(grid: &Grid, snake: &Snake, candidate: Position) -> Option<CollisionType> {
    if !grid.in_bounds(candidate) {
        return Some(CollisionType::Wall);
    }

    if grid.is_occupied(candidate, snake) {
        return Some(CollisionType::SelfCollision);
    }

    None
}

/// Single safety predicate shared by the engine and the autopilot
pub fn would_collide(grid: &Grid, snake: &Snake, candidate: Position) -> bool {
    collides(grid, snake, candidate).is_some()
}

/// Whether moving from the current head in `direction` is immediately safe
pub fn is_safe(grid: &Grid, snake: &Snake, direction: Direction) -> bool {
    !would_collide(grid, snake, step(snake.head(), direction))
}

/// Head sits on the item
pub fn picked_up(snake: &Snake, item: Position) -> bool {
    snake.head() == item
}
