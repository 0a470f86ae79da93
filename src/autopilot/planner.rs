//! Move selection for the autopilot
//!
//! Decisions are pure functions of the board: they read the snake, the item
//! and the grid bounds and return a direction without mutating anything.
//!
//! While active the planner scores every legal, immediately safe direction:
//!
//! ```text
//! score(d) = 0.7 * manhattan(head(d), item) + 0.3 * (4 - freedom(head(d)))
//! ```
//!
//! and picks the lowest score, with ties going to the earlier direction in
//! `Direction::SCORING_ORDER`. A malfunctioning autopilot skips scoring and
//! steers into a wall or into its own body instead.

use crate::game::{motion, Direction, Grid, Position, Snake};

/// Weight of the distance-to-item term
pub const DISTANCE_WEIGHT: f64 = 0.7;

/// Weight of the lost-mobility term
pub const FREEDOM_WEIGHT: f64 = 0.3;

/// Number of neighbours a cell can have
pub const MAX_FREEDOM: u32 = 4;

/// Shortest snake that collides with itself when spinning clockwise
pub const MIN_SPIN_LENGTH: usize = 4;

/// Count the immediately safe directions out of `cell` (0-4)
pub fn freedom(grid: &Grid, snake: &Snake, cell: Position) -> u32 {
    Direction::SCORING_ORDER
        .iter()
        .filter(|&&dir| !motion::would_collide(grid, snake, motion::step(cell, dir)))
        .count() as u32
}

/// Score a prospective head; lower is better
pub fn score_move(grid: &Grid, snake: &Snake, item: Position, new_head: Position) -> f64 {
    let distance = new_head.manhattan(item) as f64;
    let lost_freedom = (MAX_FREEDOM - freedom(grid, snake, new_head)) as f64;
    DISTANCE_WEIGHT * distance + FREEDOM_WEIGHT * lost_freedom
}

/// Safe, non-reversing directions with their scores, in scoring order
pub fn candidates(grid: &Grid, snake: &Snake, item: Position) -> Vec<(Direction, f64)> {
    let head = snake.head();
    let committed = snake.direction();

    Direction::SCORING_ORDER
        .into_iter()
        .filter(|&dir| !committed.is_opposite(dir))
        .filter_map(|dir| {
            let new_head = motion::step(head, dir);
            if motion::would_collide(grid, snake, new_head) {
                None
            } else {
                Some((dir, score_move(grid, snake, item, new_head)))
            }
        })
        .collect()
}

/// First immediately safe direction in `Direction::FALLBACK_ORDER`
///
/// Reversal is not excluded here; a reversing move is only safe for a
/// one-segment snake anyway.
pub fn fallback(grid: &Grid, snake: &Snake) -> Option<Direction> {
    Direction::FALLBACK_ORDER
        .into_iter()
        .find(|&dir| motion::is_safe(grid, snake, dir))
}

/// Choose the next direction for an active (healthy) autopilot
///
/// Returns `None` only when every neighbour of the head is blocked.
pub fn decide(grid: &Grid, snake: &Snake, item: Position) -> Option<Direction> {
    let mut best: Option<(Direction, f64)> = None;

    for (dir, score) in candidates(grid, snake, item) {
        // strict comparison keeps the earlier direction on ties
        if best.map_or(true, |(_, best_score)| score < best_score) {
            best = Some((dir, score));
        }
    }

    let choice = best.map(|(dir, _)| dir).or_else(|| fallback(grid, snake));
    tracing::trace!(
        head = ?snake.head(),
        ?item,
        choice = ?choice,
        "autopilot decision"
    );
    choice
}

/// Steering for a malfunctioning autopilot
///
/// On a border the snake turns straight into it (left, right, top, bottom
/// in that priority, skipping a wall that would need a reversal). Elsewhere
/// it rotates its heading clockwise every move, which closes a 2x2 loop on
/// its own body once it has `MIN_SPIN_LENGTH` segments. Shorter snakes keep their heading and reach a wall within
/// `max(width, height)` moves.
pub fn malfunction_direction(grid: &Grid, snake: &Snake) -> Direction {
    let head = snake.head();
    let heading = snake.direction();

    // walls touching the head in priority order; a corner has two
    let walls = [
        (grid.on_left_edge(head), Direction::Left),
        (grid.on_right_edge(head), Direction::Right),
        (grid.on_top_edge(head), Direction::Up),
        (grid.on_bottom_edge(head), Direction::Down),
    ];
    let mut touching = walls
        .into_iter()
        .filter_map(|(on_edge, dir)| on_edge.then_some(dir))
        .peekable();

    if touching.peek().is_none() {
        return if snake.len() >= MIN_SPIN_LENGTH {
            heading.clockwise()
        } else {
            heading
        };
    }

    // a reversal would be dropped by the engine, so keep driving instead
    touching
        .find(|&dir| !heading.is_opposite(dir))
        .unwrap_or(heading)
}
