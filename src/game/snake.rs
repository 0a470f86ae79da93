use std::collections::{HashSet, VecDeque};

use super::action::Direction;
use super::grid::Position;

/// The snake in the game
///
/// Segments are stored head first. A `HashSet` mirrors the segments for O(1)
/// occupancy lookups and is updated on every mutation of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
    direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    ///
    /// The initial body trails behind the head, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        assert!(length > 0, "snake must have at least one segment");

        let (dx, dy) = direction.delta();
        let body: VecDeque<Position> = (0..length as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self::from_segments(body, direction)
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(segments: impl IntoIterator<Item = Position>, direction: Direction) -> Self {
        let body: VecDeque<Position> = segments.into_iter().collect();
        assert!(!body.is_empty(), "snake must have at least one segment");

        let occupied: HashSet<Position> = body.iter().copied().collect();
        assert_eq!(occupied.len(), body.len(), "snake segments must not overlap");

        Self {
            body,
            occupied,
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.segments().collect()
    }

    /// Current committed direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Turn the snake, ignoring 180-degree turns
    ///
    /// Returns true if the direction was accepted.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Check if any segment (head included) sits on `pos`
    pub fn contains(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        pos != self.head() && self.contains(pos)
    }

    /// Prepend `new_head`; drop the tail unless growing
    pub(crate) fn push_head(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        self.occupied.insert(new_head);

        if !grow {
            if let Some(old_tail) = self.body.pop_back() {
                if old_tail != new_head {
                    self.occupied.remove(&old_tail);
                }
            }
        }

        debug_assert_eq!(self.occupied.len(), self.body.len());
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake has at least one segment
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
