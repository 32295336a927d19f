use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{COLLISION_LENGTH_THRESHOLD, INITIAL_SNAKE_LENGTH};
use crate::grid::{Grid, Position};
use crate::input::Direction;

/// How a move decides that the snake ran into itself.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionRule {
    /// Only snakes longer than three cells can collide, against any body cell.
    #[default]
    LengthGuard,
    /// Collide with any cell still occupied after this move's tail trim.
    PostTrim,
}

/// Result of a single [`Snake::move_forward`] call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MoveOutcome {
    Moved,
    /// The snake hit itself and was put back at the grid center.
    Reset,
}

/// Snake body, heading and growth target.
///
/// The body is ordered head first. It is allowed to overlap itself; only a
/// move that lands on an occupied cell counts as a collision.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    target_length: usize,
    heading: Direction,
}

impl Snake {
    /// Creates a one-cell snake at the grid center facing a random direction.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(grid: Grid, rng: &mut R) -> Self {
        Self::from_segments(vec![grid.center()], Direction::random(rng))
    }

    /// Creates a snake from explicit body segments (front is head). The
    /// target length starts at the segment count.
    ///
    /// `segments` must hold at least the head. Release builds fall back to
    /// a one-cell snake at the origin.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, heading: Direction) -> Self {
        debug_assert!(!segments.is_empty(), "snake needs at least a head segment");

        let mut body = VecDeque::from(segments);
        if body.is_empty() {
            body.push_front(Position::new(0, 0));
        }

        Self {
            target_length: body.len(),
            body,
            heading,
        }
    }

    /// Requests a new heading.
    ///
    /// A direct reversal is refused once the snake is longer than one cell,
    /// because it would send the head straight into its neck. Returns whether
    /// the request was accepted.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.target_length > INITIAL_SNAKE_LENGTH && direction == self.heading.opposite() {
            return false;
        }

        self.heading = direction;
        true
    }

    /// Advances the head one cell, wrapping around the grid, and trims the
    /// tail back down to the target length.
    ///
    /// On self-collision, as decided by `rule`, the snake is reset instead
    /// and nothing else changes this move.
    pub fn move_forward<R: Rng + ?Sized>(
        &mut self,
        grid: Grid,
        rule: CollisionRule,
        rng: &mut R,
    ) -> MoveOutcome {
        let next_head = grid.wrap(self.head(), self.heading);

        if self.collides_with(next_head, rule) {
            self.reset(grid, rng);
            return MoveOutcome::Reset;
        }

        self.body.push_front(next_head);
        while self.body.len() > self.target_length {
            let _ = self.body.pop_back();
        }

        MoveOutcome::Moved
    }

    /// Puts the snake back in its freshly created state.
    pub fn reset<R: Rng + ?Sized>(&mut self, grid: Grid, rng: &mut R) {
        self.body.clear();
        self.body.push_front(grid.center());
        self.target_length = INITIAL_SNAKE_LENGTH;
        self.heading = Direction::random(rng);
    }

    /// Extends the target length by one. The body catches up on later moves
    /// because the tail is no longer trimmed.
    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    fn collides_with(&self, next_head: Position, rule: CollisionRule) -> bool {
        match rule {
            CollisionRule::LengthGuard => {
                self.target_length > COLLISION_LENGTH_THRESHOLD && self.occupies(next_head)
            }
            CollisionRule::PostTrim => {
                // After pushing the new head the body keeps at most
                // `target_length - 1` of the current cells.
                let kept = self.body.len().min(self.target_length.saturating_sub(1));
                self.body.iter().take(kept).any(|segment| *segment == next_head)
            }
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body
            .front()
            .copied()
            .unwrap_or(Position::new(0, 0))
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
