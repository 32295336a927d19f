use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};
use crate::snake::Snake;

/// Where a relocated food item may land.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpawnPolicy {
    /// Any cell, including ones under the snake.
    #[default]
    Anywhere,
    /// Only cells the snake does not occupy. Falls back to `Anywhere` when
    /// the snake fills the grid.
    AvoidSnake,
}

/// The single food item on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    /// Creates food at a fixed `position`.
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self { position }
    }

    /// Creates food at a random cell chosen by `policy`.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(
        grid: Grid,
        rng: &mut R,
        policy: SpawnPolicy,
        snake: &Snake,
    ) -> Self {
        Self::at(spawn_position(rng, grid, policy, snake))
    }

    /// Moves the food to a fresh random cell chosen by `policy`.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        grid: Grid,
        rng: &mut R,
        policy: SpawnPolicy,
        snake: &Snake,
    ) {
        self.position = spawn_position(rng, grid, policy, snake);
    }
}

/// Picks a uniformly random cell according to `policy`.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: Grid,
    policy: SpawnPolicy,
    snake: &Snake,
) -> Position {
    if policy == SpawnPolicy::AvoidSnake {
        if let Some(position) = grid
            .cells()
            .filter(|cell| !snake.occupies(*cell))
            .choose(rng)
        {
            return position;
        }
    }

    Position {
        x: rng.gen_range(0..i32::from(grid.width())),
        y: rng.gen_range(0..i32::from(grid.height())),
    }
}
