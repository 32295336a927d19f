use std::collections::VecDeque;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::food::{Food, SpawnPolicy};
use crate::grid::{Grid, Position};
use crate::input::Direction;
use crate::snake::{CollisionRule, MoveOutcome, Snake};

/// Number of turns kept for later ticks under [`TurnPolicy::FirstValid`].
pub const TURN_BUFFER_CAPACITY: usize = 3;

/// How direction changes that arrive between two ticks are resolved.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnPolicy {
    /// Apply every pending turn in arrival order; the last accepted one wins.
    #[default]
    LastWins,
    /// Apply the first turn that changes the heading and keep the rest queued
    /// for the following ticks.
    FirstValid,
}

/// What happened during one [`GameState::tick`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickReport {
    pub movement: MoveOutcome,
    pub ate_food: bool,
}

/// Everything a render sink needs to draw one frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub grid: Grid,
    /// Snake cells, head first.
    pub body: Vec<Position>,
    pub heading: Direction,
    pub food: Position,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub tick_count: u64,
    pub food_eaten: u32,
    pub resets: u32,
    grid: Grid,
    collision_rule: CollisionRule,
    spawn_policy: SpawnPolicy,
    turn_policy: TurnPolicy,
    pending_turns: VecDeque<Direction>,
    rng: StdRng,
}

impl GameState {
    /// Creates a state seeded from system entropy.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::new_with_seed(config, rand::thread_rng().next_u64())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.grid()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let snake = Snake::new(grid, &mut rng);
        let food = Food::new(grid, &mut rng, config.spawn_policy, &snake);

        Ok(Self {
            snake,
            food,
            tick_count: 0,
            food_eaten: 0,
            resets: 0,
            grid,
            collision_rule: config.collision_rule,
            spawn_policy: config.spawn_policy,
            turn_policy: config.turn_policy,
            pending_turns: VecDeque::new(),
            rng,
        })
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Rule applied to every move, independent of which snake is in play.
    #[must_use]
    pub fn collision_rule(&self) -> CollisionRule {
        self.collision_rule
    }

    #[must_use]
    pub fn turn_policy(&self) -> TurnPolicy {
        self.turn_policy
    }

    /// Turns received since the last tick and not yet applied.
    pub fn pending_turns(&self) -> impl Iterator<Item = &Direction> {
        self.pending_turns.iter()
    }

    /// Buffers a direction change for the next tick.
    pub fn queue_turn(&mut self, direction: Direction) {
        match self.turn_policy {
            TurnPolicy::LastWins => self.pending_turns.push_back(direction),
            TurnPolicy::FirstValid => {
                if self.pending_turns.len() < TURN_BUFFER_CAPACITY {
                    self.pending_turns.push_back(direction);
                } else {
                    trace!("turn buffer full, dropping {direction:?}");
                }
            }
        }
    }

    /// Drops every buffered turn without applying it.
    pub fn clear_pending_turns(&mut self) {
        self.pending_turns.clear();
    }

    /// Advances the simulation by one tick: pending turns, one move, then
    /// the food check.
    pub fn tick(&mut self) -> TickReport {
        self.tick_count += 1;
        self.apply_pending_turns();

        let movement = self.snake
            .move_forward(self.grid, self.collision_rule, &mut self.rng);
        if movement == MoveOutcome::Reset {
            self.resets += 1;
            info!(
                "snake hit itself on tick {}, reset to {:?}",
                self.tick_count,
                self.snake.head()
            );
        }

        let ate_food = self.snake.head() == self.food.position;
        if ate_food {
            self.food_eaten += 1;
            self.snake.grow();
            self.food
                .randomize(self.grid, &mut self.rng, self.spawn_policy, &self.snake);
            debug!(
                "food eaten on tick {}, target length {}, food moved to {:?}",
                self.tick_count,
                self.snake.target_length(),
                self.food.position
            );
        }

        TickReport { movement, ate_food }
    }

    /// Copies out the state a renderer draws.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            body: self.snake.segments().copied().collect(),
            heading: self.snake.heading(),
            food: self.food.position,
        }
    }

    fn apply_pending_turns(&mut self) {
        match self.turn_policy {
            TurnPolicy::LastWins => {
                while let Some(direction) = self.pending_turns.pop_front() {
                    if !self.snake.turn(direction) {
                        trace!("rejected reverse turn to {direction:?}");
                    }
                }
            }
            TurnPolicy::FirstValid => {
                while let Some(direction) = self.pending_turns.pop_front() {
                    if direction == self.snake.heading() {
                        continue;
                    }
                    if self.snake.turn(direction) {
                        break;
                    }
                    trace!("rejected reverse turn to {direction:?}");
                }
            }
        }
    }
}
