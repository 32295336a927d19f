use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::food::SpawnPolicy;
use crate::game::TurnPolicy;
use crate::grid::Grid;
use crate::snake::CollisionRule;

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 24;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 24;

/// Default number of terminal columns used to draw one grid cell.
pub const DEFAULT_CELL_WIDTH: u16 = 2;

/// Reference tick rate of the game loop.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 10;

/// Body length the snake starts (and restarts) with.
pub const INITIAL_SNAKE_LENGTH: usize = 1;

/// Self-collision is only checked once the target length exceeds this.
pub const COLLISION_LENGTH_THRESHOLD: usize = 3;

const APP_DIR_NAME: &str = "wrap-snake";
const LOG_FILE_NAME: &str = "wrap-snake.log";

/// Construction-time configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1 cells, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("cell width must be at least one terminal column")]
    ZeroCellWidth,
    #[error("tick rate must be at least one tick per second")]
    ZeroTickRate,
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Session configuration, fixed once the game is constructed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GameConfig {
    pub grid_width: u16,
    pub grid_height: u16,
    /// Terminal columns per cell. Only the renderer reads this.
    pub cell_width: u16,
    pub ticks_per_second: u32,
    pub spawn_policy: SpawnPolicy,
    pub turn_policy: TurnPolicy,
    pub collision_rule: CollisionRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            cell_width: DEFAULT_CELL_WIDTH,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            spawn_policy: SpawnPolicy::default(),
            turn_policy: TurnPolicy::default(),
            collision_rule: CollisionRule::default(),
        }
    }
}

impl GameConfig {
    /// Loads a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field that would otherwise break the game mid-tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid()?;

        if self.cell_width == 0 {
            return Err(ConfigError::ZeroCellWidth);
        }

        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        Ok(())
    }

    /// Builds the grid described by this configuration.
    pub fn grid(&self) -> Result<Grid, ConfigError> {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// Time between two ticks at the configured rate.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

/// Returns the platform-correct default log file path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}
