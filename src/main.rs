use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{LevelFilter, warn};
use simplelog::{Config, WriteLogger};
use wrap_snake::config::{ConfigError, GameConfig, default_log_path};
use wrap_snake::food::SpawnPolicy;
use wrap_snake::game::{GameState, TurnPolicy};
use wrap_snake::renderer::TerminalRenderer;
use wrap_snake::session::{FixedRateClock, SessionLimits, SessionSummary, run_session};
use wrap_snake::snake::CollisionRule;
use wrap_snake::terminal_runtime::{CrosstermInput, TerminalSession, install_panic_hook};

/// Snake on a grid whose edges wrap around.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Ticks per second.
    #[arg(long = "tick-rate")]
    tick_rate: Option<u32>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Never place food on the snake.
    #[arg(long = "avoid-snake-food")]
    avoid_snake_food: bool,

    /// Apply at most one turn per tick and keep later key presses queued.
    #[arg(long = "first-valid-turn")]
    first_valid_turn: bool,

    /// Detect self-collision against the body as it will be after the move.
    #[arg(long = "precise-collision")]
    precise_collision: bool,

    /// Stop after this many ticks.
    #[arg(long = "max-ticks")]
    max_ticks: Option<u64>,

    /// Log file (defaults to the platform data directory).
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("wrap-snake: {error}");
            return ExitCode::from(2);
        }
    };

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Err(error) = init_logging(&log_path, cli.verbose) {
        eprintln!(
            "wrap-snake: logging disabled, cannot open {}: {error}",
            log_path.display()
        );
    }

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(&config, seed),
        None => GameState::new(&config),
    };
    let mut state = match state {
        Ok(state) => state,
        Err(error) => {
            eprintln!("wrap-snake: {error}");
            return ExitCode::from(2);
        }
    };

    install_panic_hook();

    let limits = SessionLimits {
        max_ticks: cli.max_ticks,
    };
    match run(&config, &mut state, limits) {
        Ok(summary) => {
            println!(
                "Ate {} food in {} ticks, reset {} times. Final length {}.",
                summary.food_eaten, summary.ticks, summary.resets, summary.final_length
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("wrap-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if let Some(tick_rate) = cli.tick_rate {
        config.ticks_per_second = tick_rate;
    }
    if cli.avoid_snake_food {
        config.spawn_policy = SpawnPolicy::AvoidSnake;
    }
    if cli.first_valid_turn {
        config.turn_policy = TurnPolicy::FirstValid;
    }
    if cli.precise_collision {
        config.collision_rule = CollisionRule::PostTrim;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(path: &Path, verbose: u8) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    WriteLogger::init(level, Config::default(), File::create(path)?)
        .map_err(|error| io::Error::new(io::ErrorKind::AlreadyExists, error))
}

fn run(
    config: &GameConfig,
    state: &mut GameState,
    limits: SessionLimits,
) -> io::Result<SessionSummary> {
    let (needed_width, needed_height) =
        TerminalRenderer::required_size(state.grid(), config.cell_width);
    if let Ok((width, height)) = crossterm::terminal::size() {
        if width < needed_width || height < needed_height {
            warn!(
                "terminal is {width}x{height}, the board needs {needed_width}x{needed_height}; it will be clipped"
            );
        }
    }

    let session = TerminalSession::enter()?;
    let mut renderer = TerminalRenderer::new(session, config.cell_width);
    let mut clock = FixedRateClock::new(config.tick_interval());

    let outcome = run_session(state, &mut CrosstermInput, &mut renderer, &mut clock, limits);
    if let Err(error) = renderer.finish() {
        warn!("could not restore the terminal: {error}");
    }
    outcome
}
