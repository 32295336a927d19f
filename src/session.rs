//! The game loop and the seams it talks to the outside world through.
//!
//! [`run_session`] owns the loop; the terminal binary plugs in crossterm
//! input, a ratatui renderer and a wall-clock tick driver, while tests plug
//! in scripted fakes.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use log::info;

use crate::game::{GameState, Snapshot};
use crate::input::GameInput;

/// Produces the inputs that arrived since the previous poll.
pub trait InputSource {
    /// Returns every pending input without blocking.
    fn poll_inputs(&mut self) -> io::Result<Vec<GameInput>>;
}

/// Draws one frame per tick.
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;
}

/// Paces the loop. Returns once the next tick is due.
pub trait TickClock {
    fn wait_for_tick(&mut self);
}

/// Wall-clock driver firing at a fixed interval.
#[derive(Debug, Clone)]
pub struct FixedRateClock {
    interval: Duration,
    next_tick: Option<Instant>,
}

impl FixedRateClock {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl TickClock for FixedRateClock {
    fn wait_for_tick(&mut self) {
        let now = Instant::now();
        let deadline = *self.next_tick.get_or_insert(now + self.interval);

        if let Some(remaining) = deadline.checked_duration_since(now) {
            thread::sleep(remaining);
        }

        // A late tick restarts the schedule rather than firing a burst.
        let next = deadline + self.interval;
        self.next_tick = Some(next.max(Instant::now()));
    }
}

/// Optional bounds on a session.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SessionLimits {
    pub max_ticks: Option<u64>,
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    Quit,
    TickLimit,
}

/// Terminal status handed back to the caller of [`run_session`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub ticks: u64,
    pub food_eaten: u32,
    pub resets: u32,
    pub final_length: usize,
}

impl SessionSummary {
    fn from_state(state: &GameState, reason: EndReason) -> Self {
        Self {
            reason,
            ticks: state.tick_count,
            food_eaten: state.food_eaten,
            resets: state.resets,
            final_length: state.snake.len(),
        }
    }
}

/// Runs the game until a quit input or the tick limit.
///
/// Each iteration waits for the clock, drains the input source, ticks once
/// and renders. A quit input ends the loop before the tick it arrived with.
pub fn run_session<I, S, C>(
    state: &mut GameState,
    input: &mut I,
    sink: &mut S,
    clock: &mut C,
    limits: SessionLimits,
) -> io::Result<SessionSummary>
where
    I: InputSource + ?Sized,
    S: RenderSink + ?Sized,
    C: TickClock + ?Sized,
{
    info!(
        "session started on a {}x{} grid",
        state.grid().width(),
        state.grid().height()
    );
    sink.render(&state.snapshot())?;

    let reason = loop {
        if limits.max_ticks.is_some_and(|max| state.tick_count >= max) {
            break EndReason::TickLimit;
        }

        clock.wait_for_tick();

        let inputs = input.poll_inputs()?;
        if inputs.contains(&GameInput::Quit) {
            // Turns from this poll never reach a tick.
            state.clear_pending_turns();
            break EndReason::Quit;
        }
        for game_input in inputs {
            if let GameInput::Direction(direction) = game_input {
                state.queue_turn(direction);
            }
        }

        state.tick();
        sink.render(&state.snapshot())?;
    };

    let summary = SessionSummary::from_state(state, reason);
    info!(
        "session ended ({:?}) after {} ticks: {} food eaten, {} resets",
        summary.reason, summary.ticks, summary.food_eaten, summary.resets
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::time::{Duration, Instant};

    use super::{
        EndReason, FixedRateClock, InputSource, RenderSink, SessionLimits, TickClock,
        run_session,
    };
    use crate::config::GameConfig;
    use crate::food::Food;
    use crate::game::{GameState, Snapshot};
    use crate::grid::Position;
    use crate::input::{Direction, GameInput};
    use crate::snake::Snake;

    struct Scripted(VecDeque<Vec<GameInput>>);

    impl InputSource for Scripted {
        fn poll_inputs(&mut self) -> io::Result<Vec<GameInput>> {
            Ok(self.0.pop_front().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<Snapshot>);

    impl RenderSink for Recorder {
        fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
            self.0.push(snapshot.clone());
            Ok(())
        }
    }

    struct NoWait;

    impl TickClock for NoWait {
        fn wait_for_tick(&mut self) {}
    }

    struct BrokenSink;

    impl RenderSink for BrokenSink {
        fn render(&mut self, _snapshot: &Snapshot) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    fn state() -> GameState {
        let config = GameConfig {
            grid_width: 24,
            grid_height: 24,
            ..GameConfig::default()
        };
        let mut state = GameState::new_with_seed(&config, 5).expect("config should be valid");
        state.snake = Snake::from_segments(vec![Position::new(12, 12)], Direction::Right);
        state.food = Food::at(Position::new(0, 0));
        state
    }

    #[test]
    fn quit_stops_before_ticking() {
        let mut state = state();
        let mut input = Scripted(VecDeque::from([
            vec![],
            vec![GameInput::Direction(Direction::Down), GameInput::Quit],
        ]));
        let mut sink = Recorder::default();

        let summary = run_session(
            &mut state,
            &mut input,
            &mut sink,
            &mut NoWait,
            SessionLimits::default(),
        )
        .expect("session should run");

        assert_eq!(summary.reason, EndReason::Quit);
        assert_eq!(summary.ticks, 1);
        assert_eq!(state.snake.head(), Position::new(13, 12));
        assert_eq!(state.pending_turns().count(), 0);
        // Initial frame plus one per tick.
        assert_eq!(sink.0.len(), 2);
    }

    #[test]
    fn tick_limit_ends_the_session() {
        let mut state = state();
        let mut input = Scripted(VecDeque::from([vec![GameInput::Direction(Direction::Up)]]));
        let mut sink = Recorder::default();

        let summary = run_session(
            &mut state,
            &mut input,
            &mut sink,
            &mut NoWait,
            SessionLimits { max_ticks: Some(3) },
        )
        .expect("session should run");

        assert_eq!(summary.reason, EndReason::TickLimit);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.final_length, 1);
        assert_eq!(
            sink.0.last().map(|frame| frame.body[0]),
            Some(Position::new(12, 9))
        );
    }

    #[test]
    fn render_errors_propagate() {
        let mut state = state();
        let mut input = Scripted(VecDeque::new());

        let result = run_session(
            &mut state,
            &mut input,
            &mut BrokenSink,
            &mut NoWait,
            SessionLimits { max_ticks: Some(5) },
        );

        assert!(result.is_err());
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn fixed_rate_clock_waits_roughly_one_interval() {
        let mut clock = FixedRateClock::new(Duration::from_millis(5));
        let started = Instant::now();

        clock.wait_for_tick();
        clock.wait_for_tick();

        assert!(started.elapsed() >= Duration::from_millis(10));
        assert_eq!(clock.interval(), Duration::from_millis(5));
    }
}
