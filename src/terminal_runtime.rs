use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use crate::input::GameInput;
use crate::session::InputSource;

/// The board surface for one game: raw mode plus the alternate screen.
///
/// Call [`TerminalSession::leave`] to restore the shell and see whether that
/// worked. A session dropped while still active restores it anyway and only
/// logs failures.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        let opened = execute!(stdout, EnterAlternateScreen, Hide)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
        let terminal = match opened {
            Ok(terminal) => terminal,
            Err(error) => {
                if let Err(restore_error) = restore_terminal() {
                    warn!("could not undo partial terminal setup: {restore_error}");
                }
                return Err(error);
            }
        };

        debug!("terminal switched to raw mode and the alternate screen");
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Draws one full frame.
    pub fn draw<F>(&mut self, paint: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(paint)?;
        Ok(())
    }

    /// Gives the terminal back to the shell.
    pub fn leave(mut self) -> io::Result<()> {
        self.active = false;
        restore_terminal()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            if let Err(error) = restore_terminal() {
                warn!("terminal left in raw mode: {error}");
            }
        }
    }
}

/// Restores the terminal before the previous panic hook prints, so the
/// message is not lost in the alternate screen.
pub fn install_panic_hook() {
    let previous = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}

fn restore_terminal() -> io::Result<()> {
    run_restore_steps(disable_raw_mode, || {
        let mut stdout = io::stdout();
        execute!(stdout, Show, LeaveAlternateScreen)
    })
}

/// Runs both restore steps even if the first fails and reports the first
/// error.
fn run_restore_steps<A, B>(leave_raw_mode: A, leave_screen: B) -> io::Result<()>
where
    A: FnOnce() -> io::Result<()>,
    B: FnOnce() -> io::Result<()>,
{
    let raw = leave_raw_mode();
    let screen = leave_screen();
    raw.and(screen)
}

/// Keyboard input read from crossterm's event queue.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn poll_inputs(&mut self) -> io::Result<Vec<GameInput>> {
        let mut inputs = Vec::new();
        while event::poll(Duration::ZERO)? {
            let event: Event = event::read()?;
            if let Some(game_input) = GameInput::from_event(&event) {
                inputs.push(game_input);
            }
        }
        Ok(inputs)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;

    use super::run_restore_steps;

    #[test]
    fn screen_is_restored_even_when_raw_mode_fails() {
        let screen_restored = Cell::new(false);

        let result = run_restore_steps(
            || Err(io::Error::other("raw mode")),
            || {
                screen_restored.set(true);
                Ok(())
            },
        );

        assert!(screen_restored.get());
        let error = result.expect_err("raw mode failure should be reported");
        assert_eq!(error.to_string(), "raw mode");
    }

    #[test]
    fn first_failure_wins() {
        let result = run_restore_steps(
            || Err(io::Error::other("raw mode")),
            || Err(io::Error::other("screen")),
        );

        let error = result.expect_err("both steps failed");
        assert_eq!(error.to_string(), "raw mode");
    }

    #[test]
    fn clean_restore_is_ok() {
        assert!(run_restore_steps(|| Ok(()), || Ok(())).is_ok());
    }
}
