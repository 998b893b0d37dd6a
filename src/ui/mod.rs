//! Terminal UI
//!
//! Every stage of the workflow is a [`Screen`]: a value that knows how to
//! draw itself, react to key presses and advance on a timer. [`run_screen`]
//! drives any screen on any ratatui backend until the screen yields its
//! output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Workflow (stage transitions)       │
//! └────────────────┬────────────────────────┘
//!                  │ runs one screen per stage
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │      run_screen (tick / draw / poll)    │
//! └────────────────┬────────────────────────┘
//!         ┌────────┼─────────┐
//!         ▼        ▼         ▼
//!   PromptScreen SearchScreen BrowserScreen
//! ```

pub mod error;
pub mod events;
pub mod output;
pub mod screens;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use error::{Result, UiError};
pub use output::{MessageLevel, StatusMessage, StdoutWriter};
pub use terminal::TerminalSession;
pub use theme::Theme;

use crossterm::event::KeyEvent;
use events::KeySource;
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::Duration;

/// What a screen wants after handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<T> {
    /// Keep running the screen
    Continue,
    /// Leave the screen with a value
    Exit(T),
}

impl<T> Flow<T> {
    /// Whether the screen is finished
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self, Self::Exit(_))
    }
}

/// A self-contained interactive stage
pub trait Screen {
    /// Value produced when the screen exits
    type Output;

    /// Draw the screen
    fn render(&mut self, frame: &mut Frame<'_>, theme: &Theme);

    /// React to a key press
    fn handle_key(&mut self, key: KeyEvent) -> Flow<Self::Output>;

    /// Called once per loop iteration, before drawing
    fn on_tick(&mut self) -> Flow<Self::Output> {
        Flow::Continue
    }
}

/// Run a screen until it exits
///
/// Each iteration ticks the screen, draws it, then waits up to `tick` for a
/// key press from `keys`.
///
/// # Errors
///
/// Returns `UiError` if drawing or event polling fails.
pub fn run_screen<B, S, K>(
    terminal: &mut Terminal<B>,
    keys: &mut K,
    screen: &mut S,
    theme: &Theme,
    tick: Duration,
) -> Result<S::Output>
where
    B: Backend,
    S: Screen,
    K: KeySource + ?Sized,
{
    loop {
        if let Flow::Exit(output) = screen.on_tick() {
            return Ok(output);
        }

        terminal.draw(|frame| screen.render(frame, theme))?;

        if let Some(key) = keys.next_key(tick)? {
            if let Flow::Exit(output) = screen.handle_key(key) {
                return Ok(output);
            }
        }
    }
}
