//! Terminal session management
//!
//! One raw-mode, alternate-screen session spans every stage of the workflow.
//! The terminal is restored when the session is dropped and from a panic
//! hook, so an abnormal exit never leaves the shell in raw mode. The hook
//! only restores for panics on the thread that owns the session; a panicking
//! search worker is reported through its task instead.

use super::error::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::panic;
use std::sync::{Mutex, Once, PoisonError};
use std::thread::{self, ThreadId};

static PANIC_HOOK: Once = Once::new();

/// Thread running the active session, if any
static SESSION_THREAD: Mutex<Option<ThreadId>> = Mutex::new(None);

/// An active full-screen terminal session
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Setup terminal for TUI
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen cannot be entered.
    pub fn start() -> Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        or_cleanup(execute!(stdout, EnterAlternateScreen), disable_raw_mode)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).and_then(|mut terminal| {
            terminal.clear()?;
            Ok(terminal)
        });
        let terminal = or_cleanup(terminal, restore)?;

        set_session_thread(Some(thread::current().id()));
        tracing::debug!("terminal session started");

        Ok(Self { terminal })
    }

    /// The terminal to draw on
    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        set_session_thread(None);
        if let Err(e) = restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
        tracing::debug!("terminal session ended");
    }
}

/// Cleanup terminal after TUI
fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Run `cleanup` if a setup step failed, then pass the error on
fn or_cleanup<T>(step: io::Result<T>, cleanup: impl FnOnce() -> io::Result<()>) -> Result<T> {
    step.map_err(|e| {
        let _ = cleanup();
        e.into()
    })
}

fn set_session_thread(owner: Option<ThreadId>) {
    *SESSION_THREAD.lock().unwrap_or_else(PoisonError::into_inner) = owner;
}

/// Whether a panic on `thread` should tear the session down
fn owns_session(thread: ThreadId) -> bool {
    *SESSION_THREAD.lock().unwrap_or_else(PoisonError::into_inner) == Some(thread)
}

/// Restore the terminal before the default panic output is printed
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if owns_session(thread::current().id()) {
                let _ = restore();
            }
            previous(info);
        }));
    });
}
