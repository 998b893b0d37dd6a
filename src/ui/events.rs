//! Event polling for the TUI screens
//!
//! Screens only care about key presses; resizes are picked up by the next
//! draw and everything else is ignored. Keys reach the screen loop through
//! [`KeySource`], so a session can also be driven from a script.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

/// Wait up to `timeout` for a key press
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn poll_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Where the screen loop gets its key presses from
pub trait KeySource {
    /// Wait up to `timeout` for the next key press
    ///
    /// # Errors
    ///
    /// Returns an error if the source can no longer deliver keys.
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

/// Keys read from the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        poll_key(timeout)
    }
}

/// Ctrl+C, regardless of other modifiers
#[must_use]
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// The quit gesture used by non-editing screens: `q`, Esc or Ctrl+C
#[must_use]
pub fn is_quit(key: &KeyEvent) -> bool {
    is_interrupt(key)
        || key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('q')
            && key.modifiers.difference(KeyModifiers::SHIFT).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn test_interrupt() {
        assert!(is_interrupt(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(!is_interrupt(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    }
}
