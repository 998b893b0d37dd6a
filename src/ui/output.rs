//! Output for messages outside and inside the TUI
//!
//! [`StdoutWriter`] prints colored lines once the terminal has been restored;
//! [`StatusMessage`] is the short-lived line shown at the bottom of a screen.

use colored::Colorize;
use std::time::{Duration, Instant};

/// How long a status line stays visible
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// Message level for categorizing output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Error message
    Error,
    /// Success message
    Success,
    /// Warning message
    Warning,
    /// Info message
    Info,
}

/// A message shown in a screen's status line
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// Message level (success, error, warning, info)
    pub level: MessageLevel,
    /// Message text
    pub text: String,
    /// When the message was created
    pub created_at: Instant,
}

impl StatusMessage {
    /// Create a new status message
    #[must_use]
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            created_at: Instant::now(),
        }
    }

    /// Check if the message has expired based on TTL
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Writes to stdout/stderr with colored prefixes
///
/// Only used while no terminal session is active.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutWriter;

impl StdoutWriter {
    /// Create a new stdout writer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Write a message at the given level
    pub fn message(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Error => self.error(message),
            MessageLevel::Success => self.success(message),
            MessageLevel::Warning => self.warning(message),
            MessageLevel::Info => self.info(message),
        }
    }

    pub fn write(&self, message: &str) {
        println!("{message}");
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "❌".red(), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠️".yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{}", message.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_expiry() {
        let msg = StatusMessage::new(MessageLevel::Info, "hello");
        assert!(!msg.is_expired(STATUS_TTL));
        assert_eq!(msg.level, MessageLevel::Info);
        assert_eq!(msg.text, "hello");
    }
}
