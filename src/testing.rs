//! Testing utilities for privateer
//!
//! Fixtures for search results, a launcher that records instead of opening
//! anything, and helpers for driving screens and reading rendered buffers.
//!
//! Only available when compiled with `cfg(test)`.

use crate::config::ApiKey;
use crate::launch::{LaunchError, Launcher};
use crate::search::{LaunchTarget, ResultSet, SearchResult, SearchTask};
use crate::ui::Screen;
use crate::ui::events::KeySource;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// A search result with plausible fields
///
/// The link is left empty so tests control which launch target applies.
#[must_use]
pub fn sample_result(title: &str, seeders: i64, magnet: Option<&str>) -> SearchResult {
    SearchResult {
        tracker: "nyaasi".to_string(),
        category_desc: "TV/Anime".to_string(),
        title: title.to_string(),
        link: String::new(),
        publish_date: "2024-01-05T10:00:00Z".to_string(),
        size: 1_572_864,
        seeders,
        magnet_uri: magnet.map(String::from),
    }
}

/// A small result set in response order, with a seeder tie
#[must_use]
pub fn sample_results() -> ResultSet {
    let mut second = sample_result("ubuntu 2", 40, Some("magnet:?xt=urn:btih:2"));
    second.tracker = "1337x".to_string();
    second.size = 4 * 1024 * 1024 * 1024;

    let mut third = sample_result("ubuntu 3", 7, None);
    third.link = "https://tracker.example/t/3".to_string();
    third.publish_date = "2023-12-31T23:59:00".to_string();

    let mut arch = sample_result("Arch", 40, Some("magnet:?xt=urn:btih:4"));
    arch.tracker = "yts".to_string();
    arch.category_desc = "Software".to_string();

    ResultSet::from(vec![
        sample_result("ubuntu 1", 12, Some("magnet:?xt=urn:btih:1")),
        second,
        third,
        arch,
    ])
}

/// A fixed API key
#[must_use]
pub fn api_key() -> ApiKey {
    ApiKey::new("abc123").expect("non-empty key")
}

/// Launcher that records targets instead of opening them
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    launched: RefCell<Vec<LaunchTarget>>,
    fail: bool,
}

impl RecordingLauncher {
    /// A launcher whose every launch fails
    #[must_use]
    pub fn failing() -> Self {
        Self {
            launched: RefCell::default(),
            fail: true,
        }
    }

    /// Targets launched so far
    #[must_use]
    pub fn launched(&self) -> Vec<LaunchTarget> {
        self.launched.borrow().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, target: &LaunchTarget) -> Result<(), LaunchError> {
        if self.fail {
            return Err(LaunchError::Open {
                kind: target.kind(),
                source: io::Error::new(io::ErrorKind::NotFound, "no handler"),
            });
        }
        self.launched.borrow_mut().push(target.clone());
        Ok(())
    }
}

/// A key press without modifiers
#[must_use]
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Ctrl plus a letter
#[must_use]
pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Feed each character of `text` to a screen
pub fn type_text<S: Screen>(screen: &mut S, text: &str) {
    for c in text.chars() {
        let _ = screen.handle_key(key(KeyCode::Char(c)));
    }
}

/// A fixed sequence of key presses
///
/// Running out of keys is an error, so a session that never exits fails
/// instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one character press per char of `text`
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.keys.extend(text.chars().map(|c| key(KeyCode::Char(c))));
        self
    }

    /// Append one key press
    #[must_use]
    pub fn press(mut self, code: KeyCode) -> Self {
        self.keys.push_back(key(code));
        self
    }

    /// Keys not consumed yet
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self, _timeout: Duration) -> io::Result<Option<KeyEvent>> {
        self.keys
            .pop_front()
            .map(Some)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
    }
}

/// Rendered buffer contents, one line per row
#[must_use]
pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

/// A search task that never completes, with the runtime it runs on
///
/// Keep the runtime alive for as long as the task is used.
#[must_use]
pub fn spawn_pending_task() -> (tokio::runtime::Runtime, SearchTask) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("test runtime");
    let task = SearchTask::spawn_future(
        runtime.handle(),
        std::future::pending::<crate::search::Result<ResultSet>>(),
    );
    (runtime, task)
}
