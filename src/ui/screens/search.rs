//! Search execution screen
//!
//! Shows a spinner while the background request runs, then either hands the
//! results on or waits for the user to decide what to do about an empty or
//! failed search.

use crate::search::{ResultSet, SearchError, SearchQuery, SearchTask};
use crate::ui::events::is_quit;
use crate::ui::theme::Theme;
use crate::ui::widgets::{HelpBar, KeyHint};
use crate::ui::{Flow, Screen};
use crate::workflow::ExitStatus;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::time::Instant;
use throbber_widgets_tui::{Throbber, ThrobberState};

const LOADING_HINTS: &[KeyHint] = &[KeyHint::new("q/Esc", "cancel")];
const NO_RESULTS_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter,/", "new search"),
    KeyHint::new("q/Esc", "quit"),
];
const FAILED_HINTS: &[KeyHint] = &[
    KeyHint::new("r", "retry"),
    KeyHint::new("/", "new search"),
    KeyHint::new("q/Esc", "quit"),
];
const FATAL_HINTS: &[KeyHint] = &[
    KeyHint::new("/", "new search"),
    KeyHint::new("q/Esc", "quit"),
];

/// Where the search currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    /// Request in flight
    Loading,
    /// Results arrived; the screen is exiting
    Done,
    /// The service answered but nothing usable came back
    NoResults {
        /// Shown to the user
        reason: String,
    },
    /// The request itself failed
    Failed {
        /// Shown to the user
        message: String,
        /// Whether running the same request again could succeed
        retryable: bool,
    },
}

/// How the search screen ended
#[derive(Debug)]
pub enum SearchExit {
    /// A non-empty result set, ready to browse
    Results(ResultSet),
    /// Back to query entry
    NewSearch,
    /// Run the same query again
    Retry,
    /// Leave the program
    Quit(ExitStatus),
}

/// Waits on one [`SearchTask`]
pub struct SearchScreen {
    query: SearchQuery,
    phase: SearchPhase,
    task: Option<SearchTask>,
    throbber: ThrobberState,
    started: Instant,
}

impl SearchScreen {
    /// Start waiting on an already spawned task
    #[must_use]
    pub fn new(query: SearchQuery, task: SearchTask) -> Self {
        Self {
            query,
            phase: SearchPhase::Loading,
            task: Some(task),
            throbber: ThrobberState::default(),
            started: Instant::now(),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Apply the outcome of the background request
    pub fn on_completed(&mut self, outcome: Result<ResultSet, SearchError>) -> Flow<SearchExit> {
        self.task = None;
        let elapsed_ms = self.started.elapsed().as_millis();

        match outcome {
            Ok(results) if !results.is_empty() => {
                tracing::info!(
                    count = results.len(),
                    skipped = results.skipped(),
                    elapsed_ms,
                    "search completed"
                );
                self.phase = SearchPhase::Done;
                Flow::Exit(SearchExit::Results(results))
            }
            Ok(results) => {
                tracing::info!(
                    skipped = results.skipped(),
                    elapsed_ms,
                    "search returned no results"
                );
                let mut reason = format!("No results for \"{}\"", self.query);
                if results.skipped() > 0 {
                    reason.push_str(&format!(
                        " ({} unusable records skipped)",
                        results.skipped()
                    ));
                }
                self.phase = SearchPhase::NoResults { reason };
                Flow::Continue
            }
            Err(SearchError::Cancelled) => Flow::Exit(SearchExit::Quit(ExitStatus::Cancelled)),
            Err(err @ SearchError::Decode(_)) => {
                tracing::warn!(error = %err, "search response could not be decoded");
                self.phase = SearchPhase::NoResults {
                    reason: err.to_string(),
                };
                Flow::Continue
            }
            Err(err) => {
                let retryable = err.is_retryable();
                tracing::error!(error = %err, retryable, "search failed");
                self.phase = SearchPhase::Failed {
                    message: err.to_string(),
                    retryable,
                };
                Flow::Continue
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }

    fn status_line(&self, theme: &Theme) -> Line<'_> {
        match &self.phase {
            SearchPhase::Loading | SearchPhase::Done => {
                let throbber = Throbber::default()
                    .style(theme.info_style())
                    .throbber_style(theme.cursor_style());
                let spinner = throbber.to_symbol_span(&self.throbber);
                Line::from(vec![
                    spinner,
                    Span::styled(
                        format!(
                            "Searching for \"{}\"... {}s",
                            self.query,
                            self.started.elapsed().as_secs()
                        ),
                        theme.info_style(),
                    ),
                ])
            }
            SearchPhase::NoResults { reason } => {
                Line::styled(format!("⚠ {reason}"), theme.warning_style())
            }
            SearchPhase::Failed { message, .. } => {
                Line::styled(format!("✗ {message}"), theme.error_style())
            }
        }
    }

    fn hints(&self) -> &'static [KeyHint] {
        match self.phase {
            SearchPhase::Loading | SearchPhase::Done => LOADING_HINTS,
            SearchPhase::NoResults { .. } => NO_RESULTS_HINTS,
            SearchPhase::Failed { retryable: true, .. } => FAILED_HINTS,
            SearchPhase::Failed { .. } => FATAL_HINTS,
        }
    }
}

impl Screen for SearchScreen {
    type Output = SearchExit;

    fn render(&mut self, frame: &mut Frame<'_>, theme: &Theme) {
        let [body, help] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" privateer ");
        frame.render_widget(
            Paragraph::new(self.status_line(theme))
                .block(block)
                .wrap(Wrap { trim: true }),
            body,
        );
        frame.render_widget(HelpBar::new(self.hints(), theme), help);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow<SearchExit> {
        match self.phase {
            SearchPhase::Loading => {
                if is_quit(&key) {
                    tracing::info!("cancelling search");
                    self.cancel();
                    return Flow::Exit(SearchExit::Quit(ExitStatus::Cancelled));
                }
            }
            SearchPhase::NoResults { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('/') => return Flow::Exit(SearchExit::NewSearch),
                _ if is_quit(&key) => return Flow::Exit(SearchExit::Quit(ExitStatus::Completed)),
                _ => {}
            },
            SearchPhase::Failed { retryable, .. } => match key.code {
                KeyCode::Char('r') if retryable => return Flow::Exit(SearchExit::Retry),
                KeyCode::Char('/') => return Flow::Exit(SearchExit::NewSearch),
                _ if is_quit(&key) => return Flow::Exit(SearchExit::Quit(ExitStatus::Failed)),
                _ => {}
            },
            SearchPhase::Done => {}
        }
        Flow::Continue
    }

    fn on_tick(&mut self) -> Flow<SearchExit> {
        if self.phase != SearchPhase::Loading {
            return Flow::Continue;
        }

        self.throbber.calc_next();
        match self.task.as_mut().and_then(SearchTask::poll) {
            Some(outcome) => self.on_completed(outcome),
            None => Flow::Continue,
        }
    }
}
