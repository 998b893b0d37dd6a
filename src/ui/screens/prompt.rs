//! Single-field prompt used for the API key and the search query

use crate::ui::events::is_interrupt;
use crate::ui::output::{MessageLevel, STATUS_TTL, StatusMessage};
use crate::ui::theme::Theme;
use crate::ui::widgets::{HelpBar, KeyHint, StatusLine, TextInput, TextInputState};
use crate::ui::{Flow, Screen};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

/// Longest query the field accepts
pub const QUERY_CHAR_LIMIT: usize = 156;

const API_KEY_CHAR_LIMIT: usize = 256;

const HINTS: &[KeyHint] = &[KeyHint::new("Enter", "submit"), KeyHint::new("Esc", "cancel")];

/// How a prompt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Enter was pressed; the raw buffer
    Submitted(String),
    /// Esc or Ctrl+C
    Cancelled,
}

/// A heading, one text field and a status line
#[derive(Debug)]
pub struct PromptScreen {
    heading: &'static str,
    input: TextInputState,
    allow_empty: bool,
    status: Option<StatusMessage>,
}

impl PromptScreen {
    /// Query entry; `notice` is shown in the status line (e.g. after an
    /// empty submission)
    #[must_use]
    pub fn query(notice: Option<String>) -> Self {
        Self {
            heading: "What to privateer today?",
            input: TextInputState::new("Search...", QUERY_CHAR_LIMIT),
            allow_empty: true,
            status: notice.map(|text| StatusMessage::new(MessageLevel::Warning, text)),
        }
    }

    /// First-run API key capture
    #[must_use]
    pub fn api_key() -> Self {
        Self {
            heading: "Jackett API key (stored for next time)",
            input: TextInputState::new("Enter Jackett Api key...", API_KEY_CHAR_LIMIT),
            allow_empty: false,
            status: None,
        }
    }

    /// Current buffer contents
    #[must_use]
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// The message currently in the status line
    #[must_use]
    pub const fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    fn submit(&mut self) -> Flow<PromptOutcome> {
        if !self.allow_empty && self.input.value().trim().is_empty() {
            self.status = Some(StatusMessage::new(
                MessageLevel::Warning,
                "A value is required",
            ));
            return Flow::Continue;
        }
        Flow::Exit(PromptOutcome::Submitted(self.input.value().to_string()))
    }

    fn centered(area: Rect) -> Rect {
        let width = 64.min(area.width);
        let height = 7.min(area.height);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 3;
        Rect::new(x, y, width, height)
    }
}

impl Screen for PromptScreen {
    type Output = PromptOutcome;

    fn render(&mut self, frame: &mut Frame<'_>, theme: &Theme) {
        let area = Self::centered(frame.area());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" privateer ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [heading, input, status, help] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Line::styled(self.heading, theme.header_style())),
            heading,
        );
        frame.render_widget(TextInput::new(&self.input, theme), input);
        frame.render_widget(StatusLine::new(self.status.as_ref(), theme), status);
        frame.render_widget(HelpBar::new(HINTS, theme), help);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow<PromptOutcome> {
        if is_interrupt(&key) || key.code == KeyCode::Esc {
            return Flow::Exit(PromptOutcome::Cancelled);
        }
        if key.code == KeyCode::Enter {
            return self.submit();
        }
        self.input.handle_key(&key);
        Flow::Continue
    }

    fn on_tick(&mut self) -> Flow<PromptOutcome> {
        if self.status.as_ref().is_some_and(|m| m.is_expired(STATUS_TTL)) {
            self.status = None;
        }
        Flow::Continue
    }
}
