//! Single-line status widget

use crate::ui::output::{MessageLevel, StatusMessage};
use crate::ui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Renders the most recent status message, or nothing
pub struct StatusLine<'a> {
    message: Option<&'a StatusMessage>,
    theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    #[must_use]
    pub const fn new(message: Option<&'a StatusMessage>, theme: &'a Theme) -> Self {
        Self { message, theme }
    }

    fn style_for_level(&self, level: MessageLevel) -> Style {
        match level {
            MessageLevel::Success => self.theme.success_style(),
            MessageLevel::Error => self.theme.error_style(),
            MessageLevel::Warning => self.theme.warning_style(),
            MessageLevel::Info => self.theme.info_style(),
        }
    }

    const fn prefix_for_level(level: MessageLevel) -> &'static str {
        match level {
            MessageLevel::Success => "✓ ",
            MessageLevel::Error => "✗ ",
            MessageLevel::Warning => "⚠ ",
            MessageLevel::Info => "ℹ ",
        }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(msg) = self.message else {
            return;
        };

        let style = self.style_for_level(msg.level);
        let line = Line::from(vec![
            Span::styled(Self::prefix_for_level(msg.level), style),
            Span::styled(msg.text.as_str(), style),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}
