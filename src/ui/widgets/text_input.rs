//! Single-line text input with cursor and placeholder
//!
//! Provides:
//! - Character-indexed cursor over a UTF-8 buffer
//! - A hard character limit
//! - Readline-style editing (Ctrl+A/E/U/W)

use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// State for a text input field
#[derive(Debug, Clone)]
pub struct TextInputState {
    /// Current input buffer
    pub buffer: String,
    /// Cursor position (character index, not byte)
    pub cursor: usize,
    /// Shown dimmed while the buffer is empty
    pub placeholder: String,
    /// Maximum number of characters accepted
    pub char_limit: usize,
}

impl TextInputState {
    /// Create an empty input
    #[must_use]
    pub fn new(placeholder: impl Into<String>, char_limit: usize) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            char_limit,
        }
    }

    /// Get byte index from cursor (character) position
    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Current contents
    #[must_use]
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Insert a character at cursor position, unless the limit is reached
    pub fn insert_char(&mut self, c: char) {
        if self.char_count() >= self.char_limit {
            return;
        }
        let byte_idx = self.byte_index();
        self.buffer.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_idx = self.byte_index();
            let prev_byte_idx = self.buffer[..byte_idx]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            self.buffer.remove(prev_byte_idx);
            self.cursor -= 1;
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete(&mut self) {
        let byte_idx = self.byte_index();
        if byte_idx < self.buffer.len() {
            self.buffer.remove(byte_idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clear the input (Ctrl+U)
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Clear word backwards (Ctrl+W)
    pub fn delete_word_backwards(&mut self) {
        let byte_idx = self.byte_index();
        let before = &self.buffer[..byte_idx];

        let trimmed = before.trim_end();
        let new_end = trimmed
            .rfind(char::is_whitespace)
            .map_or(0, |last_space| last_space + 1);

        self.buffer.drain(new_end..byte_idx);
        self.cursor = self.buffer[..new_end].chars().count();
    }

    /// Apply an editing key
    ///
    /// Returns `false` when the key is not an editing key, so the caller
    /// can handle it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.cursor_home(),
            KeyCode::Char('e') if ctrl => self.cursor_end(),
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('w') if ctrl => self.delete_word_backwards(),
            KeyCode::Char(_) if ctrl => return false,
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor_home(),
            KeyCode::End => self.cursor_end(),
            _ => return false,
        }
        true
    }

    /// The slice of the buffer that fits `width` columns, and the cursor's
    /// offset within it
    fn visible_window(&self, width: usize) -> (String, usize) {
        let total_chars = self.char_count();
        if total_chars < width {
            return (self.buffer.clone(), self.cursor);
        }

        // Keep one column free for the cursor block past the end.
        let width = width.saturating_sub(1).max(1);
        let start_char = if self.cursor < width {
            0
        } else {
            self.cursor + 1 - width
        };
        let visible = self.buffer.chars().skip(start_char).take(width).collect();
        (visible, self.cursor - start_char)
    }
}

/// Renders a [`TextInputState`] on one line
pub struct TextInput<'a> {
    state: &'a TextInputState,
    theme: &'a Theme,
}

impl<'a> TextInput<'a> {
    #[must_use]
    pub const fn new(state: &'a TextInputState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn cursor_style(&self) -> Style {
        Style::default()
            .bg(self.theme.cursor)
            .fg(Color::Black)
            .add_modifier(Modifier::SLOW_BLINK)
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let prompt = Span::styled("> ", self.theme.cursor_style());

        if self.state.buffer.is_empty() {
            let line = Line::from(vec![
                prompt,
                Span::styled(" ", self.cursor_style()),
                Span::styled(self.state.placeholder.as_str(), self.theme.dimmed_style()),
            ]);
            Paragraph::new(line).render(area, buf);
            return;
        }

        let width = (area.width as usize).saturating_sub(2);
        let (visible_text, cursor_offset) = self.state.visible_window(width);

        let before_cursor: String = visible_text.chars().take(cursor_offset).collect();
        let cursor_char: String = visible_text.chars().skip(cursor_offset).take(1).collect();
        let after_cursor: String = visible_text.chars().skip(cursor_offset + 1).collect();
        let cursor_display = if cursor_char.is_empty() {
            " ".to_string()
        } else {
            cursor_char
        };

        let line = Line::from(vec![
            prompt,
            Span::raw(before_cursor),
            Span::styled(cursor_display, self.cursor_style()),
            Span::raw(after_cursor),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInputState {
        let mut state = TextInputState::new("Search...", 156);
        text.chars().for_each(|c| state.insert_char(c));
        state
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_basic_input() {
        let state = typed("hello");
        assert_eq!(state.buffer, "hello");
        assert_eq!(state.cursor, 5);
    }

    #[test]
    fn test_cursor_movement() {
        let mut state = typed("hello");

        state.cursor_left();
        assert_eq!(state.cursor, 4);

        state.cursor_home();
        assert_eq!(state.cursor, 0);
        state.cursor_left();
        assert_eq!(state.cursor, 0);

        state.cursor_end();
        assert_eq!(state.cursor, 5);

        state.cursor_right();
        assert_eq!(state.cursor, 5); // Should not go past end
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut state = typed("hello");

        state.backspace();
        assert_eq!(state.buffer, "hell");
        assert_eq!(state.cursor, 4);

        state.cursor_home();
        state.backspace();
        assert_eq!(state.buffer, "hell"); // Nothing happens at position 0

        state.delete();
        assert_eq!(state.buffer, "ell");
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = typed("café");
        state.cursor_left();
        state.insert_char('x');
        assert_eq!(state.buffer, "cafxé");
        state.cursor_end();
        state.backspace();
        assert_eq!(state.buffer, "cafx");
    }

    #[test]
    fn test_char_limit() {
        let mut state = TextInputState::new("", 3);
        "abcdef".chars().for_each(|c| state.insert_char(c));
        assert_eq!(state.buffer, "abc");
        assert_eq!(state.cursor, 3);
    }

    #[test]
    fn test_delete_word_backwards() {
        let mut state = typed("hello world");

        state.delete_word_backwards();
        assert_eq!(state.buffer, "hello ");
        assert_eq!(state.cursor, 6);

        state.delete_word_backwards();
        assert_eq!(state.buffer, "");
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_handle_key_readline_bindings() {
        let mut state = typed("demon slayer");

        assert!(state.handle_key(&key(KeyCode::Char('a'), KeyModifiers::CONTROL)));
        assert_eq!(state.cursor, 0);
        assert!(state.handle_key(&key(KeyCode::Char('e'), KeyModifiers::CONTROL)));
        assert_eq!(state.cursor, 12);
        assert!(state.handle_key(&key(KeyCode::Char('w'), KeyModifiers::CONTROL)));
        assert_eq!(state.buffer, "demon ");
        assert!(state.handle_key(&key(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(state.buffer, "");

        assert!(state.handle_key(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert_eq!(state.buffer, "Q");
    }

    #[test]
    fn test_handle_key_ignores_non_editing_keys() {
        let mut state = typed("x");
        assert!(!state.handle_key(&key(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(!state.handle_key(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(!state.handle_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(state.buffer, "x");
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let state = typed("abcdefghij");
        let (visible, offset) = state.visible_window(5);
        assert_eq!(visible, "hij");
        assert_eq!(offset, 3);

        let mut state = state;
        state.cursor_home();
        let (visible, offset) = state.visible_window(5);
        assert_eq!(visible, "abcd");
        assert_eq!(offset, 0);
    }
}
