//! Result browser screen
//!
//! A sortable, scrollable table over one result set. Sorting is stable with
//! respect to response order: rows that compare equal always appear in the
//! order the service returned them, however often the table is re-sorted.

use crate::launch::Launcher;
use crate::search::{ResultSet, SearchQuery, TableRow};
use crate::ui::events::is_quit;
use crate::ui::output::{MessageLevel, STATUS_TTL, StatusMessage};
use crate::ui::theme::Theme;
use crate::ui::widgets::{HelpBar, KeyHint, StatusLine};
use crate::ui::{Flow, Screen};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::{Line, Text},
    widgets::{Block, Borders, Cell, Row, Table},
};
use std::cmp::Ordering;

const HINTS: &[KeyHint] = &[
    KeyHint::new("↑↓", "move"),
    KeyHint::new("Enter", "open"),
    KeyHint::new("1-6", "sort"),
    KeyHint::new("r", "reverse"),
    KeyHint::new("s", "next column"),
    KeyHint::new("/", "new search"),
    KeyHint::new("q", "quit"),
];

/// Table columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    Tracker,
    Category,
    Date,
    Size,
    Seeders,
}

impl SortColumn {
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Tracker,
        Self::Category,
        Self::Date,
        Self::Size,
        Self::Seeders,
    ];

    /// Column for a 1-based key (`'1'` is Title)
    #[must_use]
    pub fn from_key(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Tracker => "Tracker",
            Self::Category => "Category",
            Self::Date => "Date",
            Self::Size => "Size",
            Self::Seeders => "Seeders",
        }
    }

    /// The column after this one, wrapping around
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Title => Self::Tracker,
            Self::Tracker => Self::Category,
            Self::Category => Self::Date,
            Self::Date => Self::Size,
            Self::Size => Self::Seeders,
            Self::Seeders => Self::Title,
        }
    }

    /// Direction used when the column is first selected
    ///
    /// Text sorts A to Z; dates, sizes and seeders biggest first.
    #[must_use]
    pub const fn default_direction(self) -> SortDirection {
        match self {
            Self::Title | Self::Tracker | Self::Category => SortDirection::Ascending,
            Self::Date | Self::Size | Self::Seeders => SortDirection::Descending,
        }
    }

    fn compare(self, a: &TableRow, b: &TableRow) -> Ordering {
        match self {
            Self::Title => compare_text(&a.title, &b.title),
            Self::Tracker => compare_text(&a.tracker, &b.tracker),
            Self::Category => compare_text(&a.category, &b.category),
            Self::Date => a.published.cmp(&b.published).then_with(|| a.date.cmp(&b.date)),
            Self::Size => a.size_bytes.cmp(&b.size_bytes),
            Self::Seeders => a.seeders.cmp(&b.seeders),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Most seeded first
    fn default() -> Self {
        Self {
            column: SortColumn::Seeders,
            direction: SortDirection::Descending,
        }
    }
}

/// Browser state, independent of any terminal
#[derive(Debug)]
pub struct BrowserState {
    /// Rows in response order
    rows: Vec<TableRow>,
    /// Indices into `rows`, in display order
    order: Vec<usize>,
    sort: SortSpec,
    cursor: usize,
    scroll_offset: usize,
    /// Height of the visible table body (set during render)
    pub visible_height: usize,
    status: Option<StatusMessage>,
}

impl BrowserState {
    /// Build the table and apply the default sort
    #[must_use]
    pub fn new(rows: Vec<TableRow>) -> Self {
        let mut state = Self {
            order: (0..rows.len()).collect(),
            rows,
            sort: SortSpec::default(),
            cursor: 0,
            scroll_offset: 0,
            visible_height: 10,
            status: None,
        };
        state.apply_sort();
        state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        self.sort
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Rows in display order
    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.order.iter().map(|&i| &self.rows[i])
    }

    /// The highlighted row
    #[must_use]
    pub fn selected(&self) -> Option<&TableRow> {
        self.order.get(self.cursor).map(|&i| &self.rows[i])
    }

    #[must_use]
    pub const fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, level: MessageLevel, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(level, text));
    }

    /// Drop the status message once it has been visible long enough
    pub fn expire_status(&mut self) {
        if self.status.as_ref().is_some_and(|m| m.is_expired(STATUS_TTL)) {
            self.status = None;
        }
    }

    /// Sort by `column`; selecting the active column flips its direction
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = if self.sort.column == column {
            SortSpec {
                column,
                direction: self.sort.direction.reversed(),
            }
        } else {
            SortSpec {
                column,
                direction: column.default_direction(),
            }
        };
        self.apply_sort();
    }

    /// Flip the direction of the active column
    pub fn reverse(&mut self) {
        self.sort.direction = self.sort.direction.reversed();
        self.apply_sort();
    }

    /// Move the sort to the next column
    pub fn cycle_column(&mut self) {
        self.sort_by(self.sort.column.next());
    }

    fn apply_sort(&mut self) {
        let SortSpec { column, direction } = self.sort;
        let rows = &self.rows;
        self.order.sort_by(|&a, &b| {
            let ordering = column.compare(&rows[a], &rows[b]);
            let ordering = match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            // Ties fall back to response order in either direction.
            ordering.then(a.cmp(&b))
        });
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.adjust_scroll();
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.len() {
            self.cursor += 1;
            self.adjust_scroll();
        }
    }

    /// Move cursor up by one page
    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.page_size());
        self.adjust_scroll();
    }

    /// Move cursor down by one page
    pub fn page_down(&mut self) {
        let max_cursor = self.len().saturating_sub(1);
        self.cursor = (self.cursor + self.page_size()).min(max_cursor);
        self.adjust_scroll();
    }

    /// Jump to first row
    pub fn jump_to_start(&mut self) {
        self.cursor = 0;
        self.adjust_scroll();
    }

    /// Jump to last row
    pub fn jump_to_end(&mut self) {
        self.cursor = self.len().saturating_sub(1);
        self.adjust_scroll();
    }

    fn page_size(&self) -> usize {
        self.visible_height.max(1)
    }

    /// Keep the cursor inside the viewport
    pub fn adjust_scroll(&mut self) {
        let height = self.page_size();
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }
}

/// How the browser ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseExit {
    /// Back to query entry
    NewSearch,
    /// Leave the program
    Quit,
}

/// The interactive table, dispatching launches through `L`
pub struct BrowserScreen<L> {
    state: BrowserState,
    query: SearchQuery,
    launcher: L,
}

impl<L: Launcher> BrowserScreen<L> {
    #[must_use]
    pub fn new(query: SearchQuery, results: &ResultSet, launcher: L) -> Self {
        Self {
            state: BrowserState::new(results.to_rows()),
            query,
            launcher,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &BrowserState {
        &self.state
    }

    /// Open the highlighted row and report the outcome in the status line
    pub fn launch_selected(&mut self) {
        let Some(row) = self.state.selected() else {
            return;
        };
        let title = row.title.clone();
        let Some(target) = row.launch_target() else {
            self.state
                .set_status(MessageLevel::Warning, "Nothing to open for this result");
            return;
        };

        match self.launcher.launch(&target) {
            Ok(()) => {
                let text = format!("Opened {}: {title}", target.kind());
                self.state.set_status(MessageLevel::Success, text);
            }
            Err(e) => self.state.set_status(MessageLevel::Error, e.to_string()),
        }
    }

    fn header(&self, theme: &Theme) -> Row<'static> {
        let sort = self.state.sort();
        let cells = SortColumn::ALL.iter().enumerate().map(|(i, column)| {
            let mut label = format!("{} {}", i + 1, column.label());
            if *column == sort.column {
                label.push(' ');
                label.push_str(sort.direction.arrow());
            }
            if *column == SortColumn::Size {
                Cell::from(Line::from(label).right_aligned())
            } else {
                Cell::from(label)
            }
        });
        Row::new(cells).style(theme.header_style())
    }
}

impl<L: Launcher> Screen for BrowserScreen<L> {
    type Output = BrowseExit;

    fn render(&mut self, frame: &mut Frame<'_>, theme: &Theme) {
        let [table_area, status_area, help_area] = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        // Two border rows and one header row.
        self.state.visible_height = usize::from(table_area.height.saturating_sub(3));
        self.state.adjust_scroll();

        let offset = self.state.scroll_offset();
        let cursor = self.state.cursor();
        let rows: Vec<Row<'_>> = self
            .state
            .rows()
            .enumerate()
            .skip(offset)
            .take(self.state.visible_height)
            .map(|(i, row)| {
                let style = if i == cursor {
                    theme.selected_style()
                } else {
                    theme.normal_style()
                };
                Row::new(vec![
                    Cell::from(row.title.as_str()),
                    Cell::from(row.tracker.as_str()),
                    Cell::from(row.category.as_str()),
                    Cell::from(row.date.as_str()),
                    Cell::from(Text::from(row.size.as_str()).right_aligned()),
                    Cell::from(row.seeders.to_string()),
                ])
                .style(style)
            })
            .collect();

        let title = format!(
            " {} : {}/{} ",
            self.query,
            (cursor + 1).min(self.state.len()),
            self.state.len()
        );
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Length(11),
            ],
        )
        .header(self.header(theme))
        .column_spacing(1)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        );

        frame.render_widget(table, table_area);
        frame.render_widget(StatusLine::new(self.state.status(), theme), status_area);
        frame.render_widget(HelpBar::new(HINTS, theme), help_area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow<BrowseExit> {
        if is_quit(&key) {
            return Flow::Exit(BrowseExit::Quit);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.state.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => self.state.cursor_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::Home | KeyCode::Char('g') => self.state.jump_to_start(),
            KeyCode::End | KeyCode::Char('G') => self.state.jump_to_end(),
            KeyCode::Char('r') => self.state.reverse(),
            KeyCode::Char('s') => self.state.cycle_column(),
            KeyCode::Char('/') => return Flow::Exit(BrowseExit::NewSearch),
            KeyCode::Enter => self.launch_selected(),
            KeyCode::Char(c) => {
                if let Some(column) = SortColumn::from_key(c) {
                    self.state.sort_by(column);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn on_tick(&mut self) -> Flow<BrowseExit> {
        self.state.expire_status();
        Flow::Continue
    }
}
