//! Page state.
//!
//! The page shows one dataframe; the only mutable state is whether it is
//! still open and where the viewport is scrolled to.

use crate::warehouse::Dataframe;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// State of the single rendered page.
pub struct PageState {
    /// The query result on display.
    pub dataframe: Dataframe,
    /// Connection description for the status line.
    pub connection_info: String,
    /// Whether the page is still open.
    pub running: bool,
    /// First visible row.
    pub row_offset: usize,
    /// First visible column.
    pub col_offset: usize,
    /// Rows that fit in the table viewport, updated on every draw.
    pub viewport_rows: usize,
}

impl PageState {
    /// Creates the page state for a fetched dataframe.
    pub fn new(dataframe: Dataframe, connection_info: String) -> Self {
        Self {
            dataframe,
            connection_info,
            running: true,
            row_offset: 0,
            col_offset: 0,
            viewport_rows: 0,
        }
    }

    /// Applies one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Right | KeyCode::Char('l') => self.scroll_right(),
            KeyCode::Left | KeyCode::Char('h') => self.scroll_left(),
            KeyCode::PageDown => self.scroll_down(self.viewport_rows.max(1)),
            KeyCode::PageUp => self.scroll_up(self.viewport_rows.max(1)),
            KeyCode::Home => self.row_offset = 0,
            KeyCode::End => self.row_offset = self.max_row_offset(),
            _ => {}
        }
    }

    fn scroll_down(&mut self, lines: usize) {
        self.row_offset = (self.row_offset + lines).min(self.max_row_offset());
    }

    fn scroll_up(&mut self, lines: usize) {
        self.row_offset = self.row_offset.saturating_sub(lines);
    }

    fn scroll_right(&mut self) {
        self.col_offset = (self.col_offset + 1).min(self.max_col_offset());
    }

    fn scroll_left(&mut self) {
        self.col_offset = self.col_offset.saturating_sub(1);
    }

    /// Largest row offset that still shows a full viewport where possible.
    fn max_row_offset(&self) -> usize {
        self.dataframe
            .row_count
            .saturating_sub(self.viewport_rows.max(1))
    }

    fn max_col_offset(&self) -> usize {
        self.dataframe.column_count().saturating_sub(1)
    }
}
