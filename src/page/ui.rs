//! Page layout and rendering.
//!
//! The page is a fixed vertical stack: title, caption with the statement,
//! the dataframe table, and a status line.

use super::app::PageState;
use super::table::DataframeTable;
use super::{PAGE_CAPTION, PAGE_TITLE};
use crate::warehouse::TABLES_QUERY;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Lines of table chrome above the first data row (borders, header, separator).
const TABLE_CHROME_ROWS: u16 = 3;

/// Renders the entire page.
///
/// Updates the state's viewport height so scrolling matches what is visible.
pub fn render(frame: &mut Frame, page: &mut PageState) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(2), // Caption + statement
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let table_area = layout[2];
    // Chrome above plus the bottom border and footer below.
    page.viewport_rows = table_area.height.saturating_sub(TABLE_CHROME_ROWS + 2) as usize;

    render_title(frame, layout[0]);
    render_caption(frame, layout[1]);
    render_table(frame, table_area, page);
    render_status(frame, layout[3], page);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        PAGE_TITLE,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);
}

fn render_caption(frame: &mut Frame, area: Rect) {
    let caption = Paragraph::new(vec![
        Line::from(PAGE_CAPTION),
        Line::from(Span::styled(
            TABLES_QUERY,
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(caption, area);
}

fn render_table(frame: &mut Frame, area: Rect, page: &PageState) {
    let table =
        DataframeTable::new(&page.dataframe).with_offsets(page.row_offset, page.col_offset);
    frame.render_widget(table, area);
}

fn render_status(frame: &mut Frame, area: Rect, page: &PageState) {
    let last_visible = (page.row_offset + page.viewport_rows).min(page.dataframe.row_count);
    let status = format!(
        " {} | {} rows x {} cols | rows {}-{} | arrows/hjkl scroll, q quit",
        page.connection_info,
        page.dataframe.row_count,
        page.dataframe.column_count(),
        if page.dataframe.row_count == 0 { 0 } else { page.row_offset + 1 },
        last_visible,
    );

    let widget = Paragraph::new(Line::from(Span::styled(
        status,
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )));
    frame.render_widget(widget, area);
}
