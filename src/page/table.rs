//! Dataframe table widget.
//!
//! Renders the query result as a bordered table with column headers,
//! auto-sized columns stretched to the container width, and styled NULL
//! values. Scroll offsets choose the first visible row and column.

use crate::warehouse::{Dataframe, Value};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Maximum natural width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Widget for rendering a dataframe as a table.
pub struct DataframeTable<'a> {
    dataframe: &'a Dataframe,
    row_offset: usize,
    col_offset: usize,
}

impl<'a> DataframeTable<'a> {
    /// Creates a table widget showing the dataframe from the top-left.
    pub fn new(dataframe: &'a Dataframe) -> Self {
        Self {
            dataframe,
            row_offset: 0,
            col_offset: 0,
        }
    }

    /// Sets the first visible row and column.
    pub fn with_offsets(mut self, row_offset: usize, col_offset: usize) -> Self {
        self.row_offset = row_offset;
        self.col_offset = col_offset;
        self
    }

    /// Calculates the natural width of each visible column.
    ///
    /// Widths are counted in characters, not bytes, so multibyte cells line
    /// up with the borders.
    fn natural_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .dataframe
            .columns
            .iter()
            .skip(self.col_offset)
            .map(|col| col.name.chars().count().max(MIN_COLUMN_WIDTH))
            .collect();

        for row in &self.dataframe.rows {
            for (i, value) in row.iter().skip(self.col_offset).enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(value.to_display_string().chars().count());
                }
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Fits the natural widths to the available width.
    ///
    /// A too-wide table is scaled down; a narrow one is stretched so the
    /// table fills the container.
    fn fit_widths(&self, available_width: usize) -> Vec<usize> {
        let mut widths = self.natural_widths();
        if widths.is_empty() || available_width == 0 {
            return widths;
        }

        // Per-column chrome: "│ " + " " per cell, plus the closing "│".
        let chrome = widths.len() * 3 + 1;
        let total: usize = widths.iter().sum::<usize>() + chrome;

        if total > available_width {
            let budget = available_width.saturating_sub(chrome);
            let content: usize = widths.iter().sum();
            let scale = budget as f64 / content.max(1) as f64;
            for width in widths.iter_mut() {
                *width = ((*width as f64 * scale) as usize).max(MIN_COLUMN_WIDTH);
            }
        } else if total < available_width {
            let spare = available_width - total;
            let per_column = spare / widths.len();
            let mut remainder = spare % widths.len();
            for width in widths.iter_mut() {
                *width += per_column;
                if remainder > 0 {
                    *width += 1;
                    remainder -= 1;
                }
            }
        }

        widths
    }

    /// Truncates a string to fit within the given width, with an ellipsis.
    ///
    /// Cuts on character boundaries so multibyte content never splits a
    /// code point.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let kept: String = s.chars().take(max_width - 3).collect();
            format!("{kept}...")
        }
    }

    /// Renders the table to lines, for the widget and for plain output.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.dataframe.columns.is_empty() {
            lines.push(Line::from(Span::styled(
                "(empty result)",
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let widths = self.fit_widths(available_width);

        lines.push(self.render_border(&widths, '┌', '┬', '┐'));
        lines.push(self.render_header_row(&widths));
        lines.push(self.render_border(&widths, '├', '┼', '┤'));

        for row in self.dataframe.rows.iter().skip(self.row_offset) {
            lines.push(self.render_data_row(row, &widths));
        }

        lines.push(self.render_border(&widths, '└', '┴', '┘'));

        let footer = format!(
            "{} row{} ({}ms)",
            self.dataframe.row_count,
            if self.dataframe.row_count == 1 { "" } else { "s" },
            self.dataframe.execution_time.as_millis()
        );
        lines.push(Line::from(Span::styled(
            footer,
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    /// Renders a horizontal border line.
    fn render_border(&self, widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
        let mut border = String::new();
        border.push(left);

        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                border.push(mid);
            }
        }

        border.push(right);

        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    /// Renders the header row with column names.
    fn render_header_row(&self, widths: &[usize]) -> Line<'static> {
        let mut spans = Vec::new();
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));

        for (i, col) in self
            .dataframe
            .columns
            .iter()
            .skip(self.col_offset)
            .enumerate()
        {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let name = Self::truncate(&col.name, width);
            let padded = format!(" {name:width$} ");

            spans.push(Span::styled(
                padded,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }

    /// Renders a data row.
    fn render_data_row(&self, row: &[Value], widths: &[usize]) -> Line<'static> {
        let mut spans = Vec::new();
        spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));

        for (i, value) in row.iter().skip(self.col_offset).enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let truncated = Self::truncate(&value.to_display_string(), width);
            let padded = format!(" {truncated:width$} ");

            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(padded, style));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }
}

impl Widget for DataframeTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize);

        for (i, line) in lines.iter().enumerate() {
            if i >= area.height as usize {
                break;
            }
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}
