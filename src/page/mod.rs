//! The single rendered page.
//!
//! Owns terminal setup and teardown plus the draw/poll loop. `--plain`
//! renders the same content once as text instead of opening the terminal UI.

pub mod app;
mod events;
mod table;
pub mod ui;

pub use app::PageState;
pub use table::DataframeTable;

use crate::error::{Result, SnowletError};
use crate::warehouse::TABLES_QUERY;
use crossterm::{
    event::KeyEventKind,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use events::{Event, EventHandler};
use ratatui::{backend::CrosstermBackend, text::Line, Terminal};
use std::io::{self, Stdout};
use std::panic;

/// Title shown on the first line of the page.
pub const PAGE_TITLE: &str = "Hello Snowflake - Snowlet Edition";

/// Caption shown above the table.
pub const PAGE_CAPTION: &str =
    "The following data is the live table catalog of the connected account, \
     fetched with this statement:";

/// The interactive page runner.
pub struct Page {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Page {
    /// Initializes the terminal and installs a restoring panic hook.
    pub fn new() -> Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(info);
        }));

        Ok(Self {
            terminal: Self::setup_terminal()?,
            event_handler: EventHandler::new(),
        })
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| SnowletError::render(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| SnowletError::render(format!("Failed to enter alternate screen: {e}")))?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| SnowletError::render(format!("Failed to create terminal: {e}")))
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| SnowletError::render(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| SnowletError::render(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| SnowletError::render(format!("Failed to show cursor: {e}")))
    }

    /// Runs the page until the user closes it, then restores the terminal.
    pub fn run(&mut self, state: &mut PageState) -> Result<()> {
        let result = self.event_loop(state);
        let restored = self.restore_terminal();
        result.and(restored)
    }

    fn event_loop(&mut self, state: &mut PageState) -> Result<()> {
        while state.running {
            self.terminal
                .draw(|frame| ui::render(frame, state))
                .map_err(|e| SnowletError::render(format!("Failed to draw page: {e}")))?;

            match self.event_handler.next()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => state.handle_key(key),
                // Resizes take effect on the next draw.
                Event::Key(_) | Event::Resize(_, _) | Event::Tick => {}
            }
        }
        Ok(())
    }
}

/// Renders the page once as plain text for `--plain` mode.
pub fn render_plain(state: &PageState, width: usize) -> String {
    let mut out = String::new();
    out.push_str(PAGE_TITLE);
    out.push('\n');
    out.push_str(PAGE_CAPTION);
    out.push('\n');
    out.push_str(TABLES_QUERY);
    out.push_str("\n\n");

    for line in DataframeTable::new(&state.dataframe).render_to_lines(width) {
        out.push_str(&line_text(&line));
        out.push('\n');
    }

    out
}

fn line_text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
