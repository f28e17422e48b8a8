//! Terminal output renderer for panels, status lines, and the live region.

use crate::tui::dashboard::{bottom_border, panel_width, top_border};
use crate::tui::markdown::render_markdown_for_terminal;
use crate::tui::settings;
use crossterm::cursor::MoveToPreviousLine;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

/// Stateful terminal renderer.
///
/// The only state is the number of rows the live region currently occupies,
/// so the next redraw can move back over them.
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
    /// Rows drawn by the last live-region update.
    live_rows: Mutex<usize>,
}

impl Renderer {
    /// Create a renderer with optional color output.
    pub fn new(color: bool) -> Self {
        Self {
            color,
            live_rows: Mutex::new(0),
        }
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Terminal size as `(columns, rows)`, with a fallback when unknown.
    pub fn size(&self) -> (usize, usize) {
        terminal::size()
            .ok()
            .filter(|(w, h)| *w > 0 && *h > 0)
            .map(|(w, h)| (w as usize, h as usize))
            .unwrap_or((settings::BLOCK_FALLBACK_COLUMNS, settings::BLOCK_FALLBACK_ROWS))
    }

    /// Draw one spinner frame in place (stderr, terminals only).
    pub fn spinner_frame(&self, line: &str) {
        let mut stderr = io::stderr();
        if !stderr.is_terminal() {
            return;
        }
        let _ = write!(stderr, "{line}");
        let _ = stderr.flush();
    }

    /// Erase the spinner line.
    pub fn clear_spinner(&self) {
        let mut stderr = io::stderr();
        if !stderr.is_terminal() {
            return;
        }
        let _ = write!(stderr, "{}", settings::PROGRESS_CLEAR_LINE);
        let _ = stderr.flush();
    }

    /// Replace the live region with `rows`.
    pub fn draw_live(&self, rows: &[String]) {
        let mut live_rows = self
            .live_rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut stdout = io::stdout();
        if self.redraw_live(&mut stdout, *live_rows, rows).is_ok() {
            *live_rows = rows.len();
        }
    }

    /// Erase the live region and forget its height.
    pub fn clear_live(&self) {
        let mut live_rows = self
            .live_rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *live_rows == 0 {
            return;
        }
        let mut stdout = io::stdout();
        let _ = self.redraw_live(&mut stdout, *live_rows, &[]);
        *live_rows = 0;
    }

    /// Print a bordered panel whose body is rendered markdown.
    pub fn panel(&self, title: &str, markdown: &str) {
        let (columns, _) = self.size();
        let width = panel_width(columns);
        let body = render_markdown_for_terminal(markdown, width.saturating_sub(4), self.color);
        let mut stdout = io::stdout();
        if self.write_panel(&mut stdout, title, &body, width).is_err() {
            println!("{title}");
            println!("{body}");
        }
    }

    /// Print an informational line (to stderr).
    pub fn info(&self, text: &str) {
        if self.color {
            eprintln!("\r{}", text.with(settings::COLOR_INFO));
        } else {
            eprintln!("\r{text}");
        }
    }

    /// Print a warning (to stderr).
    pub fn warn(&self, msg: &str) {
        if self.color {
            eprintln!(
                "\r{} {msg}",
                settings::LABEL_WARNING.with(settings::COLOR_WARNING).bold()
            );
        } else {
            eprintln!("\r{} {msg}", settings::LABEL_WARNING);
        }
    }

    /// Print an error (to stderr).
    pub fn error(&self, msg: &str) {
        if self.color {
            eprintln!(
                "\r{} {msg}",
                settings::LABEL_ERROR.with(settings::COLOR_ERROR).bold()
            );
        } else {
            eprintln!("\r{} {msg}", settings::LABEL_ERROR);
        }
    }

    /// Clear the whole screen and home the cursor.
    pub fn clear_screen(&self) {
        let mut stdout = io::stdout();
        let _ = stdout
            .queue(Clear(ClearType::All))
            .and_then(|out| out.queue(crossterm::cursor::MoveTo(0, 0)))
            .and_then(|out| out.flush());
    }

    fn redraw_live<W: Write + QueueableCommand>(
        &self,
        out: &mut W,
        previous: usize,
        rows: &[String],
    ) -> io::Result<()> {
        if previous > 0 {
            out.queue(MoveToPreviousLine(previous.min(u16::MAX as usize) as u16))?;
        }
        out.queue(Print("\r"))?;
        out.queue(Clear(ClearType::FromCursorDown))?;
        for row in rows {
            if self.color {
                out.queue(PrintStyledContent(
                    row.as_str().with(settings::COLOR_LIVE_BORDER),
                ))?;
            } else {
                out.queue(Print(row))?;
            }
            out.queue(Print("\r\n"))?;
        }
        out.flush()
    }

    fn write_panel<W: Write + QueueableCommand>(
        &self,
        out: &mut W,
        title: &str,
        body: &str,
        width: usize,
    ) -> io::Result<()> {
        self.queue_chrome(out, &top_border(title, width))?;
        out.queue(Print("\r\n"))?;
        for line in body.lines() {
            self.queue_chrome(out, &format!("{} ", settings::BORDER_VERTICAL))?;
            out.queue(Print(line))?;
            out.queue(Print("\r\n"))?;
        }
        self.queue_chrome(out, &bottom_border(width))?;
        out.queue(Print("\r\n"))?;
        out.flush()
    }

    fn queue_chrome<W: Write + QueueableCommand>(&self, out: &mut W, text: &str) -> io::Result<()> {
        if self.color {
            out.queue(PrintStyledContent(text.with(chrome_color()).bold()))?;
        } else {
            out.queue(Print(text))?;
        }
        Ok(())
    }
}

fn chrome_color() -> Color {
    settings::COLOR_PANEL_BORDER
}
