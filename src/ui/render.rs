//! Rendering contract and default terminal renderer binding.
//!
//! `DisplaySurface` is the UI contract consumed by the display orchestrator.
//! `Renderer` is the default terminal implementation; tests substitute a
//! recording surface without touching stdout.

pub use crate::tui::renderer::Renderer;

/// Injectable drawing primitives used by the display orchestrator.
pub trait DisplaySurface: Send + Sync {
    /// Draw one spinner frame in place on the spinner line.
    fn spinner_frame(&self, line: &str);
    /// Erase the spinner line.
    fn clear_spinner(&self);
    /// Replace the live region with these pre-laid-out rows.
    fn draw_live(&self, rows: &[String]);
    /// Erase the live region.
    fn clear_live(&self);
    /// Render one bordered panel with a markdown body.
    fn panel(&self, title: &str, markdown: &str);
    /// Render an informational line.
    fn info(&self, text: &str);
    /// Render a warning line.
    fn warn(&self, msg: &str);
    /// Render an error line.
    fn error(&self, msg: &str);
    /// Clear the whole screen.
    fn clear_screen(&self);
    /// Terminal size as `(columns, rows)`.
    fn size(&self) -> (usize, usize);
    /// Whether ANSI styling is enabled.
    fn color(&self) -> bool;
}

impl DisplaySurface for Renderer {
    fn spinner_frame(&self, line: &str) {
        self.spinner_frame(line);
    }

    fn clear_spinner(&self) {
        self.clear_spinner();
    }

    fn draw_live(&self, rows: &[String]) {
        self.draw_live(rows);
    }

    fn clear_live(&self) {
        self.clear_live();
    }

    fn panel(&self, title: &str, markdown: &str) {
        self.panel(title, markdown);
    }

    fn info(&self, text: &str) {
        self.info(text);
    }

    fn warn(&self, msg: &str) {
        self.warn(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }

    fn clear_screen(&self) {
        self.clear_screen();
    }

    fn size(&self) -> (usize, usize) {
        self.size()
    }

    fn color(&self) -> bool {
        self.color_enabled()
    }
}
