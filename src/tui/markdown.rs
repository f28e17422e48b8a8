//! Markdown-to-terminal rendering for the final answer panel.
//!
//! `termimad` lays out lists, headings, code fences, blockquotes and tables
//! for a fixed width without needing a full TUI view.

use termimad::MadSkin;

/// Render markdown into terminal rows for a body of `width` cells.
///
/// With `color` off the output carries no ANSI styling.
pub fn render_markdown_for_terminal(input: &str, width: usize, color: bool) -> String {
    let skin = if color {
        MadSkin::default()
    } else {
        MadSkin::no_style()
    };
    let formatted = skin.text(input, Some(width.max(1))).to_string();
    formatted.trim_end_matches('\n').to_string()
}
