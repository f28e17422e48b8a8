//! Live-region layout.
//!
//! Pure functions that turn the current panel contents into terminal rows.
//! Nothing here writes to the terminal; the renderer draws the rows as-is.

use crate::tui::settings;
use crate::tui::text::{keep_tail, pad_to_width, visible_width, wrap_text};

/// Rows for the multi-panel dashboard.
///
/// Panels appear only when non-empty, in order: execution plan, tool
/// activity, streaming text. The whole dashboard fits in `rows - 1` terminal
/// rows so the renderer can always move back to its top. Plan and tool panels
/// get an equal share of that height; the streaming panel gets what remains.
/// Every clipped panel keeps its newest lines behind an ellipsis row, and a
/// panel with no room for at least one body line is left out.
pub fn compose_dashboard(
    plan: &str,
    tools: &[&str],
    streaming: &str,
    columns: usize,
    rows: usize,
) -> Vec<String> {
    let width = panel_width(columns);
    let inner = width.saturating_sub(4);
    let available = rows.saturating_sub(1);

    let plan = plan.trim();
    let streaming = streaming.trim();
    let panels = [!plan.is_empty(), !tools.is_empty(), !streaming.is_empty()]
        .iter()
        .filter(|shown| **shown)
        .count();
    let share = available / panels.max(1);
    let mut out = Vec::new();

    if !plan.is_empty() {
        out.extend(clipped_box(
            settings::TITLE_PLAN_PANEL,
            wrap_text(plan, inner),
            width,
            share,
        ));
    }
    if !tools.is_empty() {
        let body = tools
            .iter()
            .flat_map(|line| wrap_text(line, inner))
            .collect::<Vec<_>>();
        out.extend(clipped_box(settings::TITLE_TOOLS_PANEL, body, width, share));
    }
    if !streaming.is_empty() {
        let remaining = available.saturating_sub(out.len());
        out.extend(clipped_box(
            settings::TITLE_STREAM_PANEL,
            wrap_text(streaming, inner),
            width,
            remaining,
        ));
    }
    out
}

/// Rows for plain streaming: wrapped text without chrome, newest lines kept.
pub fn compose_plain(streaming: &str, columns: usize, rows: usize) -> Vec<String> {
    let width = columns
        .saturating_sub(settings::BLOCK_RIGHT_MARGIN)
        .max(1);
    keep_tail(
        wrap_text(streaming.trim(), width),
        rows.saturating_sub(1).max(1),
        settings::GLYPH_ELLIPSIS,
    )
}

/// Total panel width for a terminal with `columns` cells.
pub fn panel_width(columns: usize) -> usize {
    columns
        .saturating_sub(settings::BLOCK_RIGHT_MARGIN)
        .max(settings::PANEL_MIN_WIDTH)
}

/// Title row of a bordered box.
pub fn top_border(title: &str, width: usize) -> String {
    let label = format!("{}{} {title} ", settings::BORDER_TOP_LEFT, settings::BORDER_HORIZONTAL);
    let fill = width.saturating_sub(visible_width(&label) + 1);
    format!(
        "{label}{}{}",
        settings::BORDER_HORIZONTAL.to_string().repeat(fill),
        settings::BORDER_TOP_RIGHT
    )
}

/// Closing row of a bordered box.
pub fn bottom_border(width: usize) -> String {
    format!(
        "{}{}{}",
        settings::BORDER_BOTTOM_LEFT,
        settings::BORDER_HORIZONTAL
            .to_string()
            .repeat(width.saturating_sub(2)),
        settings::BORDER_BOTTOM_RIGHT
    )
}

fn clipped_box(title: &str, body: Vec<String>, width: usize, max_rows: usize) -> Vec<String> {
    if max_rows < settings::PANEL_MIN_ROWS {
        return Vec::new();
    }
    let body = keep_tail(body, max_rows - 2, settings::GLYPH_ELLIPSIS);
    boxed(title, body, width)
}

fn boxed(title: &str, body: Vec<String>, width: usize) -> Vec<String> {
    let inner = width.saturating_sub(4);
    let mut rows = Vec::with_capacity(body.len() + 2);
    rows.push(top_border(title, width));
    for line in body {
        rows.push(format!(
            "{v} {} {v}",
            pad_to_width(&line, inner),
            v = settings::BORDER_VERTICAL
        ));
    }
    rows.push(bottom_border(width));
    rows
}
