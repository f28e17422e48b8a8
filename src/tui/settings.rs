//! Centralized, hardcoded UI settings for the terminal interface.
//!
//! This is the single place to tweak prompt strings, glyphs, colors, panel
//! chrome, and spinner behavior.

use crossterm::style::Color;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

pub const BLOCK_FALLBACK_COLUMNS: usize = 100;
pub const BLOCK_FALLBACK_ROWS: usize = 24;
pub const BLOCK_RIGHT_MARGIN: usize = 2;
/// Narrowest panel we still draw borders for.
pub const PANEL_MIN_WIDTH: usize = 20;
/// Smallest bordered panel: two borders and one body line.
pub const PANEL_MIN_ROWS: usize = 3;

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

pub const PROMPT_USER: &str = "💬 You: ";

// ---------------------------------------------------------------------------
// Sections / labels
// ---------------------------------------------------------------------------

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const LABEL_DEFAULT_AGENT: &str = "Agent";

pub const TITLE_PLAN_PANEL: &str = "Execution Plan";
pub const TITLE_TOOLS_PANEL: &str = "Tool Activity";
pub const TITLE_STREAM_PANEL: &str = "Streaming";
pub const TITLE_RESPONSE_SUFFIX: &str = "Response";

pub const GLYPH_ELLIPSIS: &str = "…";

pub const BORDER_TOP_LEFT: char = '╭';
pub const BORDER_TOP_RIGHT: char = '╮';
pub const BORDER_BOTTOM_LEFT: char = '╰';
pub const BORDER_BOTTOM_RIGHT: char = '╯';
pub const BORDER_HORIZONTAL: char = '─';
pub const BORDER_VERTICAL: char = '│';

// ---------------------------------------------------------------------------
// Spinner / progress
// ---------------------------------------------------------------------------

pub const PROGRESS_LABEL: &str = "⏳ Waiting for agent...";
pub const PROGRESS_CLEAR_LINE: &str = "\r\x1b[2K";
pub const PROGRESS_FRAMES: [char; 4] = ['|', '/', '-', '\\'];
pub const PROGRESS_TICK_MS: u64 = 100;
/// Upper bound on waiting for the spinner to confirm it has cleared its line.
pub const SPINNER_CLEAR_TIMEOUT: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_INFO: Color = Color::Cyan;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_PANEL_BORDER: Color = Color::DarkGreen;
pub const COLOR_LIVE_BORDER: Color = Color::DarkGrey;
pub const COLOR_PROGRESS_FRAME: Color = Color::Cyan;
pub const COLOR_PROGRESS_LABEL: Color = Color::DarkGrey;
pub const COLOR_PROGRESS_ELAPSED: Color = Color::DarkGrey;
