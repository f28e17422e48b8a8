//! One-line summaries for tool-call notifications.

use crate::textutil::truncate_with_suffix_by_chars;

/// Maximum visible characters of one tool-activity line.
pub const MAX_SUMMARY_CHARS: usize = 160;

/// Tool output dumps start at this marker and never reach the activity log.
const RESPONSE_MARKER: &str = "response=";

/// Collapse a verbose tool notification into one bounded line.
pub fn summarize(raw: &str) -> String {
    let head = raw.split(RESPONSE_MARKER).next().unwrap_or_default();
    let Some(line) = head.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return String::new();
    };
    truncate_with_suffix_by_chars(line, MAX_SUMMARY_CHARS, "…")
}
