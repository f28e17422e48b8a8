//! Persistent command history for the chat prompt.
//!
//! History lives in a plain line-oriented file (`~/.<key>_chat_history`) so it
//! stays compatible with readline-style history files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MAX_HISTORY: usize = 1000;
/// Entries shown by the `history` command.
pub const HISTORY_DISPLAY_LIMIT: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
}

impl CommandHistory {
    /// Add a command to history, skipping blanks and consecutive repeats.
    pub fn push(&mut self, entry: &str) {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) == Some(trimmed) {
            return;
        }
        self.entries.push(trimmed.to_string());
        if self.entries.len() > MAX_HISTORY {
            let overflow = self.entries.len() - MAX_HISTORY;
            self.entries.drain(0..overflow);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The newest `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    /// Load persisted history entries from disk.
    ///
    /// A missing file is an empty history. Lines starting with `#` (readline
    /// headers) are ignored.
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut history = Self::default();
        if !path.exists() {
            return Ok(history);
        }
        let raw = fs::read_to_string(path)?;
        for line in raw.lines().filter(|line| !line.starts_with('#')) {
            history.push(line);
        }
        Ok(history)
    }

    /// Persist history entries, one per line.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut body = self.entries.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        fs::write(path, body)
    }
}

/// Per-protocol history path, `~/.<key>_chat_history`.
pub fn history_path(key: &str) -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{key}_chat_history")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn push_skips_blanks_and_repeats() {
        let mut history = CommandHistory::default();
        history.push("  ");
        history.push("list pets");
        history.push("list pets ");
        history.push("add pet");
        history.push("list pets");
        assert_eq!(history.entries(), ["list pets", "add pet", "list pets"]);
    }

    #[test]
    fn history_is_bounded() {
        let mut history = CommandHistory::default();
        for i in 0..(MAX_HISTORY + 5) {
            history.push(&format!("cmd {i}"));
        }
        assert_eq!(history.entries().len(), MAX_HISTORY);
        assert_eq!(history.entries()[0], "cmd 5");
    }

    #[test]
    fn recent_returns_newest_entries_in_order() {
        let mut history = CommandHistory::default();
        for i in 0..150 {
            history.push(&format!("cmd {i}"));
        }
        let recent = history.recent(HISTORY_DISPLAY_LIMIT);
        assert_eq!(recent.len(), 100);
        assert_eq!(recent[0], "cmd 50");
        assert_eq!(recent[99], "cmd 149");
        assert_eq!(CommandHistory::default().recent(10).len(), 0);
    }

    #[test]
    fn save_and_load_line_file() {
        let tmp = TestTempDir::new("history");
        let path = tmp.child("nested/.a2a_chat_history");
        let mut history = CommandHistory::default();
        history.push("first");
        history.push("second");
        history.save(&path).expect("save");
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        let loaded = CommandHistory::load(&path).expect("load");
        assert_eq!(loaded.entries(), ["first", "second"]);
    }

    #[test]
    fn load_ignores_readline_headers_and_missing_files() {
        let tmp = TestTempDir::new("history-header");
        let path = tmp.write_text(".slim_chat_history", "_HiStOrY_V2_\n# comment\nhello\n");
        let loaded = CommandHistory::load(&path).expect("load");
        assert_eq!(loaded.entries(), ["_HiStOrY_V2_", "hello"]);

        let missing = CommandHistory::load(&tmp.child("absent")).expect("missing file");
        assert!(missing.entries().is_empty());
    }

    #[test]
    fn history_path_uses_key() {
        if let Some(path) = history_path("a2a") {
            assert!(path.ends_with(".a2a_chat_history"));
        }
    }
}
