//! Line input for the chat prompt and follow-up forms.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

/// Outcome of one prompt read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Ctrl-D, closed stdin, or an unusable terminal.
    Eof,
}

/// Source of user input lines.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome;

    /// Record a submitted line for in-session recall.
    fn add_history(&mut self, _entry: &str) {}
}

/// Line editor backed by `rustyline`.
pub struct RustylineReader {
    editor: DefaultEditor,
}

impl RustylineReader {
    /// Create an editor seeded with previously persisted entries.
    pub fn new(seed: &[String]) -> Result<Self, ReadlineError> {
        let mut editor = DefaultEditor::new()?;
        for entry in seed {
            let _ = editor.add_history_entry(entry.as_str());
        }
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        match self.editor.readline(prompt) {
            Ok(line) => ReadOutcome::Line(line),
            Err(ReadlineError::Interrupted) => ReadOutcome::Interrupted,
            Err(ReadlineError::Eof) => ReadOutcome::Eof,
            Err(err) => {
                warn!("line editor failed: {err}");
                ReadOutcome::Eof
            }
        }
    }

    fn add_history(&mut self, entry: &str) {
        let _ = self.editor.add_history_entry(entry);
    }
}
