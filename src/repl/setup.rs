//! Interactive prompts for connection parameters missing from flags, env and
//! config.

use super::reader::{LineReader, ReadOutcome};
use crate::error::ChatError;
use crate::ui::render::DisplaySurface;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;

/// Parse a TCP port, rejecting 0 and out-of-range values.
pub fn parse_port(raw: &str) -> Result<u16, String> {
    let raw = raw.trim();
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(format!(
            "Invalid port `{raw}`: enter a number between 1 and 65535."
        )),
    }
}

fn read(reader: &mut dyn LineReader, prompt: &str) -> Result<String, ChatError> {
    match reader.read_line(prompt) {
        ReadOutcome::Line(line) => Ok(line.trim().to_string()),
        ReadOutcome::Interrupted | ReadOutcome::Eof => Err(ChatError::Cancelled),
    }
}

/// Ask for a value; an empty answer takes `default`.
pub fn prompt_with_default(
    reader: &mut dyn LineReader,
    label: &str,
    default: &str,
) -> Result<String, ChatError> {
    let answer = read(reader, &format!("{label} [{default}]: "))?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

/// Ask for a port until a valid one (or the default) is entered.
pub fn prompt_port(
    reader: &mut dyn LineReader,
    surface: &dyn DisplaySurface,
    default: u16,
) -> Result<u16, ChatError> {
    loop {
        let answer = read(reader, &format!("Agent port [{default}]: "))?;
        if answer.is_empty() {
            return Ok(default);
        }
        match parse_port(&answer) {
            Ok(port) => return Ok(port),
            Err(msg) => surface.warn(&msg),
        }
    }
}

/// Ask for a value that has no sensible default, re-prompting on blanks.
pub fn prompt_required(
    reader: &mut dyn LineReader,
    surface: &dyn DisplaySurface,
    label: &str,
) -> Result<String, ChatError> {
    loop {
        let answer = read(reader, &format!("{label}: "))?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        surface.warn(&format!("{label} is required."));
    }
}
