//! Protocol-envelope stripping for streamed text fragments.
//!
//! Agents frequently leak their own status envelopes into text parts, e.g.
//! `Hello{"status":"completed","message":"Hello"}`. These helpers recover the
//! human-readable payload without ever failing: anything that does not parse
//! is kept as plain text.

use serde_json::Value;

/// Literal that opens an embedded status envelope.
pub const STATUS_MARKER: &str = "{\"status\":";

/// Envelope openers removed by [`strip_embedded_json`].
const EMBEDDED_MARKERS: [&str; 6] = [
    "{\"status\":",
    "{\"answer\":",
    "{\"is_task_complete\":",
    "{\"action_taken\":",
    "{\"formatted_text\":",
    "response=",
];

/// Human-text keys tried, in order, when an envelope is the whole payload.
const ENVELOPE_TEXT_KEYS: [&str; 2] = ["message", "text"];

/// Strip embedded status envelopes and return the readable text.
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Some(text) = whole_envelope_text(trimmed) {
        return text;
    }
    if !trimmed.contains(STATUS_MARKER) {
        return trimmed.to_string();
    }

    let mut fragments = Vec::<String>::new();
    let mut rest = trimmed;
    while let Some(start) = rest.find(STATUS_MARKER) {
        push_fragment(&mut fragments, &rest[..start]);
        let tail = &rest[start..];
        let Some(end) = matching_close(tail) else {
            // Unterminated envelope: keep the raw tail rather than lose text.
            push_fragment(&mut fragments, tail);
            rest = "";
            break;
        };
        if let Some(message) = envelope_field(&tail[..end], "message") {
            push_fragment(&mut fragments, &message.replace("\\n", "\n"));
        }
        rest = &tail[end..];
    }
    push_fragment(&mut fragments, rest);

    fragments.dedup();
    match fragments.len() {
        0 => String::new(),
        // The longer of two candidates is usually the properly escaped copy
        // of the same answer. Fragile, but matches what agents actually send.
        2 => {
            let (a, b) = (&fragments[0], &fragments[1]);
            if b.chars().count() > a.chars().count() {
                b.clone()
            } else {
                a.clone()
            }
        }
        _ => fragments.join("\n\n"),
    }
}

/// Remove the first embedded protocol envelope from natural-language text.
///
/// Text before the envelope is kept; text after it is kept only when the
/// envelope itself was properly terminated.
pub fn strip_embedded_json(text: &str) -> String {
    let trimmed = text.trim();
    let Some((start, marker)) = EMBEDDED_MARKERS
        .iter()
        .filter_map(|marker| trimmed.find(marker).map(|idx| (idx, *marker)))
        .min_by_key(|(idx, _)| *idx)
    else {
        return trimmed.to_string();
    };

    let before = trimmed[..start].trim_end();
    let (object_start, fallback_end) = if marker == "response=" {
        let after_marker = start + marker.len();
        let gap = trimmed[after_marker..].len() - trimmed[after_marker..].trim_start().len();
        let line_end = trimmed[after_marker..]
            .find('\n')
            .map(|idx| after_marker + idx)
            .unwrap_or(trimmed.len());
        (after_marker + gap, line_end)
    } else {
        (start, trimmed.len())
    };

    let (after, span) = match trimmed[object_start..]
        .starts_with('{')
        .then(|| matching_close(&trimmed[object_start..]))
        .flatten()
    {
        Some(len) => (
            trimmed[object_start + len..].trim_start(),
            &trimmed[object_start..object_start + len],
        ),
        // `response=` without an object drops only the rest of its line.
        None if marker == "response=" => (trimmed[fallback_end..].trim_start(), ""),
        None => ("", ""),
    };

    let mut out = before.to_string();
    if !after.is_empty() {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(after);
    }
    if out.is_empty() {
        // Nothing but the envelope: surface its readable field instead of nothing.
        return ["message", "answer", "formatted_text", "content"]
            .iter()
            .find_map(|key| envelope_field(span, key))
            .unwrap_or_else(|| trimmed.to_string());
    }
    out
}

/// Collapse runs of three or more newlines into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newline_run = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            newline_run += 1;
            if newline_run > 2 {
                continue;
            }
        } else {
            newline_run = 0;
        }
        out.push(ch);
    }
    out
}

/// Return the byte length of the brace-balanced object at the start of `text`.
///
/// Braces inside JSON string literals are ignored.
pub(crate) fn matching_close(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn whole_envelope_text(text: &str) -> Option<String> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) else {
        return None;
    };
    ENVELOPE_TEXT_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(|text| text.trim().to_string())
}

fn envelope_field(span: &str, key: &str) -> Option<String> {
    let value: Value = serde_json::from_str(span).ok()?;
    let text = value.get(key)?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn push_fragment(fragments: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
}
