//! Classification of a finished answer.
//!
//! A finished turn is either plain text, an explicitly tagged follow-up
//! request (`UserInputMetaData: {...}`), or a legacy JSON envelope. Two backend
//! envelope schemas exist: one names the answer `content`, the other names it
//! `answer` and always expects more input.

use super::sanitize::{matching_close, strip_embedded_json};
use serde::Serialize;
use serde_json::{Map, Value};

/// Tag that prefixes a follow-up request payload.
pub const USER_INPUT_MARKER: &str = "UserInputMetaData:";

/// One field the agent wants the user to fill in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub field_name: String,
    pub field_description: String,
    /// Enumerated choices; `None` means free text.
    pub field_values: Option<Vec<String>>,
}

impl InputField {
    /// Build a field from one schema entry, accepting `name`/`description` aliases.
    fn from_value(value: &Value) -> Option<Self> {
        let field_name = string_field(value, &["field_name", "name"])?;
        let field_description = string_field(value, &["field_description", "description"])
            .unwrap_or_else(|| format!("Please provide {field_name}"));
        let field_values = value
            .get("field_values")
            .or_else(|| value.get("options"))
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|values| !values.is_empty());
        Some(Self {
            field_name,
            field_description,
            field_values,
        })
    }

    /// Whether this field offers a fixed choice list.
    pub fn is_choice(&self) -> bool {
        self.field_values.is_some()
    }
}

/// Follow-up request schema attached to an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputMetadata {
    pub input_fields: Vec<InputField>,
}

impl InputMetadata {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let input_fields = object
            .get("input_fields")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(InputField::from_value).collect())
            .unwrap_or_default();
        Some(Self { input_fields })
    }
}

/// Result of classifying a finished answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnswer {
    pub content: String,
    pub require_user_input: bool,
    pub metadata: Option<InputMetadata>,
}

impl ParsedAnswer {
    fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            require_user_input: false,
            metadata: None,
        }
    }
}

/// Classify a finished answer. Never fails; unparseable input is plain text.
pub fn parse(text: &str) -> ParsedAnswer {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedAnswer::plain(text);
    }

    if let Some(parsed) = parse_tagged(trimmed) {
        return parsed;
    }

    if let Ok(Value::Object(envelope)) = serde_json::from_str::<Value>(trimmed) {
        if let Some(parsed) = parse_envelope(&envelope) {
            return parsed;
        }
    }

    ParsedAnswer::plain(strip_embedded_json(trimmed))
}

fn parse_tagged(text: &str) -> Option<ParsedAnswer> {
    let payload = text.strip_prefix(USER_INPUT_MARKER)?.trim_start();
    let end = matching_close(payload).unwrap_or(payload.len());
    let Ok(Value::Object(envelope)) = serde_json::from_str::<Value>(&payload[..end]) else {
        return None;
    };
    Some(ParsedAnswer {
        content: envelope
            .get("content")
            .map(value_text)
            .unwrap_or_default(),
        require_user_input: envelope
            .get("require_user_input")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        metadata: envelope.get("metadata").and_then(InputMetadata::from_value),
    })
}

fn parse_envelope(envelope: &Map<String, Value>) -> Option<ParsedAnswer> {
    let (content, default_require) = match (envelope.get("content"), envelope.get("answer")) {
        (Some(content), _) => (value_text(content), false),
        (None, Some(answer)) => (value_text(answer), true),
        (None, None) => return None,
    };
    Some(ParsedAnswer {
        content,
        require_user_input: envelope
            .get("require_user_input")
            .and_then(Value::as_bool)
            .unwrap_or(default_require),
        metadata: envelope.get("metadata").and_then(InputMetadata::from_value),
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
