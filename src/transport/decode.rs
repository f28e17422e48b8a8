//! Decoding of raw agent frames into [`ProtocolEvent`]s.
//!
//! Agents send status updates, artifact updates, task snapshots, and direct
//! messages, with text parts either flat (`{"kind":"text","text":..}`) or
//! nested under `root`. All of that shape probing happens here, once.

use crate::error::TransportError;
use crate::types::{ArtifactEvent, Metadata, Part, ProtocolEvent, StatusEvent, TaskState};
use serde_json::Value;

/// Decode one JSON-RPC frame (or a bare result object) into an event.
pub fn decode_frame(payload: &str) -> Result<ProtocolEvent, TransportError> {
    let frame: Value = serde_json::from_str(payload)?;
    let result = jsonrpc_result(&frame)?;
    Ok(decode_event(result))
}

/// Unwrap a JSON-RPC envelope, turning an `error` member into an error.
pub fn jsonrpc_result(frame: &Value) -> Result<&Value, TransportError> {
    if let Some(error) = frame.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(TransportError::InvalidResponse(format!(
            "agent error {code}: {message}"
        )));
    }
    Ok(frame.get("result").unwrap_or(frame))
}

/// Classify a decoded result object.
pub fn decode_event(result: &Value) -> ProtocolEvent {
    let kind = result
        .get("kind")
        .or_else(|| result.get("type"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let complete = completion_flag(result);

    if kind == "artifact-update" || result.get("artifact").is_some() {
        let artifact = result.get("artifact").unwrap_or(&Value::Null);
        let mut metadata = object_of(artifact.get("metadata"));
        metadata.extend(object_of(result.get("metadata")));
        return ProtocolEvent::Artifact(ArtifactEvent {
            name: artifact
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            parts: decode_parts(artifact.get("parts")),
            state: status_state(result),
            metadata,
            is_task_complete: complete,
        });
    }

    if matches!(kind, "status-update" | "task") || result.get("status").is_some() {
        let status = result.get("status").unwrap_or(&Value::Null);
        let message = status.get("message").unwrap_or(&Value::Null);
        let mut metadata = object_of(result.get("metadata"));
        metadata.extend(object_of(status.get("metadata")));
        metadata.extend(object_of(message.get("metadata")));
        return ProtocolEvent::Status(StatusEvent {
            state: status_state(result),
            message: decode_parts(message.get("parts")),
            metadata,
            is_task_complete: complete,
        });
    }

    if kind == "message" || result.get("parts").is_some() {
        // A direct agent message is the whole answer.
        return ProtocolEvent::Artifact(ArtifactEvent {
            name: None,
            parts: decode_parts(result.get("parts")),
            state: None,
            metadata: object_of(result.get("metadata")),
            is_task_complete: true,
        });
    }

    ProtocolEvent::Other {
        kind: if kind.is_empty() {
            "unknown".to_string()
        } else {
            kind.to_string()
        },
        is_task_complete: complete,
    }
}

/// Answer text of a non-streaming result.
///
/// Prefers the first text part of the first artifact, then the status
/// message, then the parts of a direct message.
pub fn extract_response_text(result: &Value) -> String {
    let first_artifact_text = result
        .get("artifacts")
        .and_then(Value::as_array)
        .and_then(|artifacts| artifacts.first())
        .and_then(|artifact| {
            decode_parts(artifact.get("parts"))
                .into_iter()
                .find_map(|part| match part {
                    Part::Text(text) => Some(text),
                    Part::Other => None,
                })
        });
    if let Some(text) = first_artifact_text {
        return text;
    }

    let status_text = crate::types::flatten_text(&decode_parts(
        result
            .get("status")
            .and_then(|status| status.get("message"))
            .and_then(|message| message.get("parts")),
    ));
    if !status_text.is_empty() {
        return status_text;
    }
    crate::types::flatten_text(&decode_parts(result.get("parts")))
}

fn decode_parts(parts: Option<&Value>) -> Vec<Part> {
    let Some(parts) = parts.and_then(Value::as_array) else {
        return Vec::new();
    };
    parts
        .iter()
        .map(|part| {
            part.get("text")
                .or_else(|| part.get("root").and_then(|root| root.get("text")))
                .and_then(Value::as_str)
                .map(|text| Part::Text(text.to_string()))
                .unwrap_or(Part::Other)
        })
        .collect()
}

fn status_state(result: &Value) -> Option<TaskState> {
    result
        .get("status")
        .and_then(|status| status.get("state"))
        .and_then(Value::as_str)
        .map(TaskState::parse)
}

fn completion_flag(result: &Value) -> bool {
    ["final", "is_task_complete", "isTaskComplete"]
        .iter()
        .any(|key| result.get(*key).and_then(Value::as_bool).unwrap_or(false))
}

fn object_of(value: Option<&Value>) -> Metadata {
    value
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn artifact_update_with_nested_root_parts() {
        let event = decode_event(&json!({
            "kind": "artifact-update",
            "artifact": {
                "name": "streaming_result",
                "parts": [{"root": {"kind": "text", "text": "Hel"}}, {"kind": "text", "text": "lo"}]
            }
        }));
        let ProtocolEvent::Artifact(artifact) = event else {
            panic!("expected artifact, got {event:?}");
        };
        assert_eq!(artifact.name.as_deref(), Some("streaming_result"));
        assert_eq!(artifact.text(), "Hello");
        assert!(!artifact.is_task_complete);
    }

    #[test]
    fn status_update_collects_metadata_from_every_level() {
        let event = decode_event(&json!({
            "kind": "status-update",
            "final": true,
            "metadata": {"tool_notification": true},
            "status": {
                "state": "working",
                "message": {"parts": [{"kind": "text", "text": "calling"}], "metadata": {"tool_name": "search"}}
            }
        }));
        let ProtocolEvent::Status(status) = event else {
            panic!("expected status, got {event:?}");
        };
        assert_eq!(status.state, Some(TaskState::Working));
        assert!(status.is_tool_notification());
        assert_eq!(status.metadata.get("tool_name"), Some(&json!("search")));
        assert_eq!(status.text(), "calling");
        assert!(status.is_task_complete);
    }

    #[test]
    fn task_snapshot_without_message_is_an_empty_status() {
        let event = decode_event(&json!({"kind": "task", "id": "t1", "status": {"state": "submitted"}}));
        let ProtocolEvent::Status(status) = event else {
            panic!("expected status, got {event:?}");
        };
        assert_eq!(status.state, Some(TaskState::Submitted));
        assert!(status.message.is_empty());
    }

    #[test]
    fn direct_message_is_a_complete_answer() {
        let event = decode_event(&json!({"kind": "message", "role": "agent", "parts": [{"kind": "text", "text": "hi"}]}));
        assert!(event.is_task_complete());
        let ProtocolEvent::Artifact(artifact) = event else {
            panic!("expected artifact");
        };
        assert_eq!(artifact.text(), "hi");
    }

    #[test]
    fn unknown_frames_are_other() {
        let event = decode_event(&json!({"kind": "heartbeat", "is_task_complete": true}));
        assert_eq!(
            event,
            ProtocolEvent::Other {
                kind: "heartbeat".into(),
                is_task_complete: true
            }
        );
    }

    #[test]
    fn jsonrpc_error_frames_fail() {
        let err = decode_frame(r#"{"jsonrpc":"2.0","id":"1","error":{"code":-32001,"message":"task not found"}}"#)
            .expect_err("error frame");
        assert!(err.to_string().contains("task not found"));
        assert!(decode_frame("not json").is_err());
    }

    #[test]
    fn response_text_prefers_first_artifact() {
        let result = json!({
            "kind": "task",
            "status": {"state": "completed", "message": {"parts": [{"text": "status text"}]}},
            "artifacts": [{"parts": [{"kind": "data"}, {"kind": "text", "text": "artifact text"}]}, {"parts": [{"text": "second"}]}]
        });
        assert_eq!(extract_response_text(&result), "artifact text");

        let result = json!({"status": {"message": {"parts": [{"text": "status text"}]}}});
        assert_eq!(extract_response_text(&result), "status text");

        let result = json!({"kind": "message", "parts": [{"text": "direct"}]});
        assert_eq!(extract_response_text(&result), "direct");
    }
}
