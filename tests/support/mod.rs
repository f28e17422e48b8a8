//! Shared fixtures for end-to-end turn scenarios.

use agent_chat::error::TransportError;
use agent_chat::repl::FormFiller;
use agent_chat::stream::InputMetadata;
use agent_chat::transport::decode::decode_event;
use agent_chat::transport::{AgentTransport, EventStream};
use agent_chat::types::{OutboundMessage, ProtocolEvent};
use agent_chat::ui::render::DisplaySurface;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Artifact-update frame as an agent would stream it.
pub fn artifact(name: &str, text: &str) -> ProtocolEvent {
    decode_event(&json!({
        "kind": "artifact-update",
        "artifact": {"name": name, "parts": [{"kind": "text", "text": text}]},
    }))
}

/// Status-update frame; an empty `text` carries no message.
pub fn status(state: &str, text: &str) -> ProtocolEvent {
    let message = if text.is_empty() {
        Value::Null
    } else {
        json!({"role": "agent", "parts": [{"kind": "text", "text": text}]})
    };
    decode_event(&json!({
        "kind": "status-update",
        "status": {"state": state, "message": message},
        "final": false,
    }))
}

/// Final status frame that ends the stream.
pub fn complete() -> ProtocolEvent {
    decode_event(&json!({
        "kind": "status-update",
        "status": {"state": "completed"},
        "final": true,
    }))
}

/// Transport that streams one scripted event list per turn.
#[derive(Default)]
pub struct ScriptedTransport {
    turns: Mutex<VecDeque<Vec<ProtocolEvent>>>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(turns: Vec<Vec<ProtocolEvent>>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentTransport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn stream_message(&self, message: &OutboundMessage) -> Result<EventStream, TransportError> {
        self.sent.lock().unwrap().push(message.text().to_string());
        let events = self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::InvalidResponse("no scripted turn left".into()))?;
        Ok(Box::pin(futures::stream::iter(events.into_iter().map(Ok))))
    }

    async fn send_message(&self, _message: &OutboundMessage) -> Result<String, TransportError> {
        Err(TransportError::InvalidResponse("no scripted turn left".into()))
    }
}

/// Display surface that records every drawing call.
#[derive(Default)]
pub struct RecordingSurface {
    entries: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn log(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Bodies of every panel titled `title`.
    pub fn panels(&self, title: &str) -> Vec<String> {
        let prefix = format!("panel:{title}:");
        self.log()
            .into_iter()
            .filter_map(|entry| entry.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Rows of the most recent live-region draw.
    pub fn last_live(&self) -> Option<String> {
        self.log()
            .into_iter()
            .rev()
            .find_map(|entry| entry.strip_prefix("live:").map(str::to_string))
    }

    fn record(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }
}

impl DisplaySurface for RecordingSurface {
    fn spinner_frame(&self, _line: &str) {}

    fn clear_spinner(&self) {
        self.record("spinner-cleared".into());
    }

    fn draw_live(&self, rows: &[String]) {
        self.record(format!("live:{}", rows.join("\n")));
    }

    fn clear_live(&self) {
        self.record("live-cleared".into());
    }

    fn panel(&self, title: &str, markdown: &str) {
        self.record(format!("panel:{title}:{markdown}"));
    }

    fn info(&self, text: &str) {
        self.record(format!("info:{text}"));
    }

    fn warn(&self, msg: &str) {
        self.record(format!("warn:{msg}"));
    }

    fn error(&self, msg: &str) {
        self.record(format!("error:{msg}"));
    }

    fn clear_screen(&self) {
        self.record("clear-screen".into());
    }

    fn size(&self) -> (usize, usize) {
        (80, 40)
    }

    fn color(&self) -> bool {
        false
    }
}

/// Form collaborator that records the schemas it was shown.
#[derive(Default)]
pub struct RecordingForm {
    pub seen: Vec<InputMetadata>,
    pub answer: Option<Map<String, Value>>,
}

impl FormFiller for RecordingForm {
    fn fill(&mut self, metadata: &InputMetadata) -> Option<Map<String, Value>> {
        self.seen.push(metadata.clone());
        self.answer.clone()
    }
}
