//! Shared test fixtures for parser, transport and display test modules.

use crate::error::TransportError;
use crate::repl::{LineReader, ReadOutcome};
use crate::transport::{AgentTransport, EventStream};
use crate::types::{
    ArtifactEvent, Metadata, OutboundMessage, Part, ProtocolEvent, StatusEvent, TaskState,
};
use crate::ui::render::DisplaySurface;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("agent-chat-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// One SSE block carrying a JSON-RPC result frame.
pub fn sse_result_block(id: &str, result: serde_json::Value) -> String {
    let frame = json!({"jsonrpc": "2.0", "id": id, "result": result});
    format!("data: {frame}\n\n")
}

/// Artifact-update event with one text part.
pub fn artifact(name: &str, text: &str) -> ProtocolEvent {
    ProtocolEvent::Artifact(ArtifactEvent {
        name: Some(name.to_string()),
        parts: vec![Part::Text(text.to_string())],
        state: None,
        metadata: Metadata::new(),
        is_task_complete: false,
    })
}

/// Artifact-update event emitted while the task was in `state`.
pub fn artifact_in_state(name: &str, text: &str, state: TaskState) -> ProtocolEvent {
    let ProtocolEvent::Artifact(mut event) = artifact(name, text) else {
        unreachable!("artifact() builds artifact events");
    };
    event.state = Some(state);
    ProtocolEvent::Artifact(event)
}

/// Status-update event with a text message.
pub fn status(state: TaskState, text: &str) -> ProtocolEvent {
    let message = if text.is_empty() {
        Vec::new()
    } else {
        vec![Part::Text(text.to_string())]
    };
    ProtocolEvent::Status(StatusEvent {
        state: Some(state),
        message,
        metadata: Metadata::new(),
        is_task_complete: false,
    })
}

/// Status-update event carrying tool-notification metadata.
pub fn tool_status(tool: &str, stage: &str) -> ProtocolEvent {
    let mut metadata = Metadata::new();
    metadata.insert("tool_notification".into(), json!(true));
    metadata.insert("tool_name".into(), json!(tool));
    metadata.insert("status".into(), json!(stage));
    ProtocolEvent::Status(StatusEvent {
        state: Some(TaskState::Working),
        message: vec![Part::Text(format!("{tool} {stage}"))],
        metadata,
        is_task_complete: false,
    })
}

/// Final status-update event that ends the stream.
pub fn completion() -> ProtocolEvent {
    ProtocolEvent::Status(StatusEvent {
        state: Some(TaskState::Completed),
        message: Vec::new(),
        metadata: Metadata::new(),
        is_task_complete: true,
    })
}

/// Transport that streams one scripted event list per turn.
///
/// Once the script runs out, both streaming and single-shot sends fail.
#[derive(Debug, Default)]
pub struct QueueTransport {
    turns: Mutex<VecDeque<Vec<ProtocolEvent>>>,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl QueueTransport {
    pub fn new(turns: Vec<Vec<ProtocolEvent>>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Text of every message sent so far, oldest first.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("sent lock")
            .iter()
            .map(|m| m.text().to_string())
            .collect()
    }
}

#[async_trait]
impl AgentTransport for QueueTransport {
    fn name(&self) -> &'static str {
        "queue"
    }

    async fn stream_message(&self, message: &OutboundMessage) -> Result<EventStream, TransportError> {
        self.sent.lock().expect("sent lock").push(message.clone());
        match self.turns.lock().expect("turn lock").pop_front() {
            Some(events) => Ok(Box::pin(futures::stream::iter(
                events.into_iter().map(Ok),
            ))),
            None => Err(TransportError::InvalidResponse("script exhausted".into())),
        }
    }

    async fn send_message(&self, _message: &OutboundMessage) -> Result<String, TransportError> {
        Err(TransportError::InvalidResponse("script exhausted".into()))
    }
}

/// Display surface that records every drawing call as a string.
#[derive(Debug)]
pub struct RecordingSurface {
    entries: Mutex<Vec<String>>,
    size: (usize, usize),
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::with_size(80, 24)
    }
}

impl RecordingSurface {
    pub fn with_size(columns: usize, rows: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            size: (columns, rows),
        }
    }

    /// Snapshot of recorded calls, oldest first.
    pub fn log(&self) -> Vec<String> {
        self.entries.lock().expect("recording lock").clone()
    }

    fn record(&self, entry: String) {
        self.entries.lock().expect("recording lock").push(entry);
    }
}

impl DisplaySurface for RecordingSurface {
    fn spinner_frame(&self, line: &str) {
        self.record(format!("spinner:{line}"));
    }

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
        self.size
    }

    fn color(&self) -> bool {
        false
    }
}

/// Reader that replays a fixed script, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: VecDeque<ReadOutcome>,
    prompts: Vec<String>,
}

impl ScriptedReader {
    pub fn new<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|line| ReadOutcome::Line(line.into()))
                .collect(),
            prompts: Vec::new(),
        }
    }

    /// Queue a non-line outcome such as Ctrl-C.
    pub fn then(mut self, outcome: ReadOutcome) -> Self {
        self.lines.push_back(outcome);
        self
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        self.prompts.push(prompt.to_string());
        self.lines.pop_front().unwrap_or(ReadOutcome::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[test]
    fn sse_result_block_wraps_jsonrpc_frame() {
        let block = sse_result_block("req-1", json!({"kind": "status-update"}));
        assert!(block.starts_with("data: {"));
        assert!(block.contains("\"jsonrpc\":\"2.0\""));
        assert!(block.ends_with("\n\n"));
    }

    #[test]
    fn event_builders_produce_expected_shapes() {
        assert!(completion().is_task_complete());
        let ProtocolEvent::Status(tool) = tool_status("search", "started") else {
            panic!("expected status");
        };
        assert!(tool.is_tool_notification());
        let ProtocolEvent::Artifact(art) = artifact_in_state("x", "t", TaskState::Working) else {
            panic!("expected artifact");
        };
        assert_eq!(art.state, Some(TaskState::Working));
    }
}
