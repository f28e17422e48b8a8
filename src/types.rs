//! Data model for the agent wire protocol.
//!
//! Inbound frames are decoded once (see `transport::decode`) into the tagged
//! [`ProtocolEvent`] union so the reduction engine never probes raw JSON.
//! Outbound messages serialize directly to the JSON-RPC `params.message`
//! payload both transports send.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to events and messages.
pub type Metadata = Map<String, Value>;

// ---------------------------------------------------------------------------
// Task state
// ---------------------------------------------------------------------------

/// Lifecycle state reported by a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Rejected,
    AuthRequired,
    Unknown(String),
}

impl TaskState {
    /// Parse the wire spelling (`input-required`, `working`, ...).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "submitted" => Self::Submitted,
            "working" => Self::Working,
            "input-required" => Self::InputRequired,
            "completed" => Self::Completed,
            "canceled" | "cancelled" => Self::Canceled,
            "failed" => Self::Failed,
            "rejected" => Self::Rejected,
            "auth-required" => Self::AuthRequired,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Intermediate states never contribute to the committed answer text.
    pub fn is_intermediate(&self) -> bool {
        matches!(self, Self::Working)
    }
}

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

/// One fragment of a message or artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// Non-text parts (files, structured data) are carried but not rendered.
    Other,
}

/// Concatenate the text parts of a fragment list.
pub fn flatten_text(parts: &[Part]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Part::Text(text) => Some(text.as_str()),
            Part::Other => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// A status update (or task snapshot) from the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub state: Option<TaskState>,
    pub message: Vec<Part>,
    pub metadata: Metadata,
    pub is_task_complete: bool,
}

impl StatusEvent {
    pub fn text(&self) -> String {
        flatten_text(&self.message)
    }

    /// Whether this status carries a tool-call notification.
    pub fn is_tool_notification(&self) -> bool {
        self.metadata
            .get("tool_notification")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A named artifact chunk from the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactEvent {
    /// Free-form tag such as `streaming_result` or `complete_result`.
    pub name: Option<String>,
    pub parts: Vec<Part>,
    /// Task state reported in the same frame, when the server includes one.
    pub state: Option<TaskState>,
    pub metadata: Metadata,
    pub is_task_complete: bool,
}

impl ArtifactEvent {
    pub fn text(&self) -> String {
        flatten_text(&self.parts)
    }
}

/// One decoded unit of the streaming sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolEvent {
    Status(StatusEvent),
    Artifact(ArtifactEvent),
    Other { kind: String, is_task_complete: bool },
}

impl ProtocolEvent {
    /// Whether the agent flagged this event as the end of the task.
    pub fn is_task_complete(&self) -> bool {
        match self {
            Self::Status(event) => event.is_task_complete,
            Self::Artifact(event) => event.is_task_complete,
            Self::Other {
                is_task_complete, ..
            } => *is_task_complete,
        }
    }

    /// Short label used in debug logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Status(_) => "status",
            Self::Artifact(event) => event.name.as_deref().unwrap_or("artifact"),
            Self::Other { kind, .. } => kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// Text part of an outbound message.
///
/// Both discriminator spellings are emitted: older agents read `type`, newer
/// ones `kind`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutboundPart {
    pub kind: &'static str,
    #[serde(rename = "type")]
    pub part_type: &'static str,
    pub text: String,
}

/// The user message sent for one turn.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub kind: &'static str,
    pub role: &'static str,
    pub parts: Vec<OutboundPart>,
    pub message_id: String,
    pub context_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl OutboundMessage {
    /// Build a user text message with a fresh message id.
    pub fn user_text(text: impl Into<String>, context_id: &str, trace_id: Option<&str>) -> Self {
        let metadata = trace_id.map(|trace_id| {
            let mut map = Metadata::new();
            map.insert("trace_id".to_string(), Value::String(trace_id.to_string()));
            map
        });
        Self {
            kind: "message",
            role: "user",
            parts: vec![OutboundPart {
                kind: "text",
                part_type: "text",
                text: text.into(),
            }],
            message_id: uuid::Uuid::new_v4().simple().to_string(),
            context_id: context_id.to_string(),
            metadata,
        }
    }

    /// Text of the first part, used for echoes and logs.
    pub fn text(&self) -> &str {
        self.parts.first().map(|p| p.text.as_str()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Agent card
// ---------------------------------------------------------------------------

/// One advertised skill of a remote agent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Advertised transport capabilities.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    #[serde(default)]
    pub streaming: Option<bool>,
}

/// Agent descriptor fetched during discovery.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(default)]
    pub supports_authenticated_extended_card: bool,
}
