//! Per-process chat session state.
//!
//! One [`Session`] is created at startup and passed by reference through the
//! REPL. Its context id is generated once and attached to every outbound
//! message so the agent can correlate turns into one conversation.

use crate::tui::settings;
use crate::types::{AgentCard, OutboundMessage};

/// Display-facing facts about the connected agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentProfile {
    pub name: String,
    pub description: Option<String>,
    /// Description of the first advertised skill.
    pub skill_description: Option<String>,
    /// Example prompts of the first advertised skill.
    pub examples: Vec<String>,
}

impl AgentProfile {
    pub fn from_card(card: &AgentCard) -> Self {
        let skill = card.skills.first();
        Self {
            name: card.name.trim().to_string(),
            description: non_empty(&card.description),
            skill_description: skill.and_then(|skill| non_empty(&skill.description)),
            examples: skill
                .map(|skill| {
                    skill
                        .examples
                        .iter()
                        .map(|example| example.trim().to_string())
                        .filter(|example| !example.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Agent name with its first letter capitalized, or the generic label.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.trim().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => settings::LABEL_DEFAULT_AGENT.to_string(),
        }
    }

    /// Skill description when present, else the card description.
    pub fn description(&self) -> Option<&str> {
        self.skill_description
            .as_deref()
            .or(self.description.as_deref())
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// State shared by every turn of one REPL run.
#[derive(Debug, Clone)]
pub struct Session {
    context_id: String,
    trace_id: Option<String>,
    profile: AgentProfile,
    history_key: String,
}

impl Session {
    /// Start a session with a fresh context id.
    pub fn new(profile: AgentProfile, history_key: impl Into<String>, trace_id: Option<String>) -> Self {
        Self {
            context_id: uuid::Uuid::new_v4().simple().to_string(),
            trace_id: trace_id.filter(|id| !id.trim().is_empty()),
            profile,
            history_key: history_key.into(),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    pub fn history_key(&self) -> &str {
        &self.history_key
    }

    pub fn agent_name(&self) -> String {
        self.profile.display_name()
    }

    /// Build the outbound message for one user input.
    pub fn message(&self, text: &str) -> OutboundMessage {
        OutboundMessage::user_text(text, &self.context_id, self.trace_id.as_deref())
    }
}
