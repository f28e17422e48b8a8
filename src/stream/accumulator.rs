//! Per-turn event router and accumulator.
//!
//! `TurnAccumulator` consumes decoded [`ProtocolEvent`]s one at a time and
//! routes each into one handling lane (tool activity, result overrides,
//! execution plan, streamed answer text, status chatter). It never touches the
//! terminal itself: every call to [`TurnAccumulator::ingest`] returns a
//! [`Step`] telling the driver what to do with the display.
//!
//! Phase transitions:
//!
//! ```text
//! Spinning --first visible text--> StreamingPlain | StreamingDashboard
//! StreamingPlain --plan/tool activity--> StreamingDashboard
//! any --finalize()--> Finalizing
//! ```
//!
//! The dashboard never reverts to the spinner within a turn.

use super::plan::{format_plan, ICON_COMPLETED, ICON_IN_PROGRESS};
use super::sanitize::{collapse_blank_lines, sanitize};
use super::structured::USER_INPUT_MARKER;
use super::tool_notice::summarize;
use crate::types::{ArtifactEvent, ProtocolEvent, StatusEvent, TaskState};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};

/// Tool-activity lines kept for display.
pub const TOOL_LOG_LIMIT: usize = 8;

pub const ICON_FAILED: &str = "❌";

/// Display phase of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spinning,
    StreamingPlain,
    StreamingDashboard,
    Finalizing,
}

/// What the display must redraw after one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    None,
    /// Redraw the multi-panel live region from [`TurnAccumulator::panels`].
    Dashboard,
    /// Append the newly streamed text to the plain output.
    Plain,
}

/// Instructions returned for each ingested event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Set exactly once per turn, on the first visible content.
    pub stop_spinner: bool,
    pub refresh: Refresh,
    /// The agent flagged the task as complete; stop reading the stream.
    pub complete: bool,
}

/// Borrowed view of the live panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivePanels<'a> {
    pub plan: &'a str,
    pub tools: Vec<&'a str>,
    pub streaming: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolStage {
    Started,
    Completed,
    Failed,
}

impl ToolStage {
    fn from_metadata(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("completed") | Some("complete") | Some("done") => Self::Completed,
            Some("failed") | Some("error") => Self::Failed,
            _ => Self::Started,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Started => ICON_IN_PROGRESS,
            Self::Completed => ICON_COMPLETED,
            Self::Failed => ICON_FAILED,
        }
    }
}

/// Artifact routing lanes, keyed by artifact name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
    /// `complete_result` / `final_result`.
    CompleteResult,
    PartialResult,
    Plan,
    PlanStreaming,
    ToolNotice,
    Text,
}

impl Lane {
    fn for_artifact(name: Option<&str>) -> Self {
        match name {
            Some("complete_result") | Some("final_result") => Self::CompleteResult,
            Some("partial_result") => Self::PartialResult,
            Some("execution_plan_update") | Some("execution_plan_status_update") => Self::Plan,
            Some("execution_plan_streaming") => Self::PlanStreaming,
            Some("tool_notification_start") | Some("tool_notification_end") => Self::ToolNotice,
            _ => Self::Text,
        }
    }
}

/// Visibility outcome of one lane.
#[derive(Debug, Clone, Copy, Default)]
struct Outcome {
    visible: bool,
    wants_dashboard: bool,
}

impl Outcome {
    fn hidden() -> Self {
        Self::default()
    }

    fn visible(wants_dashboard: bool) -> Self {
        Self {
            visible: true,
            wants_dashboard,
        }
    }
}

/// Mutable state threaded through one user turn.
#[derive(Debug)]
pub struct TurnAccumulator {
    phase: Phase,
    response_buffer: String,
    final_state_text: String,
    all_text: String,
    partial_result: Option<String>,
    complete_result: Option<String>,
    execution_plan: String,
    tool_activity: VecDeque<String>,
    last_event_signature: String,
    displayed_notifications: HashSet<String>,
    events_seen: usize,
}

impl Default for TurnAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnAccumulator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Spinning,
            response_buffer: String::new(),
            final_state_text: String::new(),
            all_text: String::new(),
            partial_result: None,
            complete_result: None,
            execution_plan: String::new(),
            tool_activity: VecDeque::with_capacity(TOOL_LOG_LIMIT),
            last_event_signature: String::new(),
            displayed_notifications: HashSet::new(),
            events_seen: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn events_seen(&self) -> usize {
        self.events_seen
    }

    /// Progressively assembled answer text.
    pub fn buffer(&self) -> &str {
        &self.response_buffer
    }

    pub fn execution_plan(&self) -> &str {
        &self.execution_plan
    }

    /// Tool-activity log, oldest first.
    pub fn tool_lines(&self) -> Vec<&str> {
        self.tool_activity.iter().map(String::as_str).collect()
    }

    pub fn panels(&self) -> LivePanels<'_> {
        LivePanels {
            plan: &self.execution_plan,
            tools: self.tool_lines(),
            streaming: &self.response_buffer,
        }
    }

    /// Route one event and report what the display must do.
    pub fn ingest(&mut self, event: &ProtocolEvent) -> Step {
        self.events_seen += 1;
        let outcome = match event {
            ProtocolEvent::Status(status) if status.is_tool_notification() => {
                self.on_tool_status(status)
            }
            ProtocolEvent::Status(status) => self.on_status(status),
            ProtocolEvent::Artifact(artifact) => self.on_artifact(artifact),
            ProtocolEvent::Other { .. } => Outcome::hidden(),
        };

        let stop_spinner = outcome.visible && self.phase == Phase::Spinning;
        if outcome.visible {
            self.advance(outcome.wants_dashboard);
        }
        let refresh = match (outcome.visible, self.phase) {
            (true, Phase::StreamingDashboard) => Refresh::Dashboard,
            (true, Phase::StreamingPlain) => Refresh::Plain,
            _ => Refresh::None,
        };

        Step {
            stop_spinner,
            refresh,
            complete: event.is_task_complete(),
        }
    }

    /// Resolve the one final answer for this turn.
    ///
    /// Priority: result override, committed text, all text, raw buffer. A
    /// pending follow-up request in the buffer is never shadowed.
    pub fn finalize(&mut self) -> String {
        self.phase = Phase::Finalizing;
        let override_text = self
            .complete_result
            .as_deref()
            .or(self.partial_result.as_deref());
        let mut chosen = [
            override_text,
            Some(self.final_state_text.as_str()),
            Some(self.all_text.as_str()),
            Some(self.response_buffer.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(sanitize)
        .find(|text| !text.is_empty())
        .unwrap_or_default();

        if self.response_buffer.contains(USER_INPUT_MARKER) && !chosen.contains(USER_INPUT_MARKER)
        {
            chosen = sanitize(&self.response_buffer);
        }
        collapse_blank_lines(&chosen)
    }

    fn advance(&mut self, wants_dashboard: bool) {
        self.phase = match (self.phase, wants_dashboard) {
            (Phase::Spinning, true) | (Phase::StreamingPlain, true) => Phase::StreamingDashboard,
            (Phase::Spinning, false) => Phase::StreamingPlain,
            (current, _) => current,
        };
    }

    // -- lanes --------------------------------------------------------------

    fn on_tool_status(&mut self, status: &StatusEvent) -> Outcome {
        let tool = ["tool_name", "tool"]
            .iter()
            .find_map(|key| status.metadata.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| summarize(&status.text()));
        if tool.is_empty() {
            return Outcome::hidden();
        }

        let stage = ToolStage::from_metadata(status.metadata.get("status").and_then(Value::as_str));
        let line = format!("{} {tool}", stage.icon());
        match stage {
            ToolStage::Started => {
                if self.tool_activity.back() != Some(&line) {
                    self.push_tool_line(line);
                }
            }
            ToolStage::Completed | ToolStage::Failed => {
                let pending = format!("{ICON_IN_PROGRESS} {tool}");
                match self.tool_activity.iter().rposition(|entry| *entry == pending) {
                    Some(idx) => self.tool_activity[idx] = line,
                    None => self.push_tool_line(line),
                }
            }
        }

        if !self.execution_plan.is_empty() {
            self.splice_plan(&tool, stage);
        }
        Outcome::visible(true)
    }

    fn on_status(&mut self, status: &StatusEvent) -> Outcome {
        let text = sanitize(&status.text());
        if !text.is_empty() {
            merge_progressive(&mut self.all_text, &text);
        }
        Outcome::hidden()
    }

    fn on_artifact(&mut self, artifact: &ArtifactEvent) -> Outcome {
        let lane = Lane::for_artifact(artifact.name.as_deref());
        let raw = artifact.text();
        match lane {
            Lane::CompleteResult | Lane::PartialResult => {
                let text = sanitize(&raw);
                if !text.is_empty() {
                    if lane == Lane::CompleteResult {
                        self.complete_result = Some(text);
                    } else {
                        self.partial_result = Some(text);
                    }
                }
                Outcome::hidden()
            }
            Lane::Plan => {
                if raw.trim().is_empty() {
                    return Outcome::hidden();
                }
                self.execution_plan = format_plan(raw.trim());
                Outcome::visible(true)
            }
            Lane::PlanStreaming => Outcome::hidden(),
            Lane::ToolNotice => {
                let summary = summarize(&raw);
                if summary.is_empty() || !self.displayed_notifications.insert(summary.clone()) {
                    return Outcome::hidden();
                }
                self.push_tool_line(summary);
                Outcome::visible(true)
            }
            Lane::Text => self.on_text(artifact, &raw),
        }
    }

    fn on_text(&mut self, artifact: &ArtifactEvent, raw: &str) -> Outcome {
        let cleaned = sanitize(raw);
        if cleaned.is_empty() || cleaned == self.last_event_signature {
            return Outcome::hidden();
        }
        self.last_event_signature = cleaned.clone();

        // Untouched fragments keep their own whitespace so token seams survive.
        let fragment = if cleaned == raw.trim() { raw } else { cleaned.as_str() };
        merge_progressive(&mut self.response_buffer, fragment);
        if !artifact
            .state
            .as_ref()
            .is_some_and(TaskState::is_intermediate)
        {
            merge_progressive(&mut self.final_state_text, fragment);
        }
        merge_progressive(&mut self.all_text, fragment);

        Outcome::visible(artifact.name.as_deref() == Some("streaming_result"))
    }

    fn push_tool_line(&mut self, line: String) {
        self.tool_activity.push_back(line);
        while self.tool_activity.len() > TOOL_LOG_LIMIT {
            self.tool_activity.pop_front();
        }
    }

    fn splice_plan(&mut self, tool: &str, stage: ToolStage) {
        let needle = tool.to_lowercase();
        let mut lines = self
            .execution_plan
            .lines()
            .map(str::to_string)
            .collect::<Vec<_>>();
        match lines
            .iter_mut()
            .find(|line| line.to_lowercase().contains(&needle))
        {
            Some(line) => {
                if stage != ToolStage::Started && line.contains(ICON_IN_PROGRESS) {
                    *line = line.replacen(ICON_IN_PROGRESS, stage.icon(), 1);
                }
            }
            None => lines.push(format!("- {} {tool}", stage.icon())),
        }
        self.execution_plan = lines.join("\n");
    }
}

/// Merge a streamed fragment into an accumulating buffer.
///
/// A fragment that starts with or contains the whole buffer is a re-sent,
/// longer copy of the same answer and replaces it; anything else is appended.
pub fn merge_progressive(buffer: &mut String, fragment: &str) {
    if buffer.is_empty() || fragment.starts_with(buffer.as_str()) || fragment.contains(buffer.as_str())
    {
        *buffer = fragment.to_string();
        return;
    }
    let seam_has_space = buffer.ends_with(char::is_whitespace)
        || fragment.starts_with(char::is_whitespace);
    if !seam_has_space {
        buffer.push(' ');
    }
    buffer.push_str(fragment);
}
