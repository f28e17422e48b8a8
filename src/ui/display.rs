//! Display orchestrator for one chat session.
//!
//! Owns the three mutually exclusive visual regions of a turn: the spinner
//! line, the live region (dashboard panels or plain streamed text), and the
//! final answer panel. All drawing goes through a [`DisplaySurface`], so the
//! orchestration logic is testable without a terminal.

use crate::session::AgentProfile;
use crate::tui::dashboard::{compose_dashboard, compose_plain};
use crate::tui::progress::SpinnerHandoff;
use crate::tui::settings;
use crate::ui::render::DisplaySurface;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Which live region, if any, is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveMode {
    Idle,
    Plain,
    Dashboard,
}

pub struct Display<S: DisplaySurface + ?Sized + 'static> {
    surface: Arc<S>,
    spinner: Option<SpinnerHandoff>,
    live: LiveMode,
    clear_timeout: Duration,
}

impl<S: DisplaySurface + ?Sized + 'static> Display<S> {
    pub fn new(surface: Arc<S>) -> Self {
        Self {
            surface,
            spinner: None,
            live: LiveMode::Idle,
            clear_timeout: settings::SPINNER_CLEAR_TIMEOUT,
        }
    }

    /// Override how long to wait for the spinner to confirm its line is clear.
    pub fn with_clear_timeout(mut self, wait: Duration) -> Self {
        self.clear_timeout = wait;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn live_mode(&self) -> LiveMode {
        self.live
    }

    pub fn spinner_active(&self) -> bool {
        self.spinner.is_some()
    }

    /// Start the waiting spinner unless one is already running.
    pub fn start_spinner(&mut self) {
        if self.spinner.is_none() {
            self.spinner = Some(SpinnerHandoff::spawn(
                Arc::clone(&self.surface),
                settings::PROGRESS_LABEL,
            ));
        }
    }

    /// Stop the spinner and wait (bounded) until its line is cleared.
    ///
    /// When the spinner task does not confirm in time the line is cleared
    /// from here instead, so output never lands on a half-drawn frame.
    pub async fn stop_spinner_and_await_cleared(&mut self) {
        let Some(spinner) = self.spinner.take() else {
            return;
        };
        if !spinner
            .stop_and_await_cleared(self.clear_timeout)
            .await
        {
            debug!("spinner did not confirm clear in time; clearing directly");
            self.surface.clear_spinner();
        }
    }

    /// Switch the live region to the multi-panel dashboard.
    pub fn ensure_live_region(&mut self) {
        self.live = LiveMode::Dashboard;
    }

    /// Redraw the dashboard panels.
    pub fn update_live_region(&mut self, plan: &str, tools: &[&str], streaming: &str) {
        self.ensure_live_region();
        let (columns, rows) = self.surface.size();
        let lines = compose_dashboard(plan, tools, streaming, columns, rows);
        self.surface.draw_live(&lines);
    }

    /// Redraw plain streamed text without panel chrome.
    pub fn update_plain(&mut self, streaming: &str) {
        if self.live == LiveMode::Dashboard {
            // The dashboard already owns the region.
            return;
        }
        self.live = LiveMode::Plain;
        let (columns, rows) = self.surface.size();
        self.surface.draw_live(&compose_plain(streaming, columns, rows));
    }

    /// Tear down whatever live region is on screen.
    pub fn stop_live_region(&mut self) {
        if self.live != LiveMode::Idle {
            self.surface.clear_live();
            self.live = LiveMode::Idle;
        }
    }

    /// Render the final answer panel.
    ///
    /// Returns `false` when nothing was rendered: empty text, or a bare
    /// serialized structure that should never reach the user.
    pub fn render_final(&self, text: &str, agent_name: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            self.surface.warn("Agent returned an empty response.");
            return false;
        }
        if looks_like_raw_structure(text) {
            debug!(payload = text, "refusing to render raw structured output");
            self.surface.warn("Skipping raw byte/dict output.");
            return false;
        }
        let title = format!("{agent_name} {}", settings::TITLE_RESPONSE_SUFFIX);
        self.surface.panel(&title, text);
        true
    }

    /// Render the welcome banner for the connected agent.
    pub fn render_banner(&self, profile: &AgentProfile) {
        self.surface
            .panel(&profile.display_name(), &banner_markdown(profile));
    }

    pub fn info(&self, text: &str) {
        self.surface.info(text);
    }

    pub fn warn(&self, msg: &str) {
        self.surface.warn(msg);
    }

    pub fn error(&self, msg: &str) {
        self.surface.error(msg);
    }

    pub fn clear_screen(&self) {
        self.surface.clear_screen();
    }
}

fn banner_markdown(profile: &AgentProfile) -> String {
    let mut out = format!(
        "🚀 **Welcome to {} CLI**\n\n\
         This agent helps you interact with tools dynamically.\n\
         Type your question and hit enter.\n\
         Type `exit` or `quit` to leave, `clear` to clear the screen, `history` to view chat history.",
        profile.display_name()
    );
    if let Some(description) = profile.description() {
        out.push_str(&format!("\n\n**Skills Description:**\n\n{description}"));
    }
    if !profile.examples.is_empty() {
        out.push_str("\n\n**Example Skills:**\n\n");
        let bullets = profile
            .examples
            .iter()
            .map(|example| format!("- {example}"))
            .collect::<Vec<_>>();
        out.push_str(&bullets.join("\n"));
    }
    out
}

/// Single-line `{...}` payloads, optionally wrapped as a byte string or quoted.
fn looks_like_raw_structure(text: &str) -> bool {
    if text.contains('\n') {
        return false;
    }
    let mut body = text.strip_prefix('b').unwrap_or(text);
    if let Some(rest) = body.strip_prefix(['\'', '"']) {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix(['\'', '"']) {
        body = rest;
    }
    body.starts_with('{') && body.ends_with('}')
}
