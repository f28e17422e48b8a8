//! Interactive chat loop.
//!
//! - `reader` abstracts prompt input (rustyline in production).
//! - `history` persists submitted lines per protocol.
//! - `form` collects follow-up values when the agent asks for them.
//! - `setup` prompts for connection parameters nobody configured.

pub mod form;
pub mod history;
pub mod reader;
pub mod setup;

pub use form::{FormFiller, TerminalForm};
pub use history::{history_path, CommandHistory, HISTORY_DISPLAY_LIMIT};
pub use reader::{LineReader, ReadOutcome, RustylineReader};

use crate::error::TransportError;
use crate::session::Session;
use crate::stream::run_turn;
use crate::transport::AgentTransport;
use crate::tui::settings;
use crate::ui::display::Display;
use crate::ui::render::DisplaySurface;
use serde_json::Value;
use tracing::{debug, warn};

/// Upper bound on follow-up rounds after the initial question.
pub const MAX_FOLLOW_UPS: usize = 5;

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Clear,
    History,
    Empty,
    Message(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "exit" | "quit" => Command::Exit,
        "clear" => Command::Clear,
        "history" => Command::History,
        _ => Command::Message(trimmed.to_string()),
    }
}

/// Why the chat loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// `exit` or `quit`.
    Requested,
    /// Ctrl-C or Ctrl-D at the prompt.
    Interrupted,
}

/// How one question (plus its follow-ups) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// The agent answered without asking for more input.
    Done,
    /// The user abandoned a follow-up form.
    Cancelled,
    /// The agent kept asking past [`MAX_FOLLOW_UPS`].
    LimitReached,
}

/// Ask one question and answer follow-up forms until the agent is satisfied.
pub async fn converse<S>(
    transport: &dyn AgentTransport,
    display: &mut Display<S>,
    session: &Session,
    text: &str,
    form: &mut dyn FormFiller,
) -> Result<FollowUp, TransportError>
where
    S: DisplaySurface + ?Sized + 'static,
{
    let agent_name = session.agent_name();
    let mut message = session.message(text);
    let mut round = 0;
    loop {
        let answer = run_turn(transport, display, &message, &agent_name).await?;
        let metadata = match answer.metadata {
            Some(metadata) if answer.require_user_input && !metadata.input_fields.is_empty() => {
                metadata
            }
            _ => return Ok(FollowUp::Done),
        };
        if round == MAX_FOLLOW_UPS {
            warn!(rounds = round, "follow-up limit reached");
            display.warn("The agent keeps asking for more input; stopping this exchange.");
            return Ok(FollowUp::LimitReached);
        }
        round += 1;

        let Some(values) = form.fill(&metadata) else {
            display.info("Form cancelled; nothing was sent.");
            return Ok(FollowUp::Cancelled);
        };
        debug!(round, fields = values.len(), "sending follow-up values");
        message = session.message(&Value::Object(values).to_string());
    }
}

/// Run the prompt loop until the user leaves.
///
/// Submitted lines are added to `history`; persisting it is left to the
/// caller so that every exit path saves it.
pub async fn run_chat_loop<S>(
    transport: &dyn AgentTransport,
    display: &mut Display<S>,
    session: &Session,
    reader: &mut dyn LineReader,
    history: &mut CommandHistory,
) -> LoopExit
where
    S: DisplaySurface + ?Sized + 'static,
{
    let agent_name = session.agent_name();
    loop {
        let line = match reader.read_line(settings::PROMPT_USER) {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted | ReadOutcome::Eof => {
                display.info("👋 Chat interrupted. Goodbye!");
                return LoopExit::Interrupted;
            }
        };

        match parse_command(&line) {
            Command::Empty => continue,
            Command::Exit => {
                display.info(&format!("👋 Thank you for using {agent_name}. Goodbye!"));
                return LoopExit::Requested;
            }
            Command::Clear => {
                display.clear_screen();
                display.render_banner(session.profile());
            }
            Command::History => show_history(display, history),
            Command::Message(text) => {
                history.push(&text);
                reader.add_history(&text);
                let mut form = TerminalForm::new(&mut *reader, std::io::stdout());
                if let Err(err) = converse(transport, display, session, &text, &mut form).await {
                    display.error(&format!("Agent request failed: {err}"));
                }
            }
        }
    }
}

fn show_history<S>(display: &Display<S>, history: &CommandHistory)
where
    S: DisplaySurface + ?Sized + 'static,
{
    let recent = history.recent(HISTORY_DISPLAY_LIMIT);
    if recent.is_empty() {
        display.info("No history yet.");
        return;
    }
    let offset = history.entries().len() - recent.len();
    for (idx, entry) in recent.iter().enumerate() {
        display.info(&format!("{}: {entry}", offset + idx + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AgentProfile;
    use crate::stream::InputMetadata;
    use crate::testsupport::{
        artifact, completion, QueueTransport, RecordingSurface, ScriptedReader,
    };
    use serde_json::Map;
    use std::sync::Arc;

    fn session() -> Session {
        let profile = AgentProfile {
            name: "petstore".into(),
            ..AgentProfile::default()
        };
        Session::new(profile, "a2a", None)
    }

    fn display() -> (Arc<RecordingSurface>, Display<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        (Arc::clone(&surface), Display::new(surface))
    }

    fn answer(text: &str) -> Vec<crate::types::ProtocolEvent> {
        vec![artifact("complete_result", text), completion()]
    }

    const FORM_REQUEST: &str = r#"{"require_user_input":true,"content":"Need info","metadata":{"input_fields":[{"field_name":"x","field_description":"d"}]}}"#;

    /// Form filler that answers every field with a fixed value.
    struct FixedForm {
        calls: usize,
        value: Option<&'static str>,
    }

    impl FormFiller for FixedForm {
        fn fill(&mut self, metadata: &InputMetadata) -> Option<Map<String, Value>> {
            self.calls += 1;
            let value = self.value?;
            Some(
                metadata
                    .input_fields
                    .iter()
                    .map(|f| (f.field_name.clone(), Value::String(value.into())))
                    .collect(),
            )
        }
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_command(" EXIT "), Command::Exit);
        assert_eq!(parse_command("quit"), Command::Exit);
        assert_eq!(parse_command("Clear"), Command::Clear);
        assert_eq!(parse_command("history"), Command::History);
        assert_eq!(parse_command("   "), Command::Empty);
        assert_eq!(
            parse_command(" list pets "),
            Command::Message("list pets".into())
        );
    }

    #[tokio::test]
    async fn follow_up_values_are_sent_as_json() {
        let transport = QueueTransport::new(vec![answer(FORM_REQUEST), answer("All set.")]);
        let (surface, mut display) = display();
        let mut form = FixedForm {
            calls: 0,
            value: Some("42"),
        };
        let outcome = converse(&transport, &mut display, &session(), "start", &mut form)
            .await
            .expect("converse");
        assert_eq!(outcome, FollowUp::Done);
        assert_eq!(form.calls, 1);

        let sent = transport.sent_texts();
        assert_eq!(sent, vec!["start".to_string(), r#"{"x":"42"}"#.to_string()]);
        let log = surface.log();
        assert!(log.contains(&"panel:Petstore Response:Need info".to_string()));
        assert!(log.contains(&"panel:Petstore Response:All set.".to_string()));
    }

    #[tokio::test]
    async fn cancelled_form_sends_nothing_more() {
        let transport = QueueTransport::new(vec![answer(FORM_REQUEST)]);
        let (_surface, mut display) = display();
        let mut form = FixedForm {
            calls: 0,
            value: None,
        };
        let outcome = converse(&transport, &mut display, &session(), "start", &mut form)
            .await
            .expect("converse");
        assert_eq!(outcome, FollowUp::Cancelled);
        assert_eq!(transport.sent_texts().len(), 1);
    }

    #[tokio::test]
    async fn follow_ups_are_bounded() {
        let turns = (0..=MAX_FOLLOW_UPS + 2)
            .map(|_| answer(FORM_REQUEST))
            .collect();
        let transport = QueueTransport::new(turns);
        let (surface, mut display) = display();
        let mut form = FixedForm {
            calls: 0,
            value: Some("v"),
        };
        let outcome = converse(&transport, &mut display, &session(), "start", &mut form)
            .await
            .expect("converse");
        assert_eq!(outcome, FollowUp::LimitReached);
        assert_eq!(form.calls, MAX_FOLLOW_UPS);
        assert_eq!(transport.sent_texts().len(), MAX_FOLLOW_UPS + 1);
        assert!(surface.log().iter().any(|e| e.starts_with("warn:")));
    }

    #[tokio::test]
    async fn chat_loop_handles_commands_and_messages() {
        let transport = QueueTransport::new(vec![answer("Two pets.")]);
        let (surface, mut display) = display();
        let mut reader = ScriptedReader::new(["", "list pets", "history", "clear", "exit"]);
        let mut history = CommandHistory::default();

        let exit =
            run_chat_loop(&transport, &mut display, &session(), &mut reader, &mut history).await;

        assert_eq!(exit, LoopExit::Requested);
        assert_eq!(history.entries(), ["list pets"]);
        assert_eq!(transport.sent_texts(), vec!["list pets".to_string()]);
        let log = surface.log();
        assert!(log.contains(&"panel:Petstore Response:Two pets.".to_string()));
        assert!(log.contains(&"info:1: list pets".to_string()));
        let clear_at = log.iter().position(|e| e == "clear-screen").expect("clear");
        assert!(log[clear_at + 1].starts_with("panel:Petstore:"));
        assert_eq!(
            log.last().map(String::as_str),
            Some("info:👋 Thank you for using Petstore. Goodbye!")
        );
        assert!(reader.prompts().iter().all(|p| p == settings::PROMPT_USER));
    }

    #[tokio::test]
    async fn chat_loop_reports_failures_and_continues() {
        let transport = QueueTransport::new(Vec::new());
        let (surface, mut display) = display();
        let mut reader = ScriptedReader::new(["hello"]).then(ReadOutcome::Interrupted);
        let mut history = CommandHistory::default();

        let exit =
            run_chat_loop(&transport, &mut display, &session(), &mut reader, &mut history).await;

        assert_eq!(exit, LoopExit::Interrupted);
        let log = surface.log();
        assert!(log
            .iter()
            .any(|e| e.starts_with("error:Agent request failed")));
        assert_eq!(
            log.last().map(String::as_str),
            Some("info:👋 Chat interrupted. Goodbye!")
        );
    }

    #[tokio::test]
    async fn empty_history_says_so() {
        let transport = QueueTransport::new(Vec::new());
        let (surface, mut display) = display();
        let mut reader = ScriptedReader::new(["history"]);
        let mut history = CommandHistory::default();
        run_chat_loop(&transport, &mut display, &session(), &mut reader, &mut history).await;
        assert!(surface.log().contains(&"info:No history yet.".to_string()));
    }
}
