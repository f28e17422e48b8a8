//! One user turn: stream, reduce, fall back, render.

use super::accumulator::{Refresh, TurnAccumulator};
use super::sanitize::{collapse_blank_lines, sanitize};
use super::structured::{self, ParsedAnswer};
use crate::error::TransportError;
use crate::transport::AgentTransport;
use crate::types::OutboundMessage;
use crate::ui::display::Display;
use crate::ui::render::DisplaySurface;
use futures::StreamExt;
use tracing::debug;

/// Send `message`, reduce the agent's answer, and render it.
///
/// Streaming is tried first; any error while opening or reading the stream
/// falls back to one single-shot request on the same transport. Only a
/// failure of that fallback is returned.
pub async fn run_turn<S>(
    transport: &dyn AgentTransport,
    display: &mut Display<S>,
    message: &OutboundMessage,
    agent_name: &str,
) -> Result<ParsedAnswer, TransportError>
where
    S: DisplaySurface + ?Sized + 'static,
{
    display.start_spinner();
    let streamed = stream_answer(transport, display, message).await;
    let final_text = match streamed {
        Ok(text) => text,
        Err(err) => {
            debug!(transport = transport.name(), "streaming failed ({err}); sending single-shot");
            display.stop_live_region();
            match transport.send_message(message).await {
                Ok(text) => collapse_blank_lines(&sanitize(&text)),
                Err(err) => {
                    display.stop_spinner_and_await_cleared().await;
                    return Err(err);
                }
            }
        }
    };

    display.stop_spinner_and_await_cleared().await;
    display.stop_live_region();

    let answer = structured::parse(&final_text);
    debug!(
        require_user_input = answer.require_user_input,
        chars = answer.content.len(),
        "turn finished"
    );
    display.render_final(&answer.content, agent_name);
    Ok(answer)
}

async fn stream_answer<S>(
    transport: &dyn AgentTransport,
    display: &mut Display<S>,
    message: &OutboundMessage,
) -> Result<String, TransportError>
where
    S: DisplaySurface + ?Sized + 'static,
{
    let mut events = transport.stream_message(message).await?;
    let mut acc = TurnAccumulator::new();

    while let Some(event) = events.next().await {
        let event = event?;
        let step = acc.ingest(&event);
        debug!(event = event.label(), phase = ?acc.phase(), "event");

        if step.stop_spinner {
            display.stop_spinner_and_await_cleared().await;
        }
        match step.refresh {
            Refresh::Dashboard => {
                let panels = acc.panels();
                display.update_live_region(panels.plan, &panels.tools, panels.streaming);
            }
            Refresh::Plain => display.update_plain(acc.buffer()),
            Refresh::None => {}
        }
        if step.complete {
            break;
        }
    }

    debug!(events = acc.events_seen(), "stream finished");
    Ok(acc.finalize())
}
