//! Application entry orchestration for the agent-chat CLI.

use crate::app::startup::{connect_a2a, connect_slim, init_tracing, resolve_config};
use crate::cli::{Args, Command};
use agent_chat::config::ChatConfig;
use agent_chat::error::ChatError;
use agent_chat::repl::{history_path, run_chat_loop, CommandHistory, RustylineReader};
use agent_chat::session::Session;
use agent_chat::tui::Renderer;
use agent_chat::ui::display::Display;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Run one interactive chat session to completion.
pub(crate) async fn run(args: Args) -> Result<(), ChatError> {
    let (config, warnings) = resolve_config(&args)?;
    init_tracing(config.debug);
    let renderer = Arc::new(Renderer::new(config.display.color));
    for warning in &warnings {
        renderer.warn(warning);
    }

    let history_key = args.command.history_key();
    let history_file = config
        .display
        .persist_history
        .then(|| history_path(history_key))
        .flatten();
    let mut history = load_history(history_file.as_ref(), &renderer);
    let mut reader = RustylineReader::new(history.entries())
        .map_err(|err| ChatError::Input(format!("failed to start line editor: {err}")))?;

    let result = chat(&args, &config, &renderer, &mut reader, &mut history).await;

    if let Some(path) = &history_file {
        if let Err(err) = history.save(path) {
            renderer.warn(&format!("Could not save history file: {err}"));
        }
    }
    result
}

/// Connect, show the banner, and run the prompt loop.
async fn chat(
    args: &Args,
    config: &ChatConfig,
    renderer: &Arc<Renderer>,
    reader: &mut RustylineReader,
    history: &mut CommandHistory,
) -> Result<(), ChatError> {
    let (transport, profile) = match &args.command {
        Command::A2a(_) => connect_a2a(config, reader, renderer.as_ref()).await?,
        Command::Slim(_) => connect_slim(config, reader, renderer.as_ref()).await?,
    };
    let session = Session::new(profile, args.command.history_key(), config.trace_id.clone());
    debug!(
        transport = transport.name(),
        context_id = session.context_id(),
        "session started"
    );

    let mut display = Display::new(Arc::clone(renderer));
    display.render_banner(session.profile());
    let exit = run_chat_loop(transport.as_ref(), &mut display, &session, reader, history).await;
    debug!(?exit, "chat loop finished");
    Ok(())
}

fn load_history(path: Option<&PathBuf>, renderer: &Renderer) -> CommandHistory {
    let Some(path) = path else {
        return CommandHistory::default();
    };
    CommandHistory::load(path).unwrap_or_else(|err| {
        renderer.warn(&format!("Could not load history file: {err}"));
        CommandHistory::default()
    })
}
