//! Process bootstrap: config resolution, logging, and per-protocol connection.

use crate::cli::{Args, Command};
use agent_chat::config::{base_url, load_config_with_diagnostics, ChatConfig};
use agent_chat::error::ChatError;
use agent_chat::repl::setup::{
    prompt_port, prompt_required, prompt_with_default, DEFAULT_HOST, DEFAULT_PORT,
};
use agent_chat::repl::LineReader;
use agent_chat::session::AgentProfile;
use agent_chat::transport::slim::{compute_routable_name, load_remote_card, RemoteCard};
use agent_chat::transport::{build_http_client, A2aClient, AgentTransport, SlimClient};
use agent_chat::ui::render::DisplaySurface;
use std::io::IsTerminal;
use std::time::Duration;
use tracing::debug;

/// Load file and env config, then apply command-line flags on top.
pub(crate) fn resolve_config(args: &Args) -> Result<(ChatConfig, Vec<String>), ChatError> {
    let loaded = load_config_with_diagnostics(args.config.as_deref())?;
    let mut config = loaded.config;
    apply_cli_overrides(&mut config, args);
    Ok((config, loaded.diagnostics.warnings))
}

pub(crate) fn apply_cli_overrides(config: &mut ChatConfig, args: &Args) {
    if args.no_color {
        config.display.color = false;
    }
    if args.command.debug() {
        config.debug = true;
    }
    match &args.command {
        Command::A2a(a2a) => {
            if let Some(host) = &a2a.host {
                config.a2a.host = Some(host.clone());
            }
            if let Some(port) = a2a.port {
                config.a2a.port = Some(port);
            }
            if let Some(token) = &a2a.token {
                config.a2a.token = Some(token.clone());
            }
            if a2a.tls {
                config.a2a.tls = true;
            }
        }
        Command::Slim(slim) => {
            if let Some(endpoint) = &slim.endpoint {
                config.slim.endpoint = Some(endpoint.clone());
            }
            if let Some(card) = &slim.remote_card {
                config.slim.remote_card = Some(card.clone());
            }
        }
    }
}

/// Default filter directive for the subscriber.
pub(crate) fn default_log_filter(debug: bool) -> &'static str {
    if debug {
        "warn,agent_chat=debug"
    } else {
        "warn"
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the default.
pub(crate) fn init_tracing(debug: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_log_filter(debug)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolve the A2A endpoint, fetch the agent card, and build the client.
///
/// A card fetch failure is fatal.
pub(crate) async fn connect_a2a(
    config: &ChatConfig,
    reader: &mut dyn LineReader,
    surface: &dyn DisplaySurface,
) -> Result<(Box<dyn AgentTransport>, AgentProfile), ChatError> {
    let interactive = config.a2a.host.is_none();
    let host = match &config.a2a.host {
        Some(host) => host.clone(),
        None => prompt_with_default(reader, "Agent host", DEFAULT_HOST)?,
    };
    let port = match config.a2a.port {
        Some(port) => port,
        None => prompt_port(reader, surface, DEFAULT_PORT)?,
    };
    let token = match &config.a2a.token {
        Some(token) => Some(token.clone()),
        None if interactive && std::io::stdin().is_terminal() => prompt_token()?,
        None => None,
    };

    let url = base_url(&host, port, config.a2a.tls);
    debug!(base_url = %url, "fetching agent card");
    let client = A2aClient::new(
        &url,
        token,
        Duration::from_secs(config.network.timeout_secs),
    );
    let card = client.fetch_agent_card().await?;
    Ok((Box::new(client), AgentProfile::from_card(&card)))
}

fn prompt_token() -> Result<Option<String>, ChatError> {
    let token = rpassword::prompt_password("Bearer token (optional, Enter to skip): ")
        .map_err(|err| ChatError::Input(format!("failed to read token: {err}")))?;
    let token = token.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}

/// Resolve the gateway endpoint and remote card, then build the client.
pub(crate) async fn connect_slim(
    config: &ChatConfig,
    reader: &mut dyn LineReader,
    surface: &dyn DisplaySurface,
) -> Result<(Box<dyn AgentTransport>, AgentProfile), ChatError> {
    let endpoint = match &config.slim.endpoint {
        Some(endpoint) => endpoint.clone(),
        None => prompt_required(reader, surface, "SLIM endpoint")?,
    };
    let raw_card = match &config.slim.remote_card {
        Some(card) => card.clone(),
        None => prompt_required(reader, surface, "Remote agent card (URL, JSON, file or name)")?,
    };

    let timeout = Duration::from_secs(config.network.timeout_secs);
    let remote = load_remote_card(&raw_card, &build_http_client(Some(timeout))).await;
    let routable_name = compute_routable_name(&remote, |key| config.slim.naming_var(key));
    surface.info(&format!("Publishing to topic {routable_name}"));

    let profile = match &remote {
        RemoteCard::Card(card) => AgentProfile::from_card(card),
        RemoteCard::Identifier(_) => AgentProfile {
            name: routable_name
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
            ..AgentProfile::default()
        },
    };
    let client = SlimClient::new(&endpoint, routable_name, timeout);
    Ok((Box::new(client), profile))
}
