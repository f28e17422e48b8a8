//! CLI argument parsing via clap.

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Chat with a remote agent from the terminal.
#[derive(Debug, Parser)]
#[command(name = "agent-chat", version)]
pub struct Args {
    /// Path to config file (default: ./agent-chat.toml or ~/.config/agent-chat/agent-chat.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect to an agent over A2A JSON-RPC with SSE streaming.
    A2a(A2aArgs),
    /// Connect to an agent through a SLIM gateway.
    Slim(SlimArgs),
}

impl Command {
    /// Key naming the per-protocol history file.
    pub fn history_key(&self) -> &'static str {
        match self {
            Self::A2a(_) => "a2a",
            Self::Slim(_) => "slim",
        }
    }

    pub fn debug(&self) -> bool {
        match self {
            Self::A2a(args) => args.debug,
            Self::Slim(args) => args.debug,
        }
    }
}

#[derive(Debug, ClapArgs)]
pub struct A2aArgs {
    /// Agent host name.
    #[arg(long)]
    pub host: Option<String>,

    /// Agent port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Bearer token for the authenticated extended agent card.
    #[arg(long)]
    pub token: Option<String>,

    /// Connect over HTTPS.
    #[arg(long)]
    pub tls: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, ClapArgs)]
pub struct SlimArgs {
    /// Gateway endpoint, e.g. `localhost:46357`.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Remote agent card: URL, inline JSON, file path or agent name.
    #[arg(long = "remote-card")]
    pub remote_card: Option<String>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::{Args, Command};
    use clap::Parser;

    #[test]
    fn a2a_parses_connection_flags() {
        let args = Args::parse_from([
            "agent-chat", "a2a", "--host", "localhost", "--port", "8000", "--tls", "--token", "t",
        ]);
        let Command::A2a(a2a) = &args.command else {
            panic!("expected a2a");
        };
        assert_eq!(a2a.host.as_deref(), Some("localhost"));
        assert_eq!(a2a.port, Some(8000));
        assert!(a2a.tls);
        assert_eq!(a2a.token.as_deref(), Some("t"));
        assert_eq!(args.command.history_key(), "a2a");
        assert!(!args.command.debug());
    }

    #[test]
    fn slim_parses_remote_card_and_global_flags() {
        let args = Args::parse_from([
            "agent-chat",
            "slim",
            "--endpoint",
            "gateway:46357",
            "--remote-card",
            "https://example.com/.well-known/agent.json",
            "--debug",
            "--no-color",
            "--config",
            "custom.toml",
        ]);
        let Command::Slim(slim) = &args.command else {
            panic!("expected slim");
        };
        assert_eq!(slim.endpoint.as_deref(), Some("gateway:46357"));
        assert!(slim.remote_card.is_some());
        assert!(args.command.debug());
        assert!(args.no_color);
        assert_eq!(args.config.as_deref(), Some("custom.toml"));
        assert_eq!(args.command.history_key(), "slim");
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["agent-chat"]).is_err());
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Args::try_parse_from(["agent-chat", "a2a", "--port", "http"]).is_err());
    }
}
