//! Unified error types for the chat client.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors from the agent transport layer (discovery, streaming, single-shot).
#[derive(Debug)]
pub enum TransportError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the agent endpoint.
    Status {
        code: u16,
        body: String,
        retry_after_secs: Option<u64>,
    },
    /// The agent answered with something we could not decode.
    InvalidResponse(String),
    /// The transport has no streaming mode; callers fall back to single-shot.
    StreamingUnsupported(&'static str),
    /// Local file access (agent descriptor loaded from disk).
    Io(std::io::Error),
}

impl TransportError {
    /// Build a status error from an HTTP response code and body.
    pub fn status(code: u16, body: String, retry_after_secs: Option<u64>) -> Self {
        Self::Status {
            code,
            body,
            retry_after_secs,
        }
    }

    /// `Retry-After` hint attached to a status error, in seconds.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Status {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body, .. } => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            Self::StreamingUnsupported(transport) => {
                write!(f, "streaming is not supported by the {transport} transport")
            }
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// ChatError: top-level
// ---------------------------------------------------------------------------

/// Top-level error type for one chat session.
#[derive(Debug)]
pub enum ChatError {
    Config(ConfigError),
    Transport(TransportError),
    /// Interactive input could not be read or was invalid.
    Input(String),
    /// The user cancelled an interactive prompt.
    Cancelled,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Input(msg) => write!(f, "input: {msg}"),
            Self::Cancelled => write!(f, "cancelled by user"),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<ConfigError> for ChatError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TransportError> for ChatError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}
