//! Configuration data model.
//!
//! `FileConfig` mirrors the TOML file with every field optional; `ChatConfig`
//! is the resolved runtime view after defaults and environment overrides.

use serde::Deserialize;

use super::defaults::DEFAULT_TIMEOUT_SECS;

/// Resolved runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatConfig {
    pub a2a: A2aConfig,
    pub slim: SlimConfig,
    pub display: DisplayConfig,
    pub network: NetworkConfig,
    /// Enable debug logging for this crate.
    pub debug: bool,
    /// Trace id attached to every outbound message when set.
    pub trace_id: Option<String>,
}

/// Connection settings for the JSON-RPC agent protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct A2aConfig {
    /// Host name; prompted for when unset.
    pub host: Option<String>,
    /// TCP port; prompted for when unset.
    pub port: Option<u16>,
    pub tls: bool,
    /// Bearer token for the authenticated extended card.
    pub token: Option<String>,
}

impl A2aConfig {
    /// Base URL built from host, port and scheme, once both are known.
    pub fn base_url(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        let port = self.port?;
        Some(base_url(host, port, self.tls))
    }
}

/// `http(s)://host:port`.
pub fn base_url(host: &str, port: u16, tls: bool) -> String {
    let scheme = if tls { "https" } else { "http" };
    format!("{scheme}://{}:{port}", host.trim())
}

/// Connection settings for the pub/sub gateway protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlimConfig {
    pub endpoint: Option<String>,
    /// Remote card: URL, inline JSON, file path or bare identifier.
    pub remote_card: Option<String>,
    pub org: Option<String>,
    pub namespace: Option<String>,
    pub routable_name: Option<String>,
}

impl SlimConfig {
    /// Topic-naming variables keyed by their environment names.
    pub fn naming_var(&self, key: &str) -> Option<String> {
        match key {
            "SLIM_ORG" => self.org.clone(),
            "SLIM_NAMESPACE" => self.namespace.clone(),
            "SLIM_ROUTABLE_NAME" => self.routable_name.clone(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Enable ANSI color/style output.
    pub color: bool,
    /// Persist the per-protocol command history file.
    pub persist_history: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            persist_history: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Timeout for non-streaming agent requests.
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Non-fatal findings collected while loading config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    pub warnings: Vec<String>,
}

/// Loaded config plus diagnostics and the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ChatConfig,
    pub diagnostics: ConfigDiagnostics,
    pub source: Option<std::path::PathBuf>,
}

// ---------------------------------------------------------------------------
// File representation
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileConfig {
    #[serde(default)]
    pub a2a: FileA2a,
    #[serde(default)]
    pub slim: FileSlim,
    #[serde(default)]
    pub display: FileDisplay,
    #[serde(default)]
    pub network: FileNetwork,
    pub debug: Option<bool>,
    pub trace_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileA2a {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<bool>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileSlim {
    pub endpoint: Option<String>,
    pub remote_card: Option<String>,
    pub org: Option<String>,
    pub namespace: Option<String>,
    pub routable_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileDisplay {
    pub color: Option<bool>,
    pub persist_history: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileNetwork {
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Overlay file values on the built-in defaults.
    pub(super) fn resolve(self, diagnostics: &mut ConfigDiagnostics) -> ChatConfig {
        let defaults = ChatConfig::default();
        let timeout_secs = match self.network.timeout_secs {
            Some(0) => {
                diagnostics
                    .warnings
                    .push("`network.timeout_secs = 0` is not allowed; using 1 second.".into());
                1
            }
            Some(secs) => secs,
            None => defaults.network.timeout_secs,
        };
        ChatConfig {
            a2a: A2aConfig {
                host: non_empty(self.a2a.host),
                port: self.a2a.port,
                tls: self.a2a.tls.unwrap_or(defaults.a2a.tls),
                token: non_empty(self.a2a.token),
            },
            slim: SlimConfig {
                endpoint: non_empty(self.slim.endpoint),
                remote_card: non_empty(self.slim.remote_card),
                org: non_empty(self.slim.org),
                namespace: non_empty(self.slim.namespace),
                routable_name: non_empty(self.slim.routable_name),
            },
            display: DisplayConfig {
                color: self.display.color.unwrap_or(defaults.display.color),
                persist_history: self
                    .display
                    .persist_history
                    .unwrap_or(defaults.display.persist_history),
            },
            network: NetworkConfig { timeout_secs },
            debug: self.debug.unwrap_or(defaults.debug),
            trace_id: non_empty(self.trace_id),
        }
    }
}

pub(super) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
