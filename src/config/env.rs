//! Environment-variable overrides.
//!
//! Every lookup goes through an injected `env_lookup` closure so tests never
//! touch the process environment. Empty values count as unset.

use crate::error::ConfigError;

use super::types::non_empty;
use super::ChatConfig;

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut ChatConfig,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let var = |name: &str| non_empty(env_lookup(name));

    if let Some(host) = var("A2A_HOST") {
        config.a2a.host = Some(host);
    }
    if let Some(port) = var("A2A_PORT") {
        let parsed = port.parse::<u16>().ok().filter(|p| *p > 0).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "invalid A2A_PORT value `{port}`: expected a port number between 1 and 65535"
            ))
        })?;
        config.a2a.port = Some(parsed);
    }
    if let Some(tls) = var("A2A_TLS") {
        config.a2a.tls = parse_flag("A2A_TLS", &tls)?;
    }
    if let Some(token) = var("A2A_TOKEN") {
        config.a2a.token = Some(token);
    }
    if let Some(debug) = var("A2A_DEBUG_CLIENT") {
        config.debug = parse_flag("A2A_DEBUG_CLIENT", &debug)?;
    }

    if let Some(endpoint) = var("SLIM_ENDPOINT") {
        config.slim.endpoint = Some(endpoint);
    }
    if let Some(card) = var("SLIM_REMOTE_CARD") {
        config.slim.remote_card = Some(card);
    }
    if let Some(org) = var("SLIM_ORG") {
        config.slim.org = Some(org);
    }
    if let Some(namespace) = var("SLIM_NAMESPACE") {
        config.slim.namespace = Some(namespace);
    }
    if let Some(name) = var("SLIM_ROUTABLE_NAME") {
        config.slim.routable_name = Some(name);
    }

    if let Some(trace_id) = var("CNOE_TRACE_ID") {
        config.trace_id = Some(trace_id);
    }
    if let Some(timeout) = var("AGENT_CHAT_TIMEOUT_SECS") {
        // Clamp to at least 1 second to avoid "no-timeout" accidental behavior.
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid AGENT_CHAT_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.network.timeout_secs = parsed.max(1);
    }
    Ok(())
}

/// Parse a boolean-ish env flag (`true/false`, `1/0`, `yes/no`, `on/off`).
pub(super) fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!(
            "invalid {name} value `{raw}`: expected true or false"
        ))),
    }
}
