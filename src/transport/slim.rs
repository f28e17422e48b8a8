//! Pub/sub transport through a SLIM gateway.
//!
//! Messages are routed to the agent by a hierarchical `org/namespace/name`
//! topic. The gateway exposes single-shot JSON-RPC `message/send` at
//! `{endpoint}/{routable_name}`; there is no streaming mode, so turns always
//! use the fallback path.

use super::decode::{extract_response_text, jsonrpc_result};
use super::retry::RetryPolicy;
use super::{build_http_client, ensure_success, AgentTransport, EventStream};
use crate::error::TransportError;
use crate::types::{AgentCard, OutboundMessage};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

pub const DEFAULT_ORG: &str = "cnoe";
pub const DEFAULT_NAMESPACE: &str = "agents";
pub const DEFAULT_LOCAL_NAME: &str = "agent";

/// What `--remote-card` resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCard {
    /// A parsed agent card (from a URL, inline JSON, or a file).
    Card(AgentCard),
    /// A bare identifier (or anything that failed to load).
    Identifier(String),
}

impl RemoteCard {
    pub fn card(&self) -> Option<&AgentCard> {
        match self {
            Self::Card(card) => Some(card),
            Self::Identifier(_) => None,
        }
    }
}

/// Resolve a remote-card argument: http(s) URL, inline JSON, file path, or
/// identifier. Never fails; unloadable input is kept as an identifier.
pub async fn load_remote_card(raw: &str, http: &reqwest::Client) -> RemoteCard {
    let source = raw.trim();
    match try_load_card(source, http).await {
        Ok(Some(card)) => {
            debug!(name = %card.name, "loaded remote agent card");
            RemoteCard::Card(card)
        }
        Ok(None) => {
            debug!(identifier = source, "treating remote card as an identifier");
            RemoteCard::Identifier(source.to_string())
        }
        Err(err) => {
            warn!("failed to load remote agent card: {err}; using it as an identifier");
            RemoteCard::Identifier(source.to_string())
        }
    }
}

async fn try_load_card(
    source: &str,
    http: &reqwest::Client,
) -> Result<Option<AgentCard>, TransportError> {
    let data: Value = if source.starts_with("http://") || source.starts_with("https://") {
        let response = ensure_success(http.get(source).send().await?).await?;
        response.json().await?
    } else if source.starts_with('{') {
        serde_json::from_str(source)?
    } else if Path::new(source).is_file() {
        serde_json::from_str(&std::fs::read_to_string(source)?)?
    } else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_value(data)?))
}

/// Compute the `org/namespace/name` routing topic for the remote agent.
///
/// `SLIM_ORG` and `SLIM_NAMESPACE` replace the defaults; a non-empty
/// `SLIM_ROUTABLE_NAME` replaces the whole result.
pub fn compute_routable_name<F>(subject: &RemoteCard, env_lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = env_lookup("SLIM_ROUTABLE_NAME").filter(|v| !v.trim().is_empty()) {
        return name.trim().to_string();
    }
    let non_empty = |key: &str, fallback: &str| {
        env_lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    };
    let org = non_empty("SLIM_ORG", DEFAULT_ORG);
    let namespace = non_empty("SLIM_NAMESPACE", DEFAULT_NAMESPACE);

    let local = match subject {
        RemoteCard::Card(card) => card.name.clone(),
        RemoteCard::Identifier(raw) => {
            let raw = raw.trim();
            if raw.starts_with("http://") || raw.starts_with("https://") {
                raw.trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            } else {
                raw.to_string()
            }
        }
    };
    let local = local.trim().replace([' ', '/'], "-");
    let local = if local.is_empty() {
        DEFAULT_LOCAL_NAME.to_string()
    } else {
        local
    };
    format!("{org}/{namespace}/{local}")
}

/// Prefix `http://` to endpoints given without a scheme.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

/// Client publishing to one agent topic on a SLIM gateway.
pub struct SlimClient {
    http: reqwest::Client,
    endpoint: String,
    routable_name: String,
    retry_policy: RetryPolicy,
}

impl SlimClient {
    pub fn new(endpoint: &str, routable_name: impl Into<String>, timeout: Duration) -> Self {
        Self::with_retry_policy(endpoint, routable_name, timeout, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        endpoint: &str,
        routable_name: impl Into<String>,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            http: build_http_client(Some(timeout)),
            endpoint: normalize_endpoint(endpoint),
            routable_name: routable_name.into(),
            retry_policy,
        }
    }

    pub fn routable_name(&self) -> &str {
        &self.routable_name
    }

    fn topic_url(&self) -> String {
        format!("{}/{}", self.endpoint, self.routable_name)
    }

    async fn send_once(&self, body: &Value) -> Result<String, TransportError> {
        let response = ensure_success(self.http.post(self.topic_url()).json(body).send().await?).await?;
        let frame = response.json::<Value>().await?;
        Ok(extract_response_text(jsonrpc_result(&frame)?).trim().to_string())
    }
}

#[async_trait]
impl AgentTransport for SlimClient {
    fn name(&self) -> &'static str {
        "slim"
    }

    async fn stream_message(
        &self,
        _message: &OutboundMessage,
    ) -> Result<EventStream, TransportError> {
        Err(TransportError::StreamingUnsupported("slim"))
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<String, TransportError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": uuid::Uuid::new_v4().simple().to_string(),
            "method": "message/send",
            "params": {"message": message},
        });
        debug!(topic = %self.routable_name, "publishing message/send");
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(&body).await {
                Ok(text) => return Ok(text),
                Err(err) if self.retry_policy.should_retry(&err, attempt) => {
                    let delay = self.retry_policy.retry_delay_for(attempt, &err);
                    attempt = attempt.saturating_add(1);
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    fn card(name: &str) -> RemoteCard {
        RemoteCard::Card(AgentCard {
            name: name.to_string(),
            ..AgentCard::default()
        })
    }

    #[test]
    fn routable_name_uses_defaults_and_card_name() {
        assert_eq!(
            compute_routable_name(&card("Jira Agent"), env(&[])),
            "cnoe/agents/Jira-Agent"
        );
    }

    #[test]
    fn routable_name_uses_last_url_segment() {
        let subject = RemoteCard::Identifier("https://host/cards/petstore/".into());
        assert_eq!(compute_routable_name(&subject, env(&[])), "cnoe/agents/petstore");
    }

    #[test]
    fn routable_name_env_overrides() {
        let subject = RemoteCard::Identifier("a/b c".into());
        assert_eq!(
            compute_routable_name(&subject, env(&[("SLIM_ORG", "acme"), ("SLIM_NAMESPACE", "")])),
            "acme/agents/a-b-c"
        );
        assert_eq!(
            compute_routable_name(&subject, env(&[("SLIM_ROUTABLE_NAME", "x/y/z")])),
            "x/y/z"
        );
        assert_eq!(
            compute_routable_name(&RemoteCard::Identifier("  ".into()), env(&[])),
            "cnoe/agents/agent"
        );
    }

    #[test]
    fn endpoint_gets_scheme_when_missing() {
        assert_eq!(normalize_endpoint("localhost:46357"), "http://localhost:46357");
        assert_eq!(normalize_endpoint("https://gw/"), "https://gw");
    }

    #[tokio::test]
    async fn remote_card_loads_inline_json_files_and_identifiers() {
        let http = reqwest::Client::new();
        let inline = load_remote_card(r#"{"name":"inline","skills":[]}"#, &http).await;
        assert_eq!(inline.card().map(|c| c.name.as_str()), Some("inline"));

        let dir = TestTempDir::new("slim-card");
        let path = dir.write_text("card.json", r#"{"name":"from-file"}"#);
        let file = load_remote_card(path.to_str().expect("utf8 path"), &http).await;
        assert_eq!(file.card().map(|c| c.name.as_str()), Some("from-file"));

        let ident = load_remote_card("petstore", &http).await;
        assert_eq!(ident, RemoteCard::Identifier("petstore".into()));

        let broken = load_remote_card("{not json", &http).await;
        assert_eq!(broken, RemoteCard::Identifier("{not json".into()));
    }

    #[tokio::test]
    async fn send_message_posts_to_topic_url_without_streaming() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0u8; 16 * 1024];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let body = r#"{"jsonrpc":"2.0","id":"1","result":{"status":{"message":{"parts":[{"kind":"text","text":"  pong  "}]}}}}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            String::from_utf8_lossy(&buf[..n]).to_string()
        });

        let client = SlimClient::new(&addr.to_string(), "cnoe/agents/echo", Duration::from_secs(3));
        let message = OutboundMessage::user_text("ping", "ctx", None);
        assert!(matches!(
            client.stream_message(&message).await,
            Err(TransportError::StreamingUnsupported("slim"))
        ));
        assert_eq!(client.send_message(&message).await.expect("send"), "pong");
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /cnoe/agents/echo "), "got {request}");
    }
}
