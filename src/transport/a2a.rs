//! JSON-RPC over HTTP transport with SSE streaming.

use super::decode::{self, extract_response_text, jsonrpc_result};
use super::retry::RetryPolicy;
use super::sse::SseDecoder;
use super::{build_http_client, ensure_success, AgentTransport, EventStream};
use crate::error::TransportError;
use crate::types::{AgentCard, OutboundMessage};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Well-known path of the public agent card.
pub const PUBLIC_CARD_PATH: &str = "/.well-known/agent.json";
/// Path of the authenticated extended agent card.
pub const EXTENDED_CARD_PATH: &str = "/agent/authenticatedExtendedCard";

/// Client for one remote agent.
pub struct A2aClient {
    http: reqwest::Client,
    /// Streaming requests stay open for the whole turn; only connects time out.
    stream_http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retry_policy: RetryPolicy,
}

impl A2aClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        Self::with_retry_policy(base_url, token, timeout, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            http: build_http_client(Some(timeout)),
            stream_http: build_http_client(None),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
            retry_policy,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the agent card, preferring the authenticated extended card when
    /// the public card advertises one. A failed extended fetch keeps the
    /// public card.
    pub async fn fetch_agent_card(&self) -> Result<AgentCard, TransportError> {
        let public = self.get_card(PUBLIC_CARD_PATH, false).await?;
        if !public.supports_authenticated_extended_card {
            debug!("agent card does not advertise an extended card");
            return Ok(public);
        }
        match self.get_card(EXTENDED_CARD_PATH, true).await {
            Ok(extended) => {
                debug!(name = %extended.name, "using authenticated extended agent card");
                Ok(extended)
            }
            Err(err) => {
                warn!("failed to fetch extended agent card: {err}; using public card");
                Ok(public)
            }
        }
    }

    async fn get_card(&self, path: &str, authenticated: bool) -> Result<AgentCard, TransportError> {
        let url = format!("{}{path}", self.base_url);
        let mut attempt: u32 = 0;
        loop {
            let mut req = self.http.get(&url);
            if authenticated {
                req = self.authorize(req);
            }
            let result = match req.send().await {
                Ok(response) => match ensure_success(response).await {
                    Ok(response) => response.json::<AgentCard>().await.map_err(TransportError::from),
                    Err(err) => Err(err),
                },
                Err(err) => Err(err.into()),
            };
            match result {
                Ok(card) => return Ok(card),
                Err(err) if self.retry_policy.should_retry(&err, attempt) => {
                    let delay = self.retry_policy.retry_delay_for(attempt, &err);
                    debug!(%url, attempt, ?delay, "retrying agent card fetch: {err}");
                    attempt = attempt.saturating_add(1);
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send_once(&self, body: &Value) -> Result<String, TransportError> {
        let req = self.authorize(self.http.post(&self.base_url).json(body));
        let response = ensure_success(req.send().await?).await?;
        let frame = response.json::<Value>().await?;
        let result = jsonrpc_result(&frame)?;
        Ok(extract_response_text(result))
    }
}

fn rpc_request(method: &str, message: &OutboundMessage) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": uuid::Uuid::new_v4().simple().to_string(),
        "method": method,
        "params": {"message": message},
    })
}

#[async_trait]
impl AgentTransport for A2aClient {
    fn name(&self) -> &'static str {
        "a2a"
    }

    async fn stream_message(
        &self,
        message: &OutboundMessage,
    ) -> Result<EventStream, TransportError> {
        let body = rpc_request("message/stream", message);
        let req = self
            .authorize(self.stream_http.post(&self.base_url))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body);
        let response = ensure_success(req.send().await?).await?;

        let is_sse = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/event-stream"));
        if !is_sse {
            // Some agents answer a streaming call with one plain JSON-RPC frame.
            let payload = response.text().await?;
            debug!("streaming call answered without SSE framing");
            return Ok(Box::pin(futures::stream::once(async move {
                decode::decode_frame(&payload)
            })));
        }
        Ok(sse_events(response.bytes_stream()))
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<String, TransportError> {
        let body = rpc_request("message/send", message);
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(&body).await {
                Ok(text) => return Ok(text),
                Err(err) if self.retry_policy.should_retry(&err, attempt) => {
                    let delay = self.retry_policy.retry_delay_for(attempt, &err);
                    debug!(attempt, ?delay, "retrying message/send: {err}");
                    attempt = attempt.saturating_add(1);
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

struct SseFrames<B, E> {
    bytes: Pin<Box<dyn Stream<Item = Result<B, E>> + Send>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

/// Adapt a byte stream carrying SSE into decoded protocol events.
fn sse_events<S, B, E>(bytes: S) -> EventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<TransportError> + Send + 'static,
{
    let state = SseFrames {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };
    Box::pin(futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(payload) = state.pending.pop_front() {
                return Some((decode::decode_frame(&payload), state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let payloads = state.decoder.feed(chunk.as_ref());
                    state.pending.extend(payloads);
                }
                Some(Err(err)) => {
                    state.finished = true;
                    return Some((Err(err.into()), state));
                }
                None => {
                    state.finished = true;
                    let payloads = state.decoder.finish();
                    state.pending.extend(payloads);
                }
            }
        }
    }))
}
