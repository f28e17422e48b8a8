//! Agent transports.
//!
//! Two wire protocols share one interface:
//! - `a2a`: JSON-RPC over HTTP with SSE streaming (`message/stream`).
//! - `slim`: pub/sub routing through a gateway; single-shot only.
//!
//! Frame decoding lives in `decode`, SSE framing in `sse`, and the retry
//! policy for non-streaming calls in `retry`.

use crate::error::TransportError;
use crate::textutil::truncate_with_suffix_by_bytes;
use crate::types::{OutboundMessage, ProtocolEvent};
use async_trait::async_trait;
use futures::Stream;
use reqwest::header::HeaderMap;
use std::pin::Pin;

pub mod a2a;
pub mod decode;
pub mod retry;
pub mod slim;
pub mod sse;

pub use a2a::A2aClient;
pub use slim::SlimClient;

/// Decoded streaming events for one turn.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ProtocolEvent, TransportError>> + Send>>;

/// Minimal agent interface used by the turn driver.
///
/// Tests provide scripted implementations without network calls.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Short protocol name for logs and history keys.
    fn name(&self) -> &'static str;

    /// Open a streaming exchange for one user message.
    async fn stream_message(&self, message: &OutboundMessage)
        -> Result<EventStream, TransportError>;

    /// Send one message and wait for the complete answer text.
    async fn send_message(&self, message: &OutboundMessage) -> Result<String, TransportError>;
}

/// Error bodies longer than this are cut before they reach the user.
const MAX_ERROR_BODY_BYTES: usize = 512;

/// Read a numeric `Retry-After` header, in seconds.
pub(crate) fn parse_retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Turn a non-2xx response into a status error.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, TransportError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let retry_after_secs = parse_retry_after_secs(response.headers());
    let body = response.text().await.unwrap_or_default();
    let body = truncate_with_suffix_by_bytes(body.trim(), MAX_ERROR_BODY_BYTES, "...[truncated]");
    Err(TransportError::status(status, body, retry_after_secs))
}

/// Build an HTTP client with timeout applied.
pub fn build_http_client(timeout: Option<std::time::Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().connect_timeout(std::time::Duration::from_secs(10));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    // Fall back to reqwest defaults if builder creation fails for any reason.
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, RETRY_AFTER};

    #[test]
    fn retry_after_accepts_whole_seconds_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after_secs(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 7 "));
        assert_eq!(parse_retry_after_secs(&headers), Some(7));
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after_secs(&headers), None);
    }
}
