//! Retry policy for single-shot sends and agent-card fetches.

use crate::error::TransportError;
use std::time::Duration;

/// Bounded exponential-backoff retry policy.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Upper bound on total attempts, including the initial request.
    pub max_attempts: u32,
    /// Base delay used for exponential backoff.
    pub initial_backoff: Duration,
    /// Maximum allowed delay between retry attempts.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Decide whether another retry attempt should be scheduled.
    pub fn should_retry(&self, err: &TransportError, attempt: u32) -> bool {
        if attempt.saturating_add(1) >= self.max_attempts {
            return false;
        }
        match err {
            TransportError::Http(inner) => inner.is_timeout() || inner.is_connect(),
            TransportError::Status { code, .. } => *code == 429 || (500..=599).contains(code),
            TransportError::InvalidResponse(_)
            | TransportError::StreamingUnsupported(_)
            | TransportError::Io(_) => false,
        }
    }

    /// Compute retry delay, respecting `Retry-After` when present.
    pub fn retry_delay_for(&self, attempt: u32, err: &TransportError) -> Duration {
        if let Some(seconds) = err.retry_after_secs() {
            return Duration::from_secs(seconds.clamp(1, 300));
        }
        let pow = 2u32.saturating_pow(attempt);
        let millis = self
            .initial_backoff
            .as_millis()
            .saturating_mul(pow as u128)
            .min(self.max_backoff.as_millis());
        Duration::from_millis(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_rate_limits_and_server_errors_only() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&TransportError::status(429, String::new(), None), 0));
        assert!(policy.should_retry(&TransportError::status(503, String::new(), None), 1));
        assert!(!policy.should_retry(&TransportError::status(404, String::new(), None), 0));
        assert!(!policy.should_retry(&TransportError::InvalidResponse("x".into()), 0));
    }

    #[test]
    fn stops_at_max_attempts() {
        let policy = RetryPolicy::default();
        let err = TransportError::status(500, String::new(), None);
        assert!(!policy.should_retry(&err, 2));
        assert!(!RetryPolicy::none().should_retry(&err, 0));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(300),
        };
        let err = TransportError::status(500, String::new(), None);
        assert_eq!(policy.retry_delay_for(0, &err), Duration::from_millis(100));
        assert_eq!(policy.retry_delay_for(1, &err), Duration::from_millis(200));
        assert_eq!(policy.retry_delay_for(5, &err), Duration::from_millis(300));
    }

    #[test]
    fn retry_after_header_wins() {
        let policy = RetryPolicy::default();
        let err = TransportError::status(429, String::new(), Some(2));
        assert_eq!(policy.retry_delay_for(0, &err), Duration::from_secs(2));
    }
}
