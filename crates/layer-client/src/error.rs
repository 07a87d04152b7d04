//! Error types for the Layer client
//!
//! Failures fall into two groups. Per-attempt failures ([`AttemptError`]) are
//! collected by the backoff executor and only surface wrapped in an
//! [`AggregatedFailure`] once the attempt budget is spent. Everything else
//! (request construction, decoding, unexpected-but-successful statuses) is
//! reported immediately through [`Error`] and never retried.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a Layer client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Layer client.
#[derive(Debug, Error)]
pub enum Error {
    /// Every attempt allowed by the backoff policy failed.
    #[error("{0}")]
    Exhausted(#[from] AggregatedFailure),

    /// The executor accepted the response but the operation expects a
    /// different status (for example a 3xx where a 201 was required).
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body snapshot
        body: String,
    },

    /// The response body could not be decoded into the expected resource.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid URL provided or constructed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Check whether retrying the whole operation later could plausibly help.
    ///
    /// Only exhausted backoff runs qualify, and only when the last attempt was
    /// a transport failure, a 5xx, a 408 or a 429. Construction, decode and
    /// status-mismatch errors will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Exhausted(failure) => match failure.attempts().last() {
                Some(AttemptError::Transport { .. }) => true,
                Some(AttemptError::Status(err)) => {
                    err.status >= 500 || err.status == 408 || err.status == 429
                }
                None => false,
            },
            _ => false,
        }
    }

    /// The aggregated failure, if this error came from an exhausted backoff run.
    pub fn as_aggregated(&self) -> Option<&AggregatedFailure> {
        match self {
            Error::Exhausted(failure) => Some(failure),
            _ => None,
        }
    }
}

/// An HTTP response whose status fell outside the accepted range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    /// Zero-based attempt index that produced this response
    pub attempt: u32,
    /// HTTP status code
    pub status: u16,
    /// Response body, read to completion
    pub body: String,
    /// Time between sending the request and receiving the full response
    pub latency: Duration,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request to Layer failed!\nStatus Code: {}\nResponse Body: {}\nLatency: {}ms",
            self.status,
            self.body,
            self.latency.as_millis()
        )
    }
}

impl std::error::Error for HttpStatusError {}

/// The failure of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// No response was obtained (connection, DNS, TLS, timeout, body read).
    #[error("Request to Layer failed!\nTransport Error: {message}\nLatency: {}ms", .latency.as_millis())]
    Transport {
        /// Zero-based attempt index
        attempt: u32,
        /// Rendered error chain from the transport
        message: String,
        /// Time spent before the transport gave up
        latency: Duration,
    },

    /// A response was obtained but its status was not accepted.
    #[error(transparent)]
    Status(HttpStatusError),
}

impl AttemptError {
    /// Zero-based index of the attempt that failed.
    pub fn attempt(&self) -> u32 {
        match self {
            AttemptError::Transport { attempt, .. } => *attempt,
            AttemptError::Status(err) => err.attempt,
        }
    }

    /// Latency of the failed attempt.
    pub fn latency(&self) -> Duration {
        match self {
            AttemptError::Transport { latency, .. } => *latency,
            AttemptError::Status(err) => err.latency,
        }
    }

    /// Status code, if a response was obtained.
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptError::Transport { .. } => None,
            AttemptError::Status(err) => Some(err.status),
        }
    }
}

/// Ordered list of attempt failures, produced when every attempt failed.
///
/// The textual rendering joins each attempt's message with a blank line,
/// in attempt order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregatedFailure {
    errors: Vec<AttemptError>,
}

impl AggregatedFailure {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the failure of the next attempt.
    pub fn push(&mut self, error: AttemptError) {
        self.errors.push(error);
    }

    /// Failures in attempt order.
    pub fn attempts(&self) -> &[AttemptError] {
        &self.errors
    }

    /// Number of failed attempts.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Status code of the most recent attempt that produced a response.
    pub fn last_status(&self) -> Option<u16> {
        self.errors.iter().rev().find_map(AttemptError::status)
    }

    /// True when every attempt got a 4xx response.
    ///
    /// A cluster of client errors usually means the request itself is wrong
    /// and retrying at a higher level will not help.
    pub fn is_client_error_cluster(&self) -> bool {
        !self.errors.is_empty()
            && self
                .errors
                .iter()
                .all(|e| matches!(e.status(), Some(s) if (400..500).contains(&s)))
    }
}

impl fmt::Display for AggregatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedFailure {}

impl IntoIterator for AggregatedFailure {
    type Item = AttemptError;
    type IntoIter = std::vec::IntoIter<AttemptError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
