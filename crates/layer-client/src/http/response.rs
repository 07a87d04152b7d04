//! HTTP response handling

use crate::error::Error;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Statuses an operation accepts once the executor has returned a response.
///
/// The executor's own success range is wider than what most operations
/// consider a valid answer, so each operation narrows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Any 2xx status.
    Success,
    /// One of the listed status codes.
    Codes(&'static [u16]),
}

impl Expect {
    /// 200 or 201.
    pub const OK_OR_CREATED: Expect = Expect::Codes(&[200, 201]);

    /// 201 only.
    pub const CREATED: Expect = Expect::Codes(&[201]);

    /// Whether the status satisfies this expectation.
    pub fn matches(self, status: StatusCode) -> bool {
        match self {
            Expect::Success => status.is_success(),
            Expect::Codes(codes) => codes.contains(&status.as_u16()),
        }
    }
}

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    attempts: u32,
    latency: Duration,
}

impl Response {
    /// Create a new response.
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        attempts: u32,
        latency: Duration,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            attempts,
            latency,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Attempts it took to get this response (1 if no retries).
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Number of retries taken for this request (0 if no retries).
    pub fn retries_taken(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    /// Latency of the successful attempt.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(Error::Decode)
    }

    /// Check the status against what the operation accepts.
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedStatus`] with the body snapshot on mismatch.
    pub fn expect(self, expect: Expect) -> Result<Self, Error> {
        if expect.matches(self.status) {
            Ok(self)
        } else {
            Err(Error::UnexpectedStatus {
                status: self.status.as_u16(),
                body: self.text(),
            })
        }
    }

    /// Check the status and decode the body in one step.
    ///
    /// This is the helper every resource method goes through.
    pub fn parse_result<T: DeserializeOwned>(self, expect: Expect) -> Result<T, Error> {
        self.expect(expect)?.json()
    }
}
