//! Transport boundary
//!
//! The backoff executor only needs to send a fully formed request and get back
//! a status, headers and body. [`Transport`] captures that capability so the
//! executor can be driven by `reqwest` in production and by scripted
//! transports in tests.

use super::PreparedRequest;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::fmt;
use std::time::Duration;

/// A response as seen by the transport, with the body read to completion.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Full response body
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Capability to send one HTTP request.
///
/// Implementations must be safe to share between concurrent operations; they
/// hold no per-call state. Any failure to obtain a complete response is a
/// transport error and is reported as `Err`.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send the request once and read the whole response body.
    async fn send(&self, request: &PreparedRequest) -> anyhow::Result<TransportResponse>;

    /// Transport name for debugging/logging.
    fn name(&self) -> &'static str;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("layer-client-rust/{}", crate::VERSION))
            .build()
            .map_err(|e| crate::Error::HttpClient(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> anyhow::Result<TransportResponse> {
        let mut req = self
            .http_client
            .request(request.method().clone(), request.url().as_str())
            .headers(request.headers().clone());

        // Bytes clones share the buffer, so every attempt sees the full body.
        if let Some(body) = request.body() {
            req = req.body(body.clone());
        }

        let resp = req.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
