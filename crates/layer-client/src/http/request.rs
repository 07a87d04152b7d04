//! HTTP request builder

use crate::error::{Error, Result};
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use url::Url;

/// Header used to tunnel PATCH semantics through a POST.
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// Content type for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type for patch (edit instruction) bodies.
pub const PATCH_CONTENT_TYPE: &str = "application/vnd.layer-patch+json";

/// What an operation does to the remote resource.
///
/// This decides the wire method, whether the method-override header is sent,
/// and which content type a body carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Read a resource or collection (GET).
    Fetch,
    /// Create a resource or trigger an action (POST).
    Create,
    /// Replace a resource wholesale (PUT).
    Replace,
    /// Apply edit instructions (POST with `X-HTTP-Method-Override: PATCH`).
    Patch,
    /// Remove a resource (DELETE).
    Delete,
}

impl RequestKind {
    /// Method sent on the wire.
    pub fn wire_method(self) -> Method {
        match self {
            RequestKind::Fetch => Method::GET,
            RequestKind::Create | RequestKind::Patch => Method::POST,
            RequestKind::Replace => Method::PUT,
            RequestKind::Delete => Method::DELETE,
        }
    }

    /// Method the server should apply, if different from the wire method.
    pub fn method_override(self) -> Option<&'static str> {
        match self {
            RequestKind::Patch => Some("PATCH"),
            _ => None,
        }
    }

    /// Content type for a body of this kind.
    pub fn content_type(self) -> &'static str {
        match self {
            RequestKind::Patch => PATCH_CONTENT_TYPE,
            _ => JSON_CONTENT_TYPE,
        }
    }
}

/// Versioned media type selected by the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    /// Conversations, messages and identities.
    #[default]
    Resource,
    /// Webhook management endpoints.
    Webhooks,
}

impl MediaType {
    /// Render the `Accept` header value for an API version.
    pub fn accept(self, version: &str) -> String {
        match self {
            MediaType::Resource => format!("application/vnd.layer+json; version={}", version),
            MediaType::Webhooks => {
                format!("application/vnd.layer.webhooks+json; version={}", version)
            }
        }
    }
}

/// A fully formed request, ready to be sent any number of times.
///
/// The body is encoded once into an immutable buffer; every attempt gets an
/// independent view of the same bytes.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    kind: RequestKind,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl PreparedRequest {
    /// Operation kind this request was built for.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Wire method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Encoded body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

/// Builder for HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    kind: RequestKind,
    url: Url,
    media_type: MediaType,
    api_version: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(kind: RequestKind, url: Url) -> Self {
        Self {
            kind,
            url,
            media_type: MediaType::Resource,
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Select the versioned media type for the `Accept` header.
    pub fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    /// Set the API version sent in the `Accept` header.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the bearer token.
    ///
    /// # Errors
    /// Returns an error if the token contains characters not allowed in a header.
    pub fn bearer_token(mut self, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::InvalidHeaderValue("Authorization: Bearer <redacted>".into()))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Try to set a header, returning an error if the name or value is invalid.
    ///
    /// # Errors
    /// Returns an error if the header name or value contains invalid characters.
    pub fn try_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str
            .parse::<HeaderName>()
            .map_err(|e| Error::InvalidHeaderName(format!("'{}': {}", key_str, e)))?;
        let value = value_str
            .parse::<HeaderValue>()
            .map_err(|e| Error::InvalidHeaderValue(format!("'{}': {}", value_str, e)))?;

        self.headers.insert(key, value);
        Ok(self)
    }

    /// Merge already-validated headers (for example client defaults).
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (key, value) in headers {
            self.headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Encode a JSON body.
    ///
    /// # Errors
    /// Returns [`Error::Serialization`] if the value cannot be encoded. No
    /// request is attempted in that case.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Set a pre-encoded body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get the operation kind.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Finish the request: fixes the wire method and the `Accept`,
    /// content type and method-override headers.
    ///
    /// # Errors
    /// Returns an error if the API version produces an invalid header value.
    pub fn build(self) -> Result<PreparedRequest> {
        let Self {
            kind,
            url,
            media_type,
            api_version,
            mut headers,
            body,
        } = self;

        let accept = media_type.accept(&api_version);
        let accept = HeaderValue::from_str(&accept).map_err(|_| Error::InvalidHeaderValue(accept))?;
        headers.insert(ACCEPT, accept);

        if let Some(method) = kind.method_override() {
            headers.insert(
                HeaderName::from_static(METHOD_OVERRIDE_HEADER),
                HeaderValue::from_static(method),
            );
        }

        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(kind.content_type()));
        }

        Ok(PreparedRequest {
            kind,
            method: kind.wire_method(),
            url,
            headers,
            body,
        })
    }
}
