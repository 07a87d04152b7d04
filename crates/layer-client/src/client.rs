//! Main client implementation for the Layer Platform API

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    http::{
        BackoffExecutor, BackoffPolicy, MediaType, ReqwestTransport, RequestBuilder, RequestKind,
        Response, Transport,
    },
    observability::{AttemptObserver, TracingObserver},
    resources::{Conversations, Identities, Messages, WebHooks},
};

/// Main client for interacting with the Layer Platform API.
///
/// Cloning is cheap; clones share the HTTP connection pool, credentials and
/// backoff policy. Every operation runs through the same backoff executor.
///
/// # Example
///
/// ```rust,no_run
/// use layer_client::{BackoffPolicy, Client};
///
/// # async fn example() -> layer_client::Result<()> {
/// let client = Client::new("app-id", "platform-token", "1.0", BackoffPolicy::default())?;
/// let conversations = client.conversations().list_for_user("alice").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    account_id: String,
    token: SecretString,
    api_version: String,
    base_url: Url,
    default_headers: HeaderMap,
    executor: BackoffExecutor,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("account_id", &self.inner.account_id)
            .field("api_version", &self.inner.api_version)
            .field("base_url", &self.inner.base_url.as_str())
            .field("executor", &self.inner.executor)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client against the default base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or a credential is
    /// empty.
    pub fn new(
        account_id: impl Into<String>,
        token: impl Into<String>,
        api_version: impl Into<String>,
        backoff: BackoffPolicy,
    ) -> Result<Self> {
        Self::builder()
            .account_id(account_id)
            .token(token)
            .api_version(api_version)
            .backoff(backoff)
            .build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] if the account id or token is absent,
    /// [`Error::InvalidUrl`] for a bad base URL, and [`Error::HttpClient`] if
    /// the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
        Self::assemble(config, transport, Arc::new(TracingObserver))
    }

    fn assemble(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn AttemptObserver>,
    ) -> Result<Self> {
        let base_url = config.base_url()?;
        let api_version = config.api_version().to_string();
        let backoff = config.backoff();

        let account_id = config
            .account_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::MissingConfig("account id (LAYER_APP_ID)".into()))?;
        let token = config
            .token
            .filter(|token| !token.expose_secret().trim().is_empty())
            .ok_or_else(|| Error::MissingConfig("bearer token (LAYER_TOKEN)".into()))?;

        let executor = BackoffExecutor::new(transport, observer, backoff);

        Ok(Self {
            inner: Arc::new(ClientInner {
                account_id,
                token,
                api_version,
                base_url,
                default_headers: config.default_headers,
                executor,
            }),
        })
    }

    /// Conversation operations.
    pub fn conversations(&self) -> Conversations<'_> {
        Conversations::new(self)
    }

    /// Message operations.
    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self)
    }

    /// Identity operations.
    pub fn identities(&self) -> Identities<'_> {
        Identities::new(self)
    }

    /// Webhook management.
    pub fn webhooks(&self) -> WebHooks<'_> {
        WebHooks::new(self)
    }

    /// Application id used in every resource path.
    pub fn account_id(&self) -> &str {
        &self.inner.account_id
    }

    /// API version sent in the `Accept` header.
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Backoff policy applied to every operation.
    pub fn backoff(&self) -> &BackoffPolicy {
        self.inner.executor.policy()
    }

    /// Resolve `/apps/{account}/{segments...}` against the base URL.
    ///
    /// Each segment is percent-encoded on its own, so ids containing `/` or
    /// `?` stay inside their segment.
    pub(crate) fn url<S: AsRef<str>>(&self, segments: impl IntoIterator<Item = S>) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("'{}': cannot be a base", self.inner.base_url)))?
            .pop_if_empty()
            .extend(["apps", self.inner.account_id.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Start a request carrying credentials, the versioned `Accept` media type
    /// and the default headers.
    pub(crate) fn request(
        &self,
        kind: RequestKind,
        media_type: MediaType,
        url: Url,
    ) -> Result<RequestBuilder> {
        RequestBuilder::new(kind, url)
            .media_type(media_type)
            .api_version(self.inner.api_version.as_str())
            .headers(&self.inner.default_headers)
            .bearer_token(self.inner.token.expose_secret())
    }

    /// Finish the request and run it through the backoff executor.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let prepared = request.build()?;
        Ok(self.inner.executor.execute(&prepared).await?)
    }
}

/// Builder for creating a configured Client.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    observer: Option<Arc<dyn AttemptObserver>>,
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the application id.
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.config.account_id = Some(account_id.into());
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(SecretString::new(token.into().into_boxed_str()));
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the API version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = Some(api_version.into());
        self
    }

    /// Set the per-attempt timeout. Ignored when a custom transport is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the backoff policy.
    pub fn backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.config.backoff = Some(backoff);
        self
    }

    /// Add a custom default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Send requests through a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Receive one [`crate::observability::AttemptRecord`] per attempt.
    ///
    /// Defaults to [`TracingObserver`].
    pub fn observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the client with the configured options.
    ///
    /// # Errors
    ///
    /// See [`Client::from_config`].
    pub fn build(self) -> Result<Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config.timeout())?),
        };
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver) as Arc<dyn AttemptObserver>);

        Client::assemble(self.config, transport, observer)
    }
}
