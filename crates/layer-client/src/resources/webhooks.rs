//! Webhooks API endpoint
//!
//! Webhook management uses its own versioned media type; every request here
//! sends `application/vnd.layer.webhooks+json`.

use super::Resource;
use crate::{
    client::Client,
    error::Result,
    http::{Expect, MediaType, RequestBuilder, RequestKind},
    ids::extract_uuid,
    types::{NewWebHook, WebHook},
};
use tracing::info;

/// Webhooks API resource.
#[derive(Debug, Clone, Copy)]
pub struct WebHooks<'a> {
    client: &'a Client,
}

impl<'a> WebHooks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn request<S: AsRef<str>>(
        &self,
        kind: RequestKind,
        segments: impl IntoIterator<Item = S>,
    ) -> Result<RequestBuilder> {
        let url = self.client.url(segments)?;
        self.client.request(kind, MediaType::Webhooks, url)
    }

    /// Register a webhook. New webhooks start `unverified` until the target
    /// answers the verification request.
    #[tracing::instrument(skip(self, webhook), fields(target_url = %webhook.target_url, events = webhook.events.len()))]
    pub async fn register(&self, webhook: &NewWebHook) -> Result<WebHook> {
        let request = self
            .request(RequestKind::Create, ["webhooks"])?
            .json(webhook)?;

        let registered: WebHook = self
            .client
            .send(request)
            .await?
            .parse_result(Expect::OK_OR_CREATED)?;

        info!(webhook_id = %registered.id, status = %registered.status, "Webhook registered");
        Ok(registered)
    }

    /// List all webhooks of the application.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<WebHook>> {
        let request = self.request(RequestKind::Fetch, ["webhooks"])?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::Success)
    }

    /// Get one webhook.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, webhook_id: &str) -> Result<WebHook> {
        let request = self.request(RequestKind::Fetch, ["webhooks", extract_uuid(webhook_id)])?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::Success)
    }

    /// Resume deliveries to a webhook.
    #[tracing::instrument(skip(self))]
    pub async fn activate(&self, webhook_id: &str) -> Result<WebHook> {
        self.transition(webhook_id, "activate").await
    }

    /// Pause deliveries to a webhook.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, webhook_id: &str) -> Result<WebHook> {
        self.transition(webhook_id, "deactivate").await
    }

    /// The action endpoints read nothing from the request body, so none is sent.
    async fn transition(&self, webhook_id: &str, action: &str) -> Result<WebHook> {
        let request = self.request(
            RequestKind::Create,
            ["webhooks", extract_uuid(webhook_id), action],
        )?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::OK_OR_CREATED)
    }

    /// Remove a webhook.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, webhook_id: &str) -> Result<()> {
        let request = self.request(RequestKind::Delete, ["webhooks", extract_uuid(webhook_id)])?;

        self.client.send(request).await?.expect(Expect::Success)?;
        Ok(())
    }
}

impl Resource for WebHooks<'_> {
    fn client(&self) -> &Client {
        self.client
    }
}
