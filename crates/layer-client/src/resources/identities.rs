//! Identities API endpoint

use super::Resource;
use crate::{
    client::Client,
    error::Result,
    http::{Expect, MediaType, RequestKind},
    types::{EditOperation, Identity},
};
use url::Url;

/// Identities API resource.
///
/// User ids are used verbatim as one path segment.
#[derive(Debug, Clone, Copy)]
pub struct Identities<'a> {
    client: &'a Client,
}

impl<'a> Identities<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn url(&self, user_id: &str) -> Result<Url> {
        self.client.url(["users", user_id, "identity"])
    }

    /// Register identity information for a user.
    #[tracing::instrument(skip(self, identity))]
    pub async fn register(&self, user_id: &str, identity: &Identity) -> Result<()> {
        let request = self
            .client
            .request(RequestKind::Create, MediaType::Resource, self.url(user_id)?)?
            .json(identity)?;

        self.client
            .send(request)
            .await?
            .expect(Expect::OK_OR_CREATED)?;
        Ok(())
    }

    /// Apply edit instructions to a user's identity.
    #[tracing::instrument(skip(self, changes), fields(changes = changes.len()))]
    pub async fn update(&self, user_id: &str, changes: &[EditOperation]) -> Result<Identity> {
        let request = self
            .client
            .request(RequestKind::Patch, MediaType::Resource, self.url(user_id)?)?
            .json(changes)?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::OK_OR_CREATED)
    }

    /// Get a user's identity.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, user_id: &str) -> Result<Identity> {
        let request =
            self.client
                .request(RequestKind::Fetch, MediaType::Resource, self.url(user_id)?)?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::Success)
    }

    /// Remove a user's identity.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: &str) -> Result<()> {
        let request =
            self.client
                .request(RequestKind::Delete, MediaType::Resource, self.url(user_id)?)?;

        self.client.send(request).await?.expect(Expect::Success)?;
        Ok(())
    }
}

impl Resource for Identities<'_> {
    fn client(&self) -> &Client {
        self.client
    }
}
