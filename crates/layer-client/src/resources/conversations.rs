//! Conversations API endpoint

use super::Resource;
use crate::{
    client::Client,
    error::Result,
    http::{Expect, MediaType, RequestKind},
    ids::extract_uuid,
    types::{Conversation, EditOperation, NewConversation},
};
use tracing::debug;

/// Conversations API resource.
///
/// Conversation ids may be given bare or in their composite
/// `layer:///conversations/<uuid>` form.
#[derive(Debug, Clone, Copy)]
pub struct Conversations<'a> {
    client: &'a Client,
}

impl<'a> Conversations<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List the conversations a user participates in.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let url = self.client.url(["users", user_id, "conversations"])?;
        let request = self
            .client
            .request(RequestKind::Fetch, MediaType::Resource, url)?;

        let conversations: Vec<Conversation> = self
            .client
            .send(request)
            .await?
            .parse_result(Expect::Success)?;

        debug!(count = conversations.len(), "Listed conversations");
        Ok(conversations)
    }

    /// Get one conversation as seen by a participant.
    #[tracing::instrument(skip(self))]
    pub async fn get_for_user(&self, user_id: &str, conversation_id: &str) -> Result<Conversation> {
        let url = self.client.url([
            "users",
            user_id,
            "conversations",
            extract_uuid(conversation_id),
        ])?;
        let request = self
            .client
            .request(RequestKind::Fetch, MediaType::Resource, url)?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::Success)
    }

    /// Get a conversation from the system perspective.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, conversation_id: &str) -> Result<Conversation> {
        let url = self
            .client
            .url(["conversations", extract_uuid(conversation_id)])?;
        let request = self
            .client
            .request(RequestKind::Fetch, MediaType::Resource, url)?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::Success)
    }

    /// Create a conversation.
    ///
    /// A transport failure after the request reached the service can lead to
    /// a duplicate conversation on retry unless `distinct` is set.
    #[tracing::instrument(skip(self, conversation), fields(participants = conversation.participants.len(), distinct = conversation.distinct))]
    pub async fn create(&self, conversation: &NewConversation) -> Result<Conversation> {
        let url = self.client.url(["conversations"])?;
        let request = self
            .client
            .request(RequestKind::Create, MediaType::Resource, url)?
            .json(conversation)?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::OK_OR_CREATED)
    }

    /// Apply edit instructions to a conversation.
    #[tracing::instrument(skip(self, changes), fields(changes = changes.len()))]
    pub async fn edit(
        &self,
        conversation_id: &str,
        changes: &[EditOperation],
    ) -> Result<Conversation> {
        let url = self
            .client
            .url(["conversations", extract_uuid(conversation_id)])?;
        let request = self
            .client
            .request(RequestKind::Patch, MediaType::Resource, url)?
            .json(changes)?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::OK_OR_CREATED)
    }

    /// Delete a conversation for every participant.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, conversation_id: &str) -> Result<()> {
        let url = self
            .client
            .url(["conversations", extract_uuid(conversation_id)])?;
        let request = self
            .client
            .request(RequestKind::Delete, MediaType::Resource, url)?;

        self.client.send(request).await?.expect(Expect::Success)?;
        Ok(())
    }
}

impl Resource for Conversations<'_> {
    fn client(&self) -> &Client {
        self.client
    }
}
