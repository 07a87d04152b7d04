//! Messages API endpoint

use super::Resource;
use crate::{
    client::Client,
    error::Result,
    http::{Expect, MediaType, RequestKind},
    ids::extract_uuid,
    types::{Message, NewMessage, Page},
};
use tracing::{debug, info};

/// Messages API resource.
#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    client: &'a Client,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Send a message into a conversation.
    ///
    /// Only `201 Created` counts as sent. A retry after a transport error
    /// may deliver the message twice.
    #[tracing::instrument(skip(self, message), fields(parts = message.parts.len()))]
    pub async fn send(&self, conversation_id: &str, message: &NewMessage) -> Result<Message> {
        let url = self.client.url([
            "conversations",
            extract_uuid(conversation_id),
            "messages",
        ])?;
        let request = self
            .client
            .request(RequestKind::Create, MediaType::Resource, url)?
            .json(message)?;

        let response = self.client.send(request).await?;
        let attempts = response.attempts();
        let sent: Message = response.parse_result(Expect::CREATED)?;

        info!(message_id = %sent.id, attempts, "Message sent");
        Ok(sent)
    }

    /// List messages in a conversation from the system perspective.
    ///
    /// Paging parameters are only sent when set.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, conversation_id: &str, page: &Page) -> Result<Vec<Message>> {
        let mut url = self.client.url([
            "conversations",
            extract_uuid(conversation_id),
            "messages",
        ])?;
        let pairs = page.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let request = self
            .client
            .request(RequestKind::Fetch, MediaType::Resource, url)?;

        let messages: Vec<Message> = self
            .client
            .send(request)
            .await?
            .parse_result(Expect::Success)?;

        debug!(count = messages.len(), "Listed messages");
        Ok(messages)
    }

    /// List messages in a conversation as seen by one participant.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str, conversation_id: &str) -> Result<Vec<Message>> {
        let url = self.client.url([
            "users",
            user_id,
            "conversations",
            extract_uuid(conversation_id),
            "messages",
        ])?;
        let request = self
            .client
            .request(RequestKind::Fetch, MediaType::Resource, url)?;

        self.client
            .send(request)
            .await?
            .parse_result(Expect::Success)
    }

    /// Delete a message for every participant.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, conversation_id: &str, message_id: &str) -> Result<()> {
        let url = self.client.url([
            "conversations",
            extract_uuid(conversation_id),
            "messages",
            extract_uuid(message_id),
        ])?;
        let request = self
            .client
            .request(RequestKind::Delete, MediaType::Resource, url)?;

        self.client.send(request).await?.expect(Expect::Success)?;
        Ok(())
    }
}

impl Resource for Messages<'_> {
    fn client(&self) -> &Client {
        self.client
    }
}
