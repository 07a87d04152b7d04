//! Message-related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Metadata, null_as_default};

/// MIME type of plain text parts.
pub const TEXT_PLAIN: &str = "text/plain";

/// A message within a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Composite id (`layer:///messages/<uuid>`)
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub id: String,

    /// Canonical URL of the message
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,

    /// Whether the message is unread for the requesting user
    #[serde(deserialize_with = "null_as_default")]
    pub is_unread: bool,

    /// Message parts in send order
    #[serde(deserialize_with = "null_as_default")]
    pub parts: Vec<MessagePart>,

    /// When the service received the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,

    /// Per-recipient delivery state (`sent`, `delivered`, `read`)
    #[serde(deserialize_with = "null_as_default")]
    pub recipient_status: HashMap<String, String>,

    /// Who sent it
    #[serde(deserialize_with = "null_as_default")]
    pub sender: Sender,

    /// When the sender sent it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,

    /// Conversation the message belongs to
    #[serde(deserialize_with = "null_as_default")]
    pub conversation: ConversationRef,
}

impl Message {
    /// Concatenate the bodies of all `text/plain` parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|part| part.mime_type == TEXT_PLAIN)
            .filter_map(|part| part.body.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// One part of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagePart {
    /// Part id, assigned by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// MIME type of the part
    #[serde(deserialize_with = "null_as_default")]
    pub mime_type: String,

    /// Inline body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Rich content descriptor for externally stored parts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Metadata>,
}

impl MessagePart {
    /// A `text/plain` part.
    pub fn text(body: impl Into<String>) -> Self {
        Self::inline(TEXT_PLAIN, body)
    }

    /// A part with an inline body of any MIME type.
    pub fn inline(mime_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            mime_type: mime_type.into(),
            body: Some(body.into()),
            content: None,
        }
    }
}

/// The sender of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    /// Display name for system senders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// User id for user senders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Sender {
    /// A message sent on behalf of a user.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            name: None,
            user_id: Some(user_id.into()),
        }
    }

    /// A system message shown under `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            user_id: None,
        }
    }
}

/// Reference from a message back to its conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationRef {
    /// Composite conversation id
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    /// Conversation URL
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// Body for sending a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Who the message is from
    pub sender: Sender,

    /// Parts in send order
    pub parts: Vec<MessagePart>,
}

impl NewMessage {
    /// Start a message from `sender` with no parts.
    pub fn new(sender: Sender) -> Self {
        Self {
            sender,
            parts: Vec::new(),
        }
    }

    /// Append a `text/plain` part.
    pub fn text(self, body: impl Into<String>) -> Self {
        self.part(MessagePart::text(body))
    }

    /// Append a part.
    pub fn part(mut self, part: MessagePart) -> Self {
        self.parts.push(part);
        self
    }
}

/// Paging parameters for message listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of messages to return
    pub page_size: Option<u32>,

    /// Return messages older than this message id
    pub from_id: Option<String>,
}

impl Page {
    /// No paging: the service default page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the page size. Zero means the service default.
    pub fn size(mut self, page_size: u32) -> Self {
        self.page_size = (page_size > 0).then_some(page_size);
        self
    }

    /// Start after the given message id. Empty means from the newest message.
    pub fn from_id(mut self, from_id: impl Into<String>) -> Self {
        let from_id = from_id.into();
        self.from_id = (!from_id.is_empty()).then_some(from_id);
        self
    }

    /// Query parameters for the set fields only.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(size) = self.page_size {
            pairs.push(("page_size", size.to_string()));
        }
        if let Some(from_id) = &self.from_id {
            pairs.push(("from_id", from_id.clone()));
        }
        pairs
    }
}
