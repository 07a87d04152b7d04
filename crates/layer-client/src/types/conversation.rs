//! Conversation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Message, Metadata, null_as_default};

/// A conversation between participants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    /// Composite id (`layer:///conversations/<uuid>`)
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub id: String,

    /// Canonical URL of the conversation
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,

    /// URL of the conversation's message collection
    #[serde(deserialize_with = "null_as_default")]
    pub messages_url: String,

    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// User ids of the participants
    #[serde(deserialize_with = "null_as_default")]
    pub participants: Vec<String>,

    /// Free-form metadata
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Metadata,

    /// Whether this is the unique conversation among its participants
    #[serde(deserialize_with = "null_as_default")]
    pub distinct: bool,

    /// Most recent message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,

    /// Unread messages for the requesting user
    #[serde(deserialize_with = "null_as_default")]
    pub unread_message_count: u64,
}

impl Conversation {
    /// The bare UUID part of the id.
    pub fn uuid(&self) -> &str {
        crate::ids::extract_uuid(&self.id)
    }
}

/// Body for creating a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewConversation {
    /// User ids of the participants
    pub participants: Vec<String>,

    /// Reuse an existing conversation among the same participants
    pub distinct: bool,

    /// Initial metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl NewConversation {
    /// A conversation among `participants`.
    pub fn new<I, S>(participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            participants: participants.into_iter().map(Into::into).collect(),
            distinct: false,
            metadata: None,
        }
    }

    /// Set the distinct flag.
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Add a metadata entry.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }
}
