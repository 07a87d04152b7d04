//! Webhook registrations and delivery payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Conversation, Message, Metadata, null_as_default};

/// A registered webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebHook {
    /// Composite id (`layer:///apps/<app>/webhooks/<uuid>`)
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,

    /// Canonical URL of the webhook
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,

    /// `unverified`, `active` or `inactive`
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    /// Why the webhook is in its current status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,

    /// Registration time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Payload version
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,

    /// Where deliveries are posted
    #[serde(deserialize_with = "null_as_default")]
    pub target_url: String,

    /// Subscribed event types
    #[serde(deserialize_with = "null_as_default")]
    pub events: Vec<String>,

    /// Shared secret used to sign deliveries
    #[serde(deserialize_with = "null_as_default")]
    pub secret: String,

    /// Opaque values echoed back in every delivery
    #[serde(deserialize_with = "null_as_default")]
    pub config: Metadata,
}

impl WebHook {
    /// Whether deliveries are currently being sent.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// The bare UUID part of the id.
    pub fn uuid(&self) -> &str {
        crate::ids::extract_uuid(&self.id)
    }
}

/// Body for registering a webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWebHook {
    /// Where deliveries are posted
    pub target_url: String,

    /// Event types to subscribe to
    pub events: Vec<String>,

    /// Shared secret used to sign deliveries
    pub secret: String,

    /// Payload version, the service default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Opaque values echoed back in every delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Metadata>,
}

impl NewWebHook {
    /// A registration for `events` delivered to `target_url`.
    pub fn new<I, S>(target_url: impl Into<String>, secret: impl Into<String>, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_url: target_url.into(),
            events: events.into_iter().map(Into::into).collect(),
            secret: secret.into(),
            version: None,
            config: None,
        }
    }

    /// Pin the payload version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a config entry echoed back in deliveries.
    pub fn config(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.config
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Who triggered a webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    /// Display name for system actors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// User id for user actors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Event envelope included in every delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHookEvent {
    /// Event id
    pub id: String,

    /// When the event happened
    pub created_at: DateTime<Utc>,

    /// Event type, for example `message.sent`
    #[serde(rename = "type")]
    pub event_type: String,

    /// Who triggered it
    #[serde(default, deserialize_with = "null_as_default")]
    pub actor: Actor,
}

/// Delivery body for `message.*` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHookMessagePayload {
    /// Event envelope
    pub event: WebHookEvent,

    /// The affected message
    pub message: Message,

    /// Config of the webhook that produced this delivery
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Metadata,
}

/// Delivery body for `conversation.*` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHookConversationPayload {
    /// Event envelope
    pub event: WebHookEvent,

    /// The affected conversation
    pub conversation: Conversation,

    /// Config of the webhook that produced this delivery
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_webhook() {
        let raw = json!({
            "id": "layer:///apps/082d4684/webhooks/f5ef2b54-0991-11e5-a6c0-1697f925ec7b",
            "url": "https://api.layer.com/apps/082d4684/webhooks/f5ef2b54-0991-11e5-a6c0-1697f925ec7b",
            "version": "1.0",
            "target_url": "https://example.com/hooks",
            "events": ["message.sent", "conversation.created"],
            "status": "active",
            "created_at": "2015-06-04T21:15:32Z",
            "secret": "shh",
            "config": {"region": "eu"}
        });

        let webhook: WebHook = serde_json::from_value(raw).unwrap();
        assert!(webhook.is_active());
        assert_eq!(webhook.uuid(), "f5ef2b54-0991-11e5-a6c0-1697f925ec7b");
        assert_eq!(webhook.events.len(), 2);
        assert_eq!(webhook.config["region"], "eu");
        assert!(webhook.status_reason.is_none());
    }

    #[test]
    fn test_new_webhook_body() {
        let body = NewWebHook::new("https://example.com/hooks", "shh", ["message.sent"])
            .version("1.0")
            .config("region", "eu");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "target_url": "https://example.com/hooks",
                "events": ["message.sent"],
                "secret": "shh",
                "version": "1.0",
                "config": {"region": "eu"}
            })
        );
    }

    #[test]
    fn test_message_payload() {
        let raw = json!({
            "event": {
                "id": "evt-1",
                "created_at": "2015-09-17T20:46:47.561Z",
                "type": "message.sent",
                "actor": {"user_id": "alice"}
            },
            "message": {
                "id": "layer:///messages/940de862-3c96-11e4-baad-164230d1df67",
                "parts": [{"mime_type": "text/plain", "body": "hi"}],
                "sender": {"user_id": "alice"}
            },
            "config": {"region": "eu"}
        });

        let payload: WebHookMessagePayload = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.event.event_type, "message.sent");
        assert_eq!(payload.event.actor.user_id.as_deref(), Some("alice"));
        assert_eq!(payload.message.text(), "hi");
        assert_eq!(payload.config["region"], "eu");
    }

    #[test]
    fn test_conversation_payload_without_config() {
        let raw = json!({
            "event": {
                "id": "evt-2",
                "created_at": "2015-09-17T20:46:47Z",
                "type": "conversation.created",
                "actor": {"name": "System"}
            },
            "conversation": {
                "id": "layer:///conversations/f3cc7b32-3c92-11e4-baad-164230d1df67",
                "participants": ["a", "b"]
            }
        });

        let payload: WebHookConversationPayload = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.event.actor.name.as_deref(), Some("System"));
        assert_eq!(payload.conversation.participants, vec!["a", "b"]);
        assert!(payload.config.is_empty());
    }

    #[test]
    fn test_webhook_accepts_null_fields() {
        let raw = json!({
            "id": "x",
            "status": "active",
            "config": null,
            "events": null,
            "url": null,
            "secret": null
        });

        let webhook: WebHook = serde_json::from_value(raw).unwrap();
        assert!(webhook.is_active());
        assert!(webhook.config.is_empty());
        assert!(webhook.events.is_empty());
        assert!(webhook.url.is_empty());
    }

    #[test]
    fn test_payloads_accept_null_config_and_actor() {
        let event = json!({
            "id": "evt-1",
            "created_at": "2015-09-17T20:46:47.561Z",
            "type": "message.sent",
            "actor": null
        });

        let payload: WebHookMessagePayload = serde_json::from_value(json!({
            "event": event.clone(),
            "message": {"id": "m", "parts": []},
            "config": null
        }))
        .unwrap();
        assert!(payload.config.is_empty());
        assert_eq!(payload.event.actor, Actor::default());

        let payload: WebHookConversationPayload = serde_json::from_value(json!({
            "event": event,
            "conversation": {"id": "c", "metadata": null},
            "config": null
        }))
        .unwrap();
        assert!(payload.config.is_empty());
        assert!(payload.conversation.metadata.is_empty());
    }
}
