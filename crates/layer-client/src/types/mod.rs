//! Resource models for the Layer Platform API
//!
//! These are plain data shapes. The service owns their invariants; the client
//! only serializes what the caller built and decodes what the service sent.
//! Open-ended payloads (metadata, webhook config, rich part content) are kept
//! as [`Metadata`], which preserves key order across a round trip.

pub use conversation::*;
pub use edit::*;
pub use identity::*;
pub use message::*;
pub use webhook::*;

pub mod conversation;
pub mod edit;
pub mod identity;
pub mod message;
pub mod webhook;

/// Free-form JSON object.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Decode an explicit `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;

    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversation_with_last_message() {
        let raw = json!({
            "id": "layer:///conversations/f3cc7b32-3c92-11e4-baad-164230d1df67",
            "participants": ["a"],
            "last_message": {
                "id": "layer:///messages/940de862-3c96-11e4-baad-164230d1df67",
                "parts": [{"mime_type": "text/plain", "body": "latest"}],
                "sender": {"user_id": "a"}
            }
        });

        let conversation: Conversation = serde_json::from_value(raw).unwrap();
        let last = conversation.last_message.unwrap();
        assert_eq!(last.text(), "latest");
        assert_eq!(last.sender.user_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_metadata_round_trip_preserves_values() {
        let raw = r#"{"b":[1,2,{"c":null}],"a":true,"n":1.5}"#;
        let metadata: Metadata = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&metadata).unwrap(), raw);
    }
}
