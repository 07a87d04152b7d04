//! Edit instructions for patch requests

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of change an [`EditOperation`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Add a value to a set-valued property
    Add,
    /// Remove a value from a set-valued property
    Remove,
    /// Replace the property's value
    Set,
    /// Delete the property
    Delete,
}

/// A single edit instruction.
///
/// Conversation and identity edits send a list of these as the body of a
/// patch request. `property` uses dotted paths for nested fields, for example
/// `metadata.stats.counter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditOperation {
    /// What to do
    pub operation: EditKind,

    /// Which property to change
    pub property: String,

    /// Operand; absent for deletes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl EditOperation {
    /// Create an edit instruction.
    pub fn new(operation: EditKind, property: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            operation,
            property: property.into(),
            value,
        }
    }

    /// Replace `property` with `value`.
    pub fn set(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(EditKind::Set, property, Some(value.into()))
    }

    /// Add `value` to the set held by `property`.
    pub fn add(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(EditKind::Add, property, Some(value.into()))
    }

    /// Remove `value` from the set held by `property`.
    pub fn remove(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(EditKind::Remove, property, Some(value.into()))
    }

    /// Delete `property` altogether.
    pub fn delete(property: impl Into<String>) -> Self {
        Self::new(EditKind::Delete, property, None)
    }
}
