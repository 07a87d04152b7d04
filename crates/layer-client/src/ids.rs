//! Identifier helpers
//!
//! Resource ids come back from the service as URIs such as
//! `layer:///conversations/f3cc7b32-3c92-11e4-baad-164230d1df67`, while URL
//! path segments need only the trailing UUID.

use uuid::Uuid;

/// Length of a hyphenated UUID.
pub const UUID_LEN: usize = 36;

/// Return the trailing 36 characters of a composite id.
///
/// Ids shorter than 36 characters are returned unchanged.
///
/// ```
/// use layer_client::extract_uuid;
///
/// let id = "layer:///conversations/f3cc7b32-3c92-11e4-baad-164230d1df67";
/// assert_eq!(extract_uuid(id), "f3cc7b32-3c92-11e4-baad-164230d1df67");
/// assert_eq!(extract_uuid("short"), "short");
/// ```
pub fn extract_uuid(id: &str) -> &str {
    match id.char_indices().rev().nth(UUID_LEN - 1) {
        Some((start, _)) => &id[start..],
        None => id,
    }
}

/// Extract the trailing UUID and parse it.
///
/// Returns `None` if the trailing 36 characters are not a valid UUID.
pub fn parse_uuid(id: &str) -> Option<Uuid> {
    Uuid::parse_str(extract_uuid(id)).ok()
}
