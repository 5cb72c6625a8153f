use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::UNSAVED_DOCUMENT_ID;

// Document identity = opaque backend-assigned string (a UUID in practice,
// but the client never parses it).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The sentinel id carried by a document that has no backend record yet.
    pub fn unsaved() -> Self {
        Self(UNSAVED_DOCUMENT_ID.to_string())
    }

    /// True when this id denotes the unsaved-document sentinel.
    pub fn is_unsaved(&self) -> bool {
        self.0 == UNSAVED_DOCUMENT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Locally generated handle for a provisional message.
///
/// Valid only until reconciliation transfers the message's identity to its
/// server-assigned id; collision resistance comes from UUIDv4.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery state of a user-authored message.
///
/// Assistant messages are created `Sent` and never leave that state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    /// Appended optimistically, round trip still in flight.
    Sending,
    /// Acknowledged by the server.
    Sent,
    /// The round trip failed; the message stays addressable for retry.
    Failed,
}
