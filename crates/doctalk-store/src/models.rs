//! Domain model of one chat turn, plus the merge patch applied during
//! reconciliation.
//!
//! Every struct derives `Serialize` and `Deserialize` so the conversation map
//! can be handed to the view layer and persisted wholesale by the cache.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doctalk_net::MessageRecord;
use doctalk_shared::{ClientId, DeliveryState, DocumentId};

/// The full client-side chat state: per document, its ordered conversation.
pub type ConversationMap = HashMap<DocumentId, Vec<ChatMessage>>;

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// A single chat turn.
///
/// Identity is exclusive: a `sending`/`failed` message carries a `client_id`
/// and no `server_id`; reconciliation writes the `server_id` and clears the
/// `client_id` in the same patch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Server-assigned identifier; absent until acknowledged, immutable after.
    pub server_id: Option<String>,
    /// Local provisional handle; present only while `sending` or `failed`.
    pub client_id: Option<ClientId>,
    /// The conversation this message belongs to.
    pub document_id: DocumentId,
    /// Originating user, or `None` for assistant turns (and for provisional
    /// user turns, where the author is unknown until the server ack).
    pub author_id: Option<String>,
    /// Message body, immutable once created.
    pub text: String,
    /// User turn vs assistant turn.  Only user turns can fail or be retried.
    pub is_user_authored: bool,
    /// Client clock for provisional messages, server clock once confirmed.
    pub created_at: DateTime<Utc>,
    /// Delivery state; assistant messages are always `Sent`.
    pub delivery: DeliveryState,
}

impl ChatMessage {
    /// A provisional user message, appended before the round trip starts.
    ///
    /// The caller supplies the handle so it keeps a copy for reconciliation.
    pub fn provisional(document_id: DocumentId, client_id: ClientId, text: impl Into<String>) -> Self {
        Self {
            server_id: None,
            client_id: Some(client_id),
            document_id,
            author_id: None,
            text: text.into(),
            is_user_authored: true,
            created_at: Utc::now(),
            delivery: DeliveryState::Sending,
        }
    }

    /// A confirmed message built from a canonical server record.
    pub fn from_record(document_id: DocumentId, record: MessageRecord) -> Self {
        Self {
            server_id: record.id,
            client_id: None,
            document_id,
            author_id: record.author_id,
            text: record.text,
            is_user_authored: record.is_user_authored,
            created_at: record.created_at,
            delivery: DeliveryState::Sent,
        }
    }

    /// Merge a patch into this message.  `Some` fields overwrite; the
    /// `clear_client_id` flag nulls the provisional handle, which a plain
    /// `Option` field could not express.
    pub fn apply(&mut self, patch: &MessagePatch) {
        if let Some(ref server_id) = patch.server_id {
            self.server_id = Some(server_id.clone());
        }
        if let Some(ref author_id) = patch.author_id {
            self.author_id = Some(author_id.clone());
        }
        if let Some(ref text) = patch.text {
            self.text = text.clone();
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = created_at;
        }
        if let Some(delivery) = patch.delivery {
            self.delivery = delivery;
        }
        if patch.clear_client_id {
            self.client_id = None;
        }
    }
}

// ---------------------------------------------------------------------------
// MessagePatch
// ---------------------------------------------------------------------------

/// Partial update located by `client_id` and merged field-wise.
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub server_id: Option<String>,
    pub author_id: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub delivery: Option<DeliveryState>,
    pub clear_client_id: bool,
}

impl MessagePatch {
    /// The patch that marks a send attempt failed.
    pub fn failed() -> Self {
        Self {
            delivery: Some(DeliveryState::Failed),
            ..Default::default()
        }
    }

    /// The patch that marks a message in flight again (retry path).
    pub fn sending() -> Self {
        Self {
            delivery: Some(DeliveryState::Sending),
            ..Default::default()
        }
    }

    /// The reconciliation patch: adopt the canonical record, transfer the
    /// message's identity from `client_id` to `server_id`.
    pub fn reconciled(record: &MessageRecord) -> Self {
        Self {
            server_id: record.id.clone(),
            author_id: record.author_id.clone(),
            text: Some(record.text.clone()),
            created_at: Some(record.created_at),
            delivery: Some(DeliveryState::Sent),
            clear_client_id: true,
        }
    }
}
