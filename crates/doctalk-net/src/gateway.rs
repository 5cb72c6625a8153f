//! The consumed backend contract.
//!
//! The store never talks HTTP directly; it drives a [`ChatGateway`] trait
//! object so tests can substitute a scripted gateway for the real server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doctalk_shared::DocumentId;

use crate::error::Result;

/// Canonical server-side record of one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRecord {
    /// Server-assigned identifier.  Absent in a send receipt means the
    /// backend failed to store the message (a logical failure).
    pub id: Option<String>,
    /// Originating user, or `None` for assistant/system turns.
    pub author_id: Option<String>,
    /// Message body.
    pub text: String,
    /// Whether this is a user turn (as opposed to an assistant turn).
    pub is_user_authored: bool,
    /// Server-side creation time.
    pub created_at: DateTime<Utc>,
}

/// Outbound send, carrying the fields a retry resubmits verbatim.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub document_id: DocumentId,
    pub text: String,
    pub author_id: Option<String>,
    pub is_user_authored: bool,
}

impl SendRequest {
    /// A first-attempt send: author unknown until the server acknowledges.
    pub fn new(document_id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            document_id,
            text: text.into(),
            author_id: None,
            is_user_authored: true,
        }
    }
}

/// Successful send outcome: the stored user message and the generated reply.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub user: MessageRecord,
    pub reply: MessageRecord,
}

/// The remote chat backend.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// List the stored conversation for a document.
    async fn list_messages(&self, document_id: &DocumentId) -> Result<Vec<MessageRecord>>;

    /// Submit one user message and receive the stored record plus the
    /// generated assistant reply.
    async fn send_message(&self, request: &SendRequest) -> Result<SendReceipt>;
}
