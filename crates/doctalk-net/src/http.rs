//! Production [`ChatGateway`] over the backend's HTTP API.
//!
//! Endpoints:
//! - `POST {base}/ask` with `{"doc_id", "question", "stream": false}` returns
//!   the stored user message and the generated reply.
//! - `GET {base}/chats/{doc_id}` returns the stored conversation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use doctalk_shared::DocumentId;

use crate::error::{GatewayError, Result};
use crate::gateway::{ChatGateway, MessageRecord, SendReceipt, SendRequest};

/// HTTP client against one backend instance.
pub struct HttpGateway {
    base_url: String,
    http: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway for the given base URL (trailing slash tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a gateway reusing an existing connection pool.
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn list_messages(&self, document_id: &DocumentId) -> Result<Vec<MessageRecord>> {
        let url = self.url(&format!("/chats/{}", document_id));
        debug!(%document_id, "listing messages");

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status()));
        }

        let body: ChatsResponse = resp.json().await?;
        Ok(body.chats.into_iter().map(MessageRecord::from).collect())
    }

    async fn send_message(&self, request: &SendRequest) -> Result<SendReceipt> {
        let url = self.url("/ask");
        debug!(document_id = %request.document_id, "sending message");

        let resp = self
            .http
            .post(&url)
            .json(&AskRequest {
                doc_id: request.document_id.as_str(),
                question: &request.text,
                stream: false,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status()));
        }

        let body: AskResponse = resp.json().await?;
        Ok(SendReceipt {
            user: body.user_chat.into(),
            reply: body.ai_chat.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire DTOs (snake_case, as served by the backend)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    doc_id: &'a str,
    question: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    user_chat: RawChat,
    ai_chat: RawChat,
}

#[derive(Debug, Deserialize)]
struct ChatsResponse {
    chats: Vec<RawChat>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    content: String,
    is_user_message: bool,
    timestamp: DateTime<Utc>,
}

impl From<RawChat> for MessageRecord {
    fn from(raw: RawChat) -> Self {
        Self {
            id: raw.id,
            author_id: raw.user_id,
            text: raw.content,
            is_user_authored: raw.is_user_message,
            created_at: raw.timestamp,
        }
    }
}
