//! The conversation store state machine.
//!
//! All writes go through four synchronous primitives that lock, mutate,
//! notify listeners and return; the lock is never held across an await, so
//! concurrently resolving operations interleave in completion order.
//!
//! Per user-authored message the delivery states move
//! `sending -> sent` (success), `sending -> failed` (error) and
//! `failed -> sending` (retry).  A retry issued while the original attempt is
//! still in flight is refused: honouring it would put two gateway calls in a
//! race to reconcile the same provisional handle, and the loser could append
//! a duplicate assistant reply.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use doctalk_net::{ChatGateway, GatewayError, SendReceipt, SendRequest};
use doctalk_shared::{ClientId, DeliveryState, DocumentId};

use crate::error::{Result, StoreError};
use crate::events::{StoreEvent, Subscribers, SubscriptionId};
use crate::models::{ChatMessage, ConversationMap, MessagePatch};

/// Exclusive owner of all conversation state.
///
/// Constructed explicitly and shared by `Arc`; there is no ambient global.
pub struct ConversationStore {
    gateway: Arc<dyn ChatGateway>,
    conversations: Mutex<ConversationMap>,
    subscribers: Subscribers,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoning panic cannot leave a half-applied write: every mutation is
    // a single push/replace/merge inside one lock scope.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConversationStore {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            gateway,
            conversations: Mutex::new(HashMap::new()),
            subscribers: Subscribers::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Register a listener, notified after every visible mutation.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(Box::new(listener))
    }

    /// Unregister a listener.  Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Cloned snapshot of one conversation (empty if absent).
    pub fn conversation(&self, document_id: &DocumentId) -> Vec<ChatMessage> {
        lock(&self.conversations)
            .get(document_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Cloned snapshot of the whole conversation map, for persistence.
    pub fn snapshot(&self) -> ConversationMap {
        lock(&self.conversations).clone()
    }

    /// Replace the whole map from a persisted snapshot.
    ///
    /// Meant for startup hydration, before listeners attach; no events are
    /// emitted.
    pub fn restore(&self, map: ConversationMap) {
        *lock(&self.conversations) = map;
    }

    // -----------------------------------------------------------------------
    // Synchronous primitives
    // -----------------------------------------------------------------------

    /// Bulk-set one conversation, stamping every message `sent`.
    ///
    /// Overwrites any existing conversation for the document unconditionally.
    pub fn replace_conversation(&self, document_id: DocumentId, mut messages: Vec<ChatMessage>) {
        for message in &mut messages {
            message.delivery = DeliveryState::Sent;
        }
        lock(&self.conversations).insert(document_id.clone(), messages);
        self.subscribers
            .notify(&StoreEvent::ConversationReplaced { document_id });
    }

    /// Append one message to the end of a conversation, creating it if
    /// absent.  Position is final: later reconciliation rewrites fields, never
    /// order.
    pub fn append_message(&self, document_id: DocumentId, message: ChatMessage) {
        lock(&self.conversations)
            .entry(document_id.clone())
            .or_default()
            .push(message);
        self.subscribers
            .notify(&StoreEvent::MessageAppended { document_id });
    }

    /// Merge a patch into the message with this provisional handle.
    ///
    /// Returns false (without raising or notifying) when no such message
    /// exists: a late continuation reconciling a handle that is already gone
    /// must be a harmless no-op.
    pub fn update_by_client_id(
        &self,
        document_id: &DocumentId,
        client_id: ClientId,
        patch: &MessagePatch,
    ) -> bool {
        let patched = {
            let mut conversations = lock(&self.conversations);
            conversations
                .get_mut(document_id)
                .and_then(|messages| {
                    messages
                        .iter_mut()
                        .find(|m| m.client_id == Some(client_id))
                })
                .map(|message| message.apply(patch))
                .is_some()
        };

        if patched {
            self.subscribers.notify(&StoreEvent::MessageUpdated {
                document_id: document_id.clone(),
                client_id,
            });
        }
        patched
    }

    /// Reset every conversation.
    pub fn clear_all(&self) {
        lock(&self.conversations).clear();
        self.subscribers.notify(&StoreEvent::Cleared);
    }

    // -----------------------------------------------------------------------
    // Asynchronous operations
    // -----------------------------------------------------------------------

    /// Load the stored conversation for a document from the backend.
    ///
    /// Skipped entirely for the unsaved-document sentinel.  On failure the
    /// error is logged and returned, and the current conversation is left
    /// untouched: stale-but-visible beats empty-but-consistent.
    pub async fn fetch_conversation(&self, document_id: DocumentId) -> Result<()> {
        if document_id.is_unsaved() {
            debug!(%document_id, "skipping fetch for unsaved document");
            return Ok(());
        }

        let records = match self.gateway.list_messages(&document_id).await {
            Ok(records) => records,
            Err(e) => {
                error!(%document_id, error = %e, "failed to fetch conversation");
                return Err(StoreError::Gateway(e));
            }
        };

        let messages = records
            .into_iter()
            .map(|r| ChatMessage::from_record(document_id.clone(), r))
            .collect();
        self.replace_conversation(document_id, messages);
        Ok(())
    }

    /// Optimistically send one user message.
    ///
    /// The provisional message is visible to listeners before the gateway
    /// call starts, and is never removed: on failure it stays addressable by
    /// the returned handle until retried or the conversation is cleared.
    pub async fn send_message(&self, document_id: DocumentId, text: impl Into<String>) -> ClientId {
        let client_id = ClientId::new();
        let message = ChatMessage::provisional(document_id.clone(), client_id, text);
        let request = SendRequest::new(document_id.clone(), message.text.clone());

        self.append_message(document_id.clone(), message);

        let outcome = self.gateway.send_message(&request).await;
        self.resolve_send(&document_id, client_id, outcome);
        client_id
    }

    /// Re-submit a previously failed message under its existing handle.
    ///
    /// Unknown handles are tolerated (the message was already reconciled or
    /// the conversation cleared); a message still in flight is refused.
    pub async fn retry_message(&self, document_id: DocumentId, client_id: ClientId) {
        let target = {
            let conversations = lock(&self.conversations);
            conversations
                .get(&document_id)
                .and_then(|messages| {
                    messages.iter().find(|m| m.client_id == Some(client_id))
                })
                .cloned()
        };

        let Some(message) = target else {
            warn!(%document_id, %client_id, "no message to retry for this handle");
            return;
        };
        if message.delivery == DeliveryState::Sending {
            warn!(%document_id, %client_id, "retry ignored, send still in flight");
            return;
        }

        self.update_by_client_id(&document_id, client_id, &MessagePatch::sending());

        let request = SendRequest {
            document_id: message.document_id,
            text: message.text,
            author_id: message.author_id,
            is_user_authored: message.is_user_authored,
        };
        let outcome = self.gateway.send_message(&request).await;
        self.resolve_send(&document_id, client_id, outcome);
    }

    /// Shared tail of send and retry, keyed by the provisional handle.
    fn resolve_send(
        &self,
        document_id: &DocumentId,
        client_id: ClientId,
        outcome: std::result::Result<SendReceipt, GatewayError>,
    ) {
        match outcome {
            Ok(receipt) if receipt.user.id.is_some() => {
                self.update_by_client_id(
                    document_id,
                    client_id,
                    &MessagePatch::reconciled(&receipt.user),
                );
                self.append_message(
                    document_id.clone(),
                    ChatMessage::from_record(document_id.clone(), receipt.reply),
                );
                info!(%document_id, %client_id, "message reconciled");
            }
            Ok(_) => {
                warn!(%document_id, %client_id, "send receipt missing user message id");
                self.update_by_client_id(document_id, client_id, &MessagePatch::failed());
            }
            Err(e) => {
                warn!(%document_id, %client_id, error = %e, "send failed");
                self.update_by_client_id(document_id, client_id, &MessagePatch::failed());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use tokio::sync::oneshot;

    use doctalk_net::MessageRecord;

    type SendResult = std::result::Result<SendReceipt, GatewayError>;
    type ListResult = std::result::Result<Vec<MessageRecord>, GatewayError>;

    fn record(id: Option<&str>, author: Option<&str>, text: &str, is_user: bool) -> MessageRecord {
        MessageRecord {
            id: id.map(str::to_string),
            author_id: author.map(str::to_string),
            text: text.to_string(),
            is_user_authored: is_user,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn receipt(user_id: &str, reply_id: &str) -> SendReceipt {
        SendReceipt {
            user: record(Some(user_id), Some("alice"), "hi", true),
            reply: record(Some(reply_id), None, "hello", false),
        }
    }

    fn transport_err() -> GatewayError {
        GatewayError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn doc(id: &str) -> DocumentId {
        DocumentId::from(id)
    }

    /// No conversation may hold two live client ids or two equal server ids.
    fn assert_identity_exclusive(messages: &[ChatMessage]) {
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                if a.client_id.is_some() {
                    assert_ne!(a.client_id, b.client_id, "duplicate client id");
                }
                if a.server_id.is_some() {
                    assert_ne!(a.server_id, b.server_id, "duplicate server id");
                }
            }
        }
    }

    /// Gateway answering each call from a pre-loaded script.
    #[derive(Default)]
    struct ScriptedGateway {
        lists: Mutex<VecDeque<ListResult>>,
        sends: Mutex<VecDeque<SendResult>>,
        list_calls: AtomicUsize,
        send_calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn with_sends(sends: Vec<SendResult>) -> Self {
            Self {
                sends: Mutex::new(sends.into()),
                ..Default::default()
            }
        }

        fn with_lists(lists: Vec<ListResult>) -> Self {
            Self {
                lists: Mutex::new(lists.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ChatGateway for ScriptedGateway {
        async fn list_messages(
            &self,
            _document_id: &DocumentId,
        ) -> std::result::Result<Vec<MessageRecord>, GatewayError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            lock(&self.lists).pop_front().expect("unscripted list call")
        }

        async fn send_message(&self, _request: &SendRequest) -> SendResult {
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            lock(&self.sends).pop_front().expect("unscripted send call")
        }
    }

    /// Gateway whose sends park until the test resolves them, so a test can
    /// dictate completion order.
    #[derive(Default)]
    struct GatedGateway {
        gates: Mutex<VecDeque<oneshot::Receiver<SendResult>>>,
        send_calls: AtomicUsize,
    }

    impl GatedGateway {
        fn gate(&self) -> oneshot::Sender<SendResult> {
            let (tx, rx) = oneshot::channel();
            lock(&self.gates).push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl ChatGateway for GatedGateway {
        async fn list_messages(
            &self,
            _document_id: &DocumentId,
        ) -> std::result::Result<Vec<MessageRecord>, GatewayError> {
            unimplemented!("gated gateway only scripts sends")
        }

        async fn send_message(&self, _request: &SendRequest) -> SendResult {
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            let gate = lock(&self.gates).pop_front().expect("no gate armed");
            gate.await.expect("gate dropped")
        }
    }

    fn store_with(gateway: Arc<dyn ChatGateway>) -> Arc<ConversationStore> {
        Arc::new(ConversationStore::new(gateway))
    }

    /// Give spawned sends a chance to run up to their gateway await.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    // -- Successful send ------------------------------------------------------

    #[tokio::test]
    async fn successful_send_reconciles_and_appends_reply() {
        let store = store_with(Arc::new(ScriptedGateway::with_sends(vec![Ok(receipt(
            "u1", "a1",
        ))])));

        store.send_message(doc("doc1"), "hi").await;

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 2);

        assert_eq!(conv[0].delivery, DeliveryState::Sent);
        assert_eq!(conv[0].server_id.as_deref(), Some("u1"));
        assert_eq!(conv[0].client_id, None);
        assert_eq!(conv[0].author_id.as_deref(), Some("alice"));
        // Server clock wins once confirmed.
        assert_eq!(
            conv[0].created_at,
            Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
        );

        assert_eq!(conv[1].delivery, DeliveryState::Sent);
        assert_eq!(conv[1].server_id.as_deref(), Some("a1"));
        assert!(!conv[1].is_user_authored);

        assert_identity_exclusive(&conv);
    }

    // -- Failed send ----------------------------------------------------------

    #[tokio::test]
    async fn failed_send_keeps_provisional_message_failed() {
        let store = store_with(Arc::new(ScriptedGateway::with_sends(vec![Err(
            transport_err(),
        )])));

        let cid = store.send_message(doc("doc1"), "hi").await;

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 1);
        assert_eq!(conv[0].delivery, DeliveryState::Failed);
        assert_eq!(conv[0].client_id, Some(cid));
        assert_eq!(conv[0].server_id, None);
    }

    #[tokio::test]
    async fn receipt_without_user_id_is_a_logical_failure() {
        let malformed = SendReceipt {
            user: record(None, Some("alice"), "hi", true),
            reply: record(Some("a1"), None, "hello", false),
        };
        let store = store_with(Arc::new(ScriptedGateway::with_sends(vec![Ok(malformed)])));

        let cid = store.send_message(doc("doc1"), "hi").await;

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 1, "no reply may be appended");
        assert_eq!(conv[0].delivery, DeliveryState::Failed);
        assert_eq!(conv[0].client_id, Some(cid));
    }

    // -- Retry ----------------------------------------------------------------

    #[tokio::test]
    async fn retry_after_failure_reconciles_in_place() {
        let gateway = Arc::new(ScriptedGateway::with_sends(vec![
            Err(transport_err()),
            Ok(receipt("u1", "a1")),
        ]));
        let store = store_with(gateway.clone());

        let cid = store.send_message(doc("doc1"), "hi").await;
        // While failed, the message keeps the handle it was issued.
        assert_eq!(store.conversation(&doc("doc1"))[0].client_id, Some(cid));

        store.retry_message(doc("doc1"), cid).await;

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 2, "retry must not append a second user entry");
        assert_eq!(conv[0].delivery, DeliveryState::Sent);
        assert_eq!(conv[0].server_id.as_deref(), Some("u1"));
        assert_eq!(conv[0].client_id, None);
        assert_eq!(conv[1].server_id.as_deref(), Some("a1"));
        assert_eq!(gateway.send_calls.load(Ordering::SeqCst), 2);
        assert_identity_exclusive(&conv);
    }

    // -- Unsaved-document sentinel --------------------------------------------

    #[tokio::test]
    async fn fetch_for_unsaved_document_makes_no_gateway_call() {
        let gateway = Arc::new(ScriptedGateway::default());
        let store = store_with(gateway.clone());

        store.fetch_conversation(DocumentId::unsaved()).await.unwrap();

        assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 0);
        assert!(store.snapshot().is_empty());
    }

    // -- Unknown handles ------------------------------------------------------

    #[tokio::test]
    async fn retry_with_unknown_handle_is_a_noop() {
        let gateway = Arc::new(ScriptedGateway::default());
        let store = store_with(gateway.clone());
        store.append_message(
            doc("doc1"),
            ChatMessage::from_record(doc("doc1"), record(Some("m1"), None, "hello", false)),
        );
        let before = store.conversation(&doc("doc1"));

        store.retry_message(doc("doc1"), ClientId::new()).await;

        assert_eq!(store.conversation(&doc("doc1")), before);
        assert_eq!(gateway.send_calls.load(Ordering::SeqCst), 0);
    }

    // -- Fetch ----------------------------------------------------------------

    #[tokio::test]
    async fn fetch_replaces_conversation_with_sent_messages() {
        let gateway = Arc::new(ScriptedGateway::with_lists(vec![Ok(vec![
            record(Some("m1"), Some("alice"), "what is this?", true),
            record(Some("m2"), None, "a summary", false),
        ])]));
        let store = store_with(gateway);

        store.fetch_conversation(doc("doc1")).await.unwrap();

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 2);
        assert!(conv.iter().all(|m| m.delivery == DeliveryState::Sent));
        assert!(conv.iter().all(|m| m.client_id.is_none()));
        assert_eq!(conv[0].server_id.as_deref(), Some("m1"));
    }

    // -- Fetch failure --------------------------------------------------------

    #[tokio::test]
    async fn failed_fetch_preserves_existing_conversation() {
        let gateway = Arc::new(ScriptedGateway::with_lists(vec![Err(transport_err())]));
        let store = store_with(gateway);

        store.replace_conversation(
            doc("doc1"),
            vec![ChatMessage::from_record(
                doc("doc1"),
                record(Some("m1"), Some("alice"), "hi", true),
            )],
        );
        let before = store.conversation(&doc("doc1"));

        let result = store.fetch_conversation(doc("doc1")).await;

        assert!(matches!(result, Err(StoreError::Gateway(_))));
        assert_eq!(store.conversation(&doc("doc1")), before);
    }

    // -- Idempotent updates ---------------------------------------------------

    #[tokio::test]
    async fn update_with_unknown_handle_changes_nothing() {
        let store = store_with(Arc::new(ScriptedGateway::default()));
        store.append_message(
            doc("doc1"),
            ChatMessage::provisional(doc("doc1"), ClientId::new(), "hi"),
        );
        let before = store.conversation(&doc("doc1"));

        let patched = store.update_by_client_id(&doc("doc1"), ClientId::new(), &MessagePatch::failed());

        assert!(!patched);
        assert_eq!(store.conversation(&doc("doc1")), before);
    }

    // -- Ordering -------------------------------------------------------------

    #[tokio::test]
    async fn reconciliation_never_moves_a_message() {
        let store = store_with(Arc::new(ScriptedGateway::with_sends(vec![Ok(receipt(
            "u9", "a9",
        ))])));

        store.replace_conversation(
            doc("doc1"),
            vec![
                ChatMessage::from_record(doc("doc1"), record(Some("m1"), Some("alice"), "q", true)),
                ChatMessage::from_record(doc("doc1"), record(Some("m2"), None, "a", false)),
            ],
        );

        store.send_message(doc("doc1"), "follow-up").await;

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 4);
        assert_eq!(conv[0].server_id.as_deref(), Some("m1"));
        assert_eq!(conv[1].server_id.as_deref(), Some("m2"));
        // The optimistic append keeps its position; only its fields changed.
        assert_eq!(conv[2].server_id.as_deref(), Some("u9"));
        assert_eq!(conv[3].server_id.as_deref(), Some("a9"));
    }

    // -- Concurrency ----------------------------------------------------------

    #[tokio::test]
    async fn retry_while_send_in_flight_is_refused() {
        let gateway = Arc::new(GatedGateway::default());
        let gate = gateway.gate();
        let store = store_with(gateway.clone());

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.send_message(doc("doc1"), "hi").await })
        };
        settle().await;

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv[0].delivery, DeliveryState::Sending);
        let cid = conv[0].client_id.unwrap();

        // Second attempt for the same handle while the first is in flight.
        store.retry_message(doc("doc1"), cid).await;
        assert_eq!(gateway.send_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.conversation(&doc("doc1"))[0].delivery,
            DeliveryState::Sending
        );

        gate.send(Ok(receipt("u1", "a1"))).unwrap();
        task.await.unwrap();

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 2, "exactly one reply for one resolved send");
        assert_eq!(conv[0].server_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn in_flight_sends_resolve_in_completion_order() {
        let gateway = Arc::new(GatedGateway::default());
        let gate_first = gateway.gate();
        let gate_second = gateway.gate();
        let store = store_with(gateway.clone());

        let first = {
            let store = store.clone();
            tokio::spawn(async move { store.send_message(doc("doc1"), "one").await })
        };
        settle().await;
        let second = {
            let store = store.clone();
            tokio::spawn(async move { store.send_message(doc("doc1"), "two").await })
        };
        settle().await;
        assert_eq!(gateway.send_calls.load(Ordering::SeqCst), 2);

        // Resolve in reverse issue order; the later send reconciles first.
        gate_second.send(Ok(receipt("u2", "a2"))).unwrap();
        second.await.unwrap();
        gate_first.send(Ok(receipt("u1", "a1"))).unwrap();
        first.await.unwrap();

        let conv = store.conversation(&doc("doc1"));
        assert_eq!(conv.len(), 4);
        // Optimistic appends hold their issue-order positions...
        assert_eq!(conv[0].server_id.as_deref(), Some("u1"));
        assert_eq!(conv[1].server_id.as_deref(), Some("u2"));
        // ...while replies land in completion order.
        assert_eq!(conv[2].server_id.as_deref(), Some("a2"));
        assert_eq!(conv[3].server_id.as_deref(), Some("a1"));
        assert_identity_exclusive(&conv);
    }

    // -- Notifications --------------------------------------------------------

    #[tokio::test]
    async fn every_mutation_notifies_listeners() {
        let store = store_with(Arc::new(ScriptedGateway::with_sends(vec![Ok(receipt(
            "u1", "a1",
        ))])));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = store.subscribe(move |event| lock(&sink).push(event.clone()));

        store.send_message(doc("doc1"), "hi").await;
        store.clear_all();

        let events = lock(&seen).clone();
        assert!(matches!(events[0], StoreEvent::MessageAppended { .. }));
        assert!(matches!(events[1], StoreEvent::MessageUpdated { .. }));
        assert!(matches!(events[2], StoreEvent::MessageAppended { .. }));
        assert_eq!(events[3], StoreEvent::Cleared);

        assert!(store.unsubscribe(sub));
        store.append_message(
            doc("doc1"),
            ChatMessage::provisional(doc("doc1"), ClientId::new(), "bye"),
        );
        assert_eq!(lock(&seen).len(), 4, "unsubscribed listener must not fire");
    }

    // -- Snapshot / restore ---------------------------------------------------

    #[tokio::test]
    async fn snapshot_restore_round_trip() {
        let store = store_with(Arc::new(ScriptedGateway::with_sends(vec![Ok(receipt(
            "u1", "a1",
        ))])));
        store.send_message(doc("doc1"), "hi").await;

        let snapshot = store.snapshot();
        let restored = store_with(Arc::new(ScriptedGateway::default()));
        restored.restore(snapshot.clone());

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.conversation(&doc("doc1")).len(), 2);
    }
}
