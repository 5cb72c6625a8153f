//! Explicit change notifications.
//!
//! The view layer registers a listener and re-reads the store when notified;
//! there is no implicit reactivity.  Every mutating primitive emits its event
//! to all current listeners before returning.

use std::collections::HashMap;
use std::sync::Mutex;

use doctalk_shared::{ClientId, DocumentId};

/// A change to visible store state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The whole conversation for a document was replaced (post-fetch).
    ConversationReplaced { document_id: DocumentId },
    /// One message was appended to a conversation.
    MessageAppended { document_id: DocumentId },
    /// The message with this provisional handle was patched in place.
    MessageUpdated {
        document_id: DocumentId,
        client_id: ClientId,
    },
    /// All conversations were cleared.
    Cleared,
}

/// Handle returned by `subscribe`, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// Registry of store listeners.
///
/// Listeners run synchronously on the mutating call, after the state change
/// is applied; they must not call back into the store's mutation surface.
pub(crate) struct Subscribers {
    next_id: Mutex<u64>,
    listeners: Mutex<HashMap<u64, Listener>>,
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Mutex::new(0),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
        let id = *next;
        *next += 1;
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, listener);
        SubscriptionId(id)
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id.0)
            .is_some()
    }

    pub(crate) fn notify(&self, event: &StoreEvent) {
        let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        for listener in listeners.values() {
            listener(event);
        }
    }
}
