//! # doctalk-store
//!
//! The optimistic chat synchronization core.  [`ConversationStore`] owns, per
//! document, an ordered sequence of chat messages; a user message is appended
//! in a provisional `sending` state before the network round trip starts,
//! reconciled in place against the server's canonical record when it
//! completes, and left addressable for retry when it fails.
//!
//! The store is the single source of truth for the view layer, which observes
//! it through explicitly registered listeners and never mutates messages
//! directly.

pub mod cache;
pub mod events;
pub mod models;
pub mod store;

mod error;

pub use cache::ConversationCache;
pub use events::{StoreEvent, SubscriptionId};
pub use models::{ChatMessage, ConversationMap, MessagePatch};
pub use store::ConversationStore;
pub use error::StoreError;
