/// Sentinel document identifier meaning "not yet saved on the backend".
///
/// The router hands this id to a freshly created document before upload
/// completes; no conversation exists server-side, so no fetch is attempted.
pub const UNSAVED_DOCUMENT_ID: &str = "new";

/// Key under which the whole conversation map is persisted locally.
///
/// There is no versioning scheme: a format change simply invalidates the
/// blob and the client starts from an empty cache.
pub const CACHE_KEY: &str = "doctalk.conversations";

/// Default backend base URL for local development.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
