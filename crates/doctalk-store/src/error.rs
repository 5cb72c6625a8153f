use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The transport gateway failed (fetch path only; send/retry failures
    /// become a `failed` delivery state instead of an error).
    #[error("Gateway error: {0}")]
    Gateway(#[from] doctalk_net::GatewayError),

    /// SQLite error from the conversation cache.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Cache blob (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the cache directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
