use thiserror::Error;

/// Errors produced by the transport layer.
///
/// A well-formed receipt whose user record lacks an id is *not* an error
/// here: the backend signals that case in data, and the store treats it as a
/// logical failure of the send.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network, connection or body-decoding failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("Server responded {0}")]
    Status(reqwest::StatusCode),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
