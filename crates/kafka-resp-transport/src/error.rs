//! Error types for the transport layer.
//!
//! Every transport call reports failures through [`TransportError`]; callers
//! wrap it uniformly instead of interpreting it per call site.

use thiserror::Error;

/// Errors raised at the transport boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    /// An error originating from the underlying RESP client, including
    /// read timeouts and error replies.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// Connection options are missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The server replied with something the operation cannot interpret.
    #[error("invalid response: {0}")]
    Protocol(String),
}

/// Convenience type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransportError>;
