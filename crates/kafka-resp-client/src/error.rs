//! Error types for the producer and consumer.

use kafka_resp_transport::TransportError;
use kafka_resp_types::MalformedMessage;
use thiserror::Error;

/// Errors surfaced by [`crate::Producer`] and [`crate::Consumer`].
///
/// Nothing in this crate swallows a collaborator error; every failure
/// reaches the caller as one of these variants.
#[derive(Error, Debug)]
pub enum Error {
    /// A required option is missing or invalid. Raised at construction,
    /// before any network activity.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] MalformedMessage),

    #[error("Transport error: {0}")]
    Transport(TransportError),

    /// The consumer callback rejected a message.
    #[error("Callback failed: {0:#}")]
    Callback(anyhow::Error),
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Config(message) => Error::Config(message),
            other => Error::Transport(other),
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
