//! Error types for kafka-resp-types crate.

use thiserror::Error;

/// A blocking-pop reply that does not have the
/// `(topics:<topic>:<partition>, <offset>:<value>)` shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedMessage {
    #[error("Expected {expected} reply fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("Invalid queue name '{0}': expected 'topics:<topic>:<partition>'")]
    QueueName(String),

    #[error("Invalid partition '{0}': expected a non-negative integer")]
    Partition(String),

    #[error("Invalid payload: expected '<offset>:<value>'")]
    Payload,

    #[error("Invalid offset '{0}': expected a non-negative integer")]
    Offset(String),
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, MalformedMessage>;
