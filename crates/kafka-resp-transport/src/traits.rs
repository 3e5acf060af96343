//! Transport trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Request/response connection to the broker proxy.
///
/// Implementations are exclusively owned by one producer or consumer, so
/// every method takes `&mut self` and there is at most one request in flight.
///
/// # Usage Pattern
///
/// ```ignore
/// pub struct Producer<T: Transport = RedisTransport> {
///     transport: T,
/// }
/// ```
#[async_trait]
pub trait Transport: Send {
    /// Append `value` to the list at `key` only if that list already exists.
    ///
    /// A missing list is not an error; the call is a no-op.
    async fn push_if_exists(&mut self, key: &str, value: &str) -> Result<()>;

    /// Wait up to `timeout` for an element on `key` and remove it.
    ///
    /// Returns the raw reply fields, or `None` when the timeout expires.
    async fn blocking_pop(&mut self, key: &str, timeout: Duration)
        -> Result<Option<Vec<String>>>;

    /// Unconditionally append `value` to the list at `key`.
    async fn push(&mut self, key: &str, value: &str) -> Result<()>;

    /// Ask the proxy how many produced messages are still unflushed,
    /// waiting at most `bound` for the count to drop to zero.
    ///
    /// The configured read timeout still caps the wait: a `bound` longer
    /// than [`Transport::read_timeout`] may be interrupted with an error.
    async fn unflushed(&mut self, bound: Duration) -> Result<u64>;

    /// The read timeout this connection was configured with.
    fn read_timeout(&self) -> Duration;
}
