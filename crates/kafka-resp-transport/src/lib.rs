//! RESP transport for the kafka-resp adapter.
//!
//! The producer and consumer never talk to the network directly. They go
//! through the [`Transport`] trait, which captures the four list/control
//! operations the broker proxy understands:
//!
//! - `push_if_exists` - append to a topic list only if the proxy created it
//! - `blocking_pop` - wait for the next delivery on a topic queue
//! - `push` - unconditional append (used for ack records)
//! - `unflushed` - bounded probe for the number of unflushed messages
//!
//! [`RedisTransport`] implements it on top of the `redis` crate.
//! With the `test-util` feature, `MemoryTransport` is an in-process
//! stand-in that records every call, for tests.
//!
//! Connection options are merged in a fixed order: explicit adapter options,
//! then nested [`TransportOptions`], then [`ConfigDefaults`].

mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod options;
mod redis_transport;
mod traits;

pub use error::{Result, TransportError};
#[cfg(any(test, feature = "test-util"))]
pub use memory::{Call, MemoryTransport, Operation};
pub use options::{ConfigDefaults, ConnectionOptions, ConnectionSettings, TransportOptions};
pub use redis_transport::RedisTransport;
pub use traits::Transport;
