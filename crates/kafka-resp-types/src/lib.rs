//! Wire-level types for the kafka-resp adapter.
//!
//! The broker proxy speaks RESP, so everything the log layer needs to say has
//! to be squeezed into plain list keys and string values. This crate owns that
//! encoding and nothing else; it performs no I/O.
//!
//! # Modules
//!
//! - [`routing`] - routing keys for produce and the ack record format
//! - [`message`] - decoding blocking-pop replies into [`Message`]
//! - [`error`] - the [`MalformedMessage`] error
//!
//! # Example
//!
//! ```rust
//! use kafka_resp_types::{routing_key, Message};
//!
//! assert_eq!(routing_key("orders", Some("customer-7")), "topics:orders:customer-7");
//!
//! let raw = vec!["topics:orders:3".to_string(), "42:hello".to_string()];
//! let message = Message::parse(&raw).unwrap();
//! assert_eq!(message.partition, 3);
//! assert_eq!(message.ack_record(), "orders:3:42");
//! ```

pub mod error;
pub mod message;
pub mod routing;

pub use error::{MalformedMessage, Result};
pub use message::Message;
pub use routing::{ack_record, routing_key, topic_queue, ACK_CHANNEL, TOPIC_PREFIX};
