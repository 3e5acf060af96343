//! Producer and consumer for a Kafka-style log exposed through a RESP proxy.
//!
//! The proxy owns partitions, offsets and consumer groups. This crate only
//! maps the client-visible operations onto RESP list commands:
//!
//! - [`Producer::produce`] pushes onto a topic routing key
//! - [`Producer::flush`] polls the unflushed count within a timeout budget
//! - [`Consumer::consume`] blocks for the next message and acknowledges it
//!   once it has been handled
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use kafka_resp_client::{Consumer, ConsumerConfig, Producer, ProducerConfig};
//! use kafka_resp_transport::ConfigDefaults;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let defaults = ConfigDefaults::default();
//!
//!     let mut producer = Producer::connect(&ProducerConfig::default(), &defaults).await?;
//!     producer.produce("orders", "order-1", Some("customer-7")).await?;
//!     let unflushed = producer.flush(Duration::from_secs(5)).await?;
//!     println!("{unflushed} messages still unflushed");
//!
//!     let config = ConsumerConfig {
//!         topic: "orders".to_string(),
//!         group: "billing".to_string(),
//!         ..Default::default()
//!     };
//!     let mut consumer = Consumer::connect(&config, &defaults).await?;
//!     if let Some(message) = consumer.consume(Duration::from_secs(5)).await? {
//!         println!("{message}: {}", message.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod flush;
pub mod producer;

pub use config::{ConsumerConfig, ProducerConfig};
pub use consumer::{Consumer, DEFAULT_CONSUME_TIMEOUT};
pub use error::{Error, Result};
pub use flush::FlushBudget;
pub use producer::{Producer, DEFAULT_FLUSH_TIMEOUT};

pub use kafka_resp_types::Message;
