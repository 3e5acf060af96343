//! Kafka message types.
//!
//! A blocking pop against a topic queue returns a two element reply:
//!
//! ```text
//! [ "topics:<topic>:<partition>", "<offset>:<value>" ]
//! ```
//!
//! [`Message::parse`] turns that reply into a typed [`Message`]. There is no
//! partial-success mode; any deviation from the shape above is rejected.

use std::fmt;

use crate::error::{MalformedMessage, Result};
use crate::routing::{ack_record, TOPIC_PREFIX};

/// A message delivered from a topic partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Kafka topic name
    pub topic: String,
    /// Kafka partition number
    pub partition: u32,
    /// Kafka offset within the partition
    pub offset: u64,
    /// Opaque message value, may itself contain colons
    pub value: String,
}

impl Message {
    /// Parse a raw blocking-pop reply.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let [queue, payload] = raw else {
            return Err(MalformedMessage::FieldCount {
                expected: 2,
                actual: raw.len(),
            });
        };
        let (topic, partition) = parse_queue_name(queue.as_ref())?;
        let (offset, value) = parse_payload(payload.as_ref())?;

        Ok(Self {
            topic,
            partition,
            offset,
            value,
        })
    }

    /// The record pushed onto the ack channel once this message is processed.
    pub fn ack_record(&self) -> String {
        ack_record(&self.topic, self.partition, self.offset)
    }
}

impl TryFrom<(String, String)> for Message {
    type Error = MalformedMessage;

    fn try_from((queue, payload): (String, String)) -> Result<Self> {
        Self::parse(&[queue, payload])
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.topic, self.partition, self.offset)
    }
}

fn parse_queue_name(queue: &str) -> Result<(String, u32)> {
    let fields: Vec<&str> = queue.split(':').collect();
    let [prefix, topic, partition] = fields.as_slice() else {
        return Err(MalformedMessage::QueueName(queue.to_string()));
    };
    if *prefix != TOPIC_PREFIX || topic.is_empty() {
        return Err(MalformedMessage::QueueName(queue.to_string()));
    }
    let partition = parse_number(partition)
        .ok_or_else(|| MalformedMessage::Partition(partition.to_string()))?;

    Ok((topic.to_string(), partition))
}

fn parse_payload(payload: &str) -> Result<(u64, String)> {
    let (offset, value) = payload.split_once(':').ok_or(MalformedMessage::Payload)?;
    let offset =
        parse_number(offset).ok_or_else(|| MalformedMessage::Offset(offset.to_string()))?;

    Ok((offset, value.to_string()))
}

/// Strict unsigned parse: `str::parse` alone would accept a leading `+`.
fn parse_number<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
