//! Consumer bound to a single topic and consumer group.
//!
//! Each [`Consumer::consume`] call walks the same states:
//!
//! ```text
//! waiting ──(timeout)──▶ empty
//!    │
//!    ▼
//! received ──(parse error)──▶ failed
//!    │
//!    ▼
//! delivered ──(callback error)──▶ failed
//!    │
//!    ▼
//!  acked
//! ```
//!
//! The ack record is pushed only from `acked`. A message that fails after it
//! was popped is reported to the caller and left unacknowledged, so the proxy
//! can redeliver it. An ack that itself fails is also reported, even though
//! the callback has already seen the message.

use std::time::Duration;

use kafka_resp_transport::{ConfigDefaults, RedisTransport, Transport, TransportOptions};
use kafka_resp_types::{topic_queue, Message, ACK_CHANNEL};
use tracing::{debug, info, warn};

use crate::config::ConsumerConfig;
use crate::error::{Error, Result};

/// Default wait for [`Consumer::consume`].
pub const DEFAULT_CONSUME_TIMEOUT: Duration = Duration::from_secs(5);

/// Receives and acknowledges messages for one member of a consumer group.
pub struct Consumer<T: Transport = RedisTransport> {
    transport: T,
    topic: String,
    name: String,
    queue: String,
}

impl Consumer<RedisTransport> {
    /// Validate `config` and connect to the proxy.
    ///
    /// The connection announces itself as `<group>:<id>`, which is how the
    /// proxy assigns partitions within the group. A missing topic or group
    /// fails before any connection attempt.
    pub async fn connect(config: &ConsumerConfig, defaults: &ConfigDefaults) -> Result<Self> {
        config.validate()?;
        let name = config.consumer_name();

        let mut connection = config.connection.clone();
        connection.transport = TransportOptions {
            client_name: Some(name.clone()),
            ..connection.transport
        };
        let settings = connection.resolve(defaults)?;
        let transport = RedisTransport::connect(&settings).await?;

        info!(
            "Consumer {name} connected to {} for topic {}",
            settings.redacted_url(),
            config.topic
        );
        Ok(Self::bind(transport, &config.topic, name))
    }
}

impl<T: Transport> Consumer<T> {
    /// Build a consumer over an already connected transport.
    pub fn new(config: &ConsumerConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self::bind(transport, &config.topic, config.consumer_name()))
    }

    fn bind(transport: T, topic: &str, name: String) -> Self {
        Self {
            transport,
            topic: topic.to_string(),
            name,
            queue: topic_queue(topic),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Consumer name, `<group>:<id>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Wait up to `timeout` for the next message and acknowledge it.
    ///
    /// Returns `Ok(None)` when no message arrived in time.
    pub async fn consume(&mut self, timeout: Duration) -> Result<Option<Message>> {
        self.consume_with(timeout, |_| Ok(())).await
    }

    /// Like [`Consumer::consume`], handing the message to `callback` before
    /// acknowledging it.
    ///
    /// If `callback` fails its error is returned as [`Error::Callback`] and
    /// the message is not acknowledged.
    pub async fn consume_with<F>(
        &mut self,
        timeout: Duration,
        callback: F,
    ) -> Result<Option<Message>>
    where
        F: FnOnce(&Message) -> anyhow::Result<()> + Send,
    {
        let Some(raw) = self.transport.blocking_pop(&self.queue, timeout).await? else {
            debug!("{}: no message on {} within {timeout:?}", self.name, self.queue);
            return Ok(None);
        };

        let outcome = deliver(&raw, callback);
        self.settle(outcome).await.map(Some)
    }

    /// Runs after every received message, acknowledging only a successful delivery.
    async fn settle(&mut self, outcome: Result<Message>) -> Result<Message> {
        match outcome {
            Ok(message) => {
                self.transport
                    .push(ACK_CHANNEL, &message.ack_record())
                    .await?;
                debug!("{}: acked {message}", self.name);
                Ok(message)
            }
            Err(err) => {
                warn!("{}: not acknowledging message: {err}", self.name);
                Err(err)
            }
        }
    }
}

fn deliver<F>(raw: &[String], callback: F) -> Result<Message>
where
    F: FnOnce(&Message) -> anyhow::Result<()>,
{
    let message = Message::parse(raw)?;
    callback(&message).map_err(Error::Callback)?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kafka_resp_transport::{Call, MemoryTransport, Operation, TransportError};
    use kafka_resp_types::MalformedMessage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn config() -> ConsumerConfig {
        ConsumerConfig {
            topic: "orders".to_string(),
            group: "billing".to_string(),
            id: Some("worker-1".to_string()),
            ..Default::default()
        }
    }

    fn consumer_with(reply: Option<[&str; 2]>) -> Consumer<MemoryTransport> {
        let mut transport = MemoryTransport::default();
        if let Some(reply) = reply {
            transport.enqueue_reply("topics:orders", reply);
        }
        Consumer::new(&config(), transport).unwrap()
    }

    fn acks(consumer: &Consumer<MemoryTransport>) -> Vec<&Call> {
        consumer
            .transport()
            .calls()
            .iter()
            .filter(|call| matches!(call, Call::Push { .. }))
            .collect()
    }

    #[test]
    fn test_new_requires_topic_and_group() {
        let missing_topic = ConsumerConfig {
            topic: String::new(),
            ..config()
        };
        let err = Consumer::new(&missing_topic, MemoryTransport::default()).err();
        assert!(matches!(err, Some(Error::Config(_))));

        let missing_group = ConsumerConfig {
            group: String::new(),
            ..config()
        };
        let err = Consumer::new(&missing_group, MemoryTransport::default()).err();
        assert!(matches!(err, Some(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_connect_rejects_topic_with_colon() {
        // Deliveries for "orders:eu" would be tagged "topics:orders:eu:0",
        // which never parses, so nothing would ever be acked
        let config = ConsumerConfig {
            topic: "orders:eu".to_string(),
            connection: kafka_resp_transport::ConnectionOptions {
                port: Some(1),
                ..Default::default()
            },
            ..config()
        };

        let err = Consumer::new(&config, MemoryTransport::default()).err();
        assert!(matches!(err, Some(Error::Config(_))));

        let err = Consumer::connect(&config, &ConfigDefaults::default())
            .await
            .err();
        assert!(matches!(err, Some(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_connect_without_topic_fails_before_connecting() {
        // Nothing listens on port 1, so reaching the network would be a Transport error
        let config = ConsumerConfig {
            topic: String::new(),
            connection: kafka_resp_transport::ConnectionOptions {
                port: Some(1),
                ..Default::default()
            },
            ..config()
        };

        let err = Consumer::connect(&config, &ConfigDefaults::default())
            .await
            .err();
        assert!(matches!(err, Some(Error::Config(_))));
    }

    #[test]
    fn test_consumer_identity() {
        let consumer = consumer_with(None);
        assert_eq!(consumer.name(), "billing:worker-1");
        assert_eq!(consumer.topic(), "orders");
    }

    #[tokio::test]
    async fn test_consume_acks_message() {
        let mut consumer = consumer_with(Some(["topics:orders:3", "42:hello"]));

        let message = consumer.consume(TIMEOUT).await.unwrap().unwrap();

        assert_eq!(message.topic, "orders");
        assert_eq!(message.partition, 3);
        assert_eq!(message.offset, 42);
        assert_eq!(message.value, "hello");
        assert_eq!(
            consumer.transport().calls(),
            [
                Call::BlockingPop {
                    key: "topics:orders".to_string(),
                    timeout: TIMEOUT,
                },
                Call::Push {
                    key: "acks".to_string(),
                    value: "orders:3:42".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_consume_timeout_returns_none_without_ack() {
        let mut consumer = consumer_with(None);

        let message = consumer.consume(TIMEOUT).await.unwrap();

        assert!(message.is_none());
        assert!(acks(&consumer).is_empty());
    }

    #[tokio::test]
    async fn test_consume_with_callback_then_ack() {
        let mut consumer = consumer_with(Some(["topics:orders:0", "7:a:b"]));
        let seen = AtomicUsize::new(0);

        let message = consumer
            .consume_with(TIMEOUT, |message| {
                assert_eq!(message.value, "a:b");
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert!(message.is_some());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(acks(&consumer).len(), 1);
        assert_eq!(consumer.transport().list("acks").unwrap(), ["orders:0:7".to_string()]);
    }

    #[tokio::test]
    async fn test_callback_failure_skips_ack() {
        let mut consumer = consumer_with(Some(["topics:orders:3", "42:hello"]));

        let err = consumer
            .consume_with(TIMEOUT, |_| Err(anyhow::anyhow!("downstream unavailable")))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Callback(ref e) if e.to_string() == "downstream unavailable"));
        assert!(acks(&consumer).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_message_skips_ack_and_callback() {
        let mut consumer = consumer_with(Some(["topics:orders:x", "42:hello"]));
        let mut called = false;

        let err = consumer
            .consume_with(TIMEOUT, |_| {
                called = true;
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MalformedMessage(MalformedMessage::Partition(_))
        ));
        assert!(!called);
        assert!(acks(&consumer).is_empty());
    }

    #[tokio::test]
    async fn test_ack_failure_is_reported() {
        let mut transport = MemoryTransport::default();
        transport.enqueue_reply("topics:orders", ["topics:orders:3", "42:hello"]);
        transport.fail(Operation::Push);
        let mut consumer = Consumer::new(&config(), transport).unwrap();
        let mut delivered = None;

        let err = consumer
            .consume_with(TIMEOUT, |message| {
                delivered = Some(message.clone());
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::Connection(_))));
        assert_eq!(delivered.unwrap().offset, 42);
        assert_eq!(acks(&consumer).len(), 1);
    }

    #[tokio::test]
    async fn test_pop_failure_is_reported() {
        let mut transport = MemoryTransport::default();
        transport.fail(Operation::BlockingPop);
        let mut consumer = Consumer::new(&config(), transport).unwrap();

        let err = consumer.consume(TIMEOUT).await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert!(acks(&consumer).is_empty());
    }

    #[tokio::test]
    async fn test_each_message_acked_once() {
        let mut transport = MemoryTransport::default();
        transport.enqueue_reply("topics:orders", ["topics:orders:0", "1:a"]);
        transport.enqueue_reply("topics:orders", ["topics:orders:1", "1:b"]);
        let mut consumer = Consumer::new(&config(), transport).unwrap();

        while consumer.consume(TIMEOUT).await.unwrap().is_some() {}

        assert_eq!(
            consumer.transport().list("acks").unwrap(),
            ["orders:0:1".to_string(), "orders:1:1".to_string()]
        );
    }
}
