//! Producer for topics behind the RESP proxy.
//!
//! Produce is fire-and-forget: it issues one push-if-exists against the
//! topic routing key and returns as soon as the proxy has the request. The
//! only delivery confirmation available is [`Producer::flush`].

use std::fmt::Display;
use std::time::Duration;

use kafka_resp_transport::{ConfigDefaults, RedisTransport, Transport};
use kafka_resp_types::routing_key;
use tracing::{debug, info};

use crate::config::ProducerConfig;
use crate::error::Result;
use crate::flush::FlushBudget;

/// Default deadline for [`Producer::flush`].
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Publishes messages to topics and waits for them to be flushed.
pub struct Producer<T: Transport = RedisTransport> {
    transport: T,
}

impl Producer<RedisTransport> {
    /// Connect a producer to the proxy.
    pub async fn connect(config: &ProducerConfig, defaults: &ConfigDefaults) -> Result<Self> {
        let settings = config.connection.resolve(defaults)?;
        let transport = RedisTransport::connect(&settings).await?;

        info!("Producer connected to {}", settings.redacted_url());
        Ok(Self::new(transport))
    }
}

impl<T: Transport> Producer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Publish `message` to `topic`.
    ///
    /// With a `key`, every message sharing the same (topic, key) pair goes to
    /// the same partition. Without one the proxy picks the partition. If the
    /// proxy does not know the topic the message is silently dropped; this
    /// client never creates topics.
    pub async fn produce(
        &mut self,
        topic: &str,
        message: impl Display,
        key: Option<&str>,
    ) -> Result<()> {
        let value = message.to_string();
        let routing_key = routing_key(topic, key);

        self.transport.push_if_exists(&routing_key, &value).await?;
        debug!("Produced {} bytes to {routing_key}", value.len());
        Ok(())
    }

    /// Wait until every produced message is flushed or `timeout` elapses.
    ///
    /// Returns the number of messages still unflushed: zero on success,
    /// nonzero if the deadline was reached first. A zero `timeout` blocks
    /// until the count reaches zero and then returns zero.
    ///
    /// Each probe is capped by the transport read timeout. The read timeout
    /// must not be shorter than the per-probe bound, otherwise the probe is
    /// interrupted and surfaces as a transport error.
    ///
    /// Full-slice probes are bounded by exactly the read timeout, which
    /// [`kafka_resp_transport::RedisTransport`] also uses as its response
    /// timeout. A proxy that holds the probe for its whole bound therefore
    /// races the client-side timeout and may fail with
    /// [`Error::Transport`](crate::Error::Transport) instead of returning a
    /// count. This applies to a zero `timeout` too, where every probe is a
    /// full slice.
    pub async fn flush(&mut self, timeout: Duration) -> Result<u64> {
        let budget = FlushBudget::new(timeout, self.transport.read_timeout());
        match budget.max_probes() {
            Some(probes) => {
                debug!("Flushing with {timeout:?} budget: {budget:?}, at most {probes} probes")
            }
            None => debug!("Flushing until nothing is unflushed: {budget:?}"),
        }

        let unflushed = self.drain(budget).await?;
        if unflushed == 0 {
            info!("All produced messages flushed");
        } else {
            info!("Flush deadline of {timeout:?} reached with {unflushed} messages unflushed");
        }
        Ok(unflushed)
    }

    async fn drain(&mut self, budget: FlushBudget) -> Result<u64> {
        match budget {
            FlushBudget::Unbounded { slice } => loop {
                let unflushed = self.transport.unflushed(slice).await?;
                if unflushed == 0 {
                    return Ok(0);
                }
                debug!("{unflushed} messages unflushed, waiting again");
            },
            FlushBudget::Bounded {
                slice,
                loops,
                remainder,
            } => {
                let mut unflushed = 0;
                for _ in 0..loops {
                    unflushed = self.transport.unflushed(slice).await?;
                    if unflushed == 0 {
                        return Ok(0);
                    }
                }
                if !remainder.is_zero() {
                    unflushed = self.transport.unflushed(remainder).await?;
                }
                Ok(unflushed)
            }
        }
    }
}
