//! [`Transport`] over a RESP connection from the `redis` crate.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncConnectionConfig;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::options::ConnectionSettings;
use crate::traits::Transport;

/// A RESP connection to the broker proxy.
///
/// Every request is bounded by the configured read timeout; a blocking pop
/// or unflushed probe that outlives it fails with [`TransportError::Redis`].
pub struct RedisTransport {
    connection: MultiplexedConnection,
    read_timeout: Duration,
}

impl RedisTransport {
    /// Connect using resolved settings and announce the client name, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] if the proxy is unreachable or
    /// authentication fails.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let client = redis::Client::open(settings.url().as_str()).map_err(|e| {
            TransportError::Connection(format!("failed to parse URL: {e}"))
        })?;

        let config = AsyncConnectionConfig::new()
            .set_connection_timeout(settings.connect_timeout)
            .set_response_timeout(settings.read_timeout);
        let mut connection = client
            .get_multiplexed_async_connection_with_config(&config)
            .await
            .map_err(|e| {
                TransportError::Connection(format!(
                    "failed to connect to {}: {e}",
                    settings.redacted_url()
                ))
            })?;

        if let Some(name) = &settings.client_name {
            let _: () = redis::cmd("CLIENT")
                .arg("SETNAME")
                .arg(name)
                .query_async(&mut connection)
                .await?;
        }

        debug!(
            "Connected to {} (read timeout {:?})",
            settings.redacted_url(),
            settings.read_timeout
        );

        Ok(Self {
            connection,
            read_timeout: settings.read_timeout,
        })
    }
}

#[async_trait]
impl Transport for RedisTransport {
    async fn push_if_exists(&mut self, key: &str, value: &str) -> Result<()> {
        let len: i64 = redis::cmd("RPUSHX")
            .arg(key)
            .arg(value)
            .query_async(&mut self.connection)
            .await?;

        if len == 0 {
            debug!("RPUSHX {key}: list does not exist, message dropped by the proxy");
        } else {
            debug!("RPUSHX {key}: list length now {len}");
        }
        Ok(())
    }

    async fn blocking_pop(
        &mut self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<Vec<String>>> {
        let reply: Option<Vec<String>> = redis::cmd("BLPOP")
            .arg(key)
            .arg(timeout.as_secs_f64())
            .query_async(&mut self.connection)
            .await?;

        debug!(
            "BLPOP {key} ({timeout:?}): {}",
            if reply.is_some() { "received" } else { "timed out" }
        );
        Ok(reply)
    }

    async fn push(&mut self, key: &str, value: &str) -> Result<()> {
        let _len: i64 = redis::cmd("RPUSH")
            .arg(key)
            .arg(value)
            .query_async(&mut self.connection)
            .await?;

        debug!("RPUSH {key} {value}");
        Ok(())
    }

    async fn unflushed(&mut self, bound: Duration) -> Result<u64> {
        // The proxy answers WAIT with the unflushed count instead of a replica count
        let bound_ms = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX);
        let count: i64 = redis::cmd("WAIT")
            .arg(0)
            .arg(bound_ms)
            .query_async(&mut self.connection)
            .await?;

        debug!("WAIT 0 {bound_ms}: {count} unflushed");
        u64::try_from(count)
            .map_err(|_| TransportError::Protocol(format!("negative unflushed count {count}")))
    }

    fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}
