//! kafka-resp Library
//!
//! Produce to and consume from a Kafka-style log through a RESP (Redis
//! protocol) proxy.
//!
//! # Crates
//!
//! - `kafka_resp_types` - message decoding, routing keys, ack records
//! - `kafka_resp_transport` - the transport seam and its `redis` implementation
//! - `kafka_resp_client` - `Producer` and `Consumer`
//!
//! # CLI Usage
//!
//! ```bash
//! # Produce two keyed messages and wait up to 5s for them to be flushed
//! kafka-resp produce --topic orders --key customer-7 order-1 order-2
//!
//! # Consume as worker-1 of the billing group
//! kafka-resp consume --topic orders --group billing --id worker-1
//!
//! # Wait for everything produced so far to be flushed
//! kafka-resp flush --timeout 0
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use kafka_resp_transport::{ConfigDefaults, ConnectionOptions, TransportOptions};

pub mod commands;
pub mod config;

pub use config::parse_duration;
pub use kafka_resp_client::{
    Consumer, ConsumerConfig, Error, FlushBudget, Message, Producer, ProducerConfig,
    DEFAULT_CONSUME_TIMEOUT, DEFAULT_FLUSH_TIMEOUT,
};
pub use kafka_resp_transport as transport;
pub use kafka_resp_types as types;

/// Connection options shared by every subcommand.
///
/// `--host` and `--port` are explicit adapter options; the remaining flags
/// are transport options. Anything left unset falls back to the defaults
/// file, then to library defaults.
#[derive(Parser, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Proxy host (default: localhost)
    #[arg(long, env = "KAFKA_RESP_HOST")]
    pub host: Option<String>,

    /// Proxy port (default: 6380)
    #[arg(long, env = "KAFKA_RESP_PORT")]
    pub port: Option<u16>,

    /// Read timeout; caps every blocking pop and flush probe (default: 10s)
    #[arg(long, env = "KAFKA_RESP_READ_TIMEOUT", value_parser = parse_duration)]
    pub read_timeout: Option<Duration>,

    /// Connect timeout (default: 5s)
    #[arg(long, env = "KAFKA_RESP_CONNECT_TIMEOUT", value_parser = parse_duration)]
    pub connect_timeout: Option<Duration>,

    /// ACL username
    #[arg(long, env = "KAFKA_RESP_USERNAME")]
    pub username: Option<String>,

    /// Password
    #[arg(long, env = "KAFKA_RESP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database index
    #[arg(long, env = "KAFKA_RESP_DATABASE")]
    pub database: Option<u16>,

    /// TOML file overriding library defaults (host, port, read_timeout, connect_timeout)
    #[arg(long, env = "KAFKA_RESP_DEFAULTS")]
    pub defaults: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Adapter options built from the flags.
    pub fn options(&self) -> ConnectionOptions {
        ConnectionOptions {
            host: self.host.clone(),
            port: self.port,
            transport: TransportOptions {
                read_timeout: self.read_timeout,
                connect_timeout: self.connect_timeout,
                username: self.username.clone(),
                password: self.password.clone(),
                database: self.database,
                ..Default::default()
            },
        }
    }

    /// Library defaults, optionally overridden by the `--defaults` file.
    pub fn config_defaults(&self) -> anyhow::Result<ConfigDefaults> {
        match &self.defaults {
            Some(path) => ConfigDefaults::from_file(path)
                .with_context(|| format!("Failed to load defaults from {path:?}")),
            None => Ok(ConfigDefaults::default()),
        }
    }
}
