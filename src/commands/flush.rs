//! `flush` subcommand.

use std::time::Duration;

use anyhow::Context;
use clap::Args;
use kafka_resp_client::{Producer, ProducerConfig, DEFAULT_FLUSH_TIMEOUT};
use kafka_resp_transport::Transport;

use crate::{parse_duration, ConnectionArgs};

/// Arguments for `kafka-resp flush`.
#[derive(Args, Clone, Debug)]
pub struct FlushArgs {
    /// How long to wait; 0 waits until everything is flushed [default: 5000ms]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Wait for produced messages to be flushed.
///
/// Fails if messages are still unflushed when the timeout expires.
pub async fn run(args: FlushArgs) -> anyhow::Result<()> {
    let defaults = args.connection.config_defaults()?;
    let config = ProducerConfig {
        connection: args.connection.options(),
    };
    let mut producer = Producer::connect(&config, &defaults)
        .await
        .context("Failed to connect producer")?;

    let timeout = args.timeout.unwrap_or(DEFAULT_FLUSH_TIMEOUT);
    ensure_flushed(&mut producer, timeout).await
}

pub(crate) async fn ensure_flushed<T: Transport>(
    producer: &mut Producer<T>,
    timeout: Duration,
) -> anyhow::Result<()> {
    let unflushed = producer.flush(timeout).await.context("Flush failed")?;
    if unflushed > 0 {
        anyhow::bail!("{unflushed} messages still unflushed after {timeout:?}");
    }
    Ok(())
}
