//! `produce` subcommand.

use std::time::Duration;

use anyhow::Context;
use clap::Args;
use kafka_resp_client::{Producer, ProducerConfig, DEFAULT_FLUSH_TIMEOUT};
use kafka_resp_transport::Transport;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use super::flush::ensure_flushed;
use crate::{parse_duration, ConnectionArgs};

/// Arguments for `kafka-resp produce`.
#[derive(Args, Clone, Debug)]
pub struct ProduceArgs {
    /// Topic to produce to
    #[arg(long)]
    pub topic: String,

    /// Partition key; messages sharing a key land in the same partition
    #[arg(long)]
    pub key: Option<String>,

    /// How long to wait for the messages to be flushed; 0 waits indefinitely
    /// [default: 5000ms]
    #[arg(long, value_parser = parse_duration)]
    pub flush_timeout: Option<Duration>,

    /// Return right after producing, without flushing
    #[arg(long)]
    pub no_flush: bool,

    /// Messages to produce; one per line from stdin when omitted
    pub messages: Vec<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Produce the given messages, then flush.
pub async fn run(args: ProduceArgs) -> anyhow::Result<()> {
    let defaults = args.connection.config_defaults()?;
    let config = ProducerConfig {
        connection: args.connection.options(),
    };
    let mut producer = Producer::connect(&config, &defaults)
        .await
        .context("Failed to connect producer")?;

    let key = args.key.as_deref();
    let produced = if args.messages.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        produce_lines(&mut producer, &args.topic, key, stdin).await?
    } else {
        for message in &args.messages {
            producer
                .produce(&args.topic, message, key)
                .await
                .with_context(|| format!("Failed to produce to {}", args.topic))?;
        }
        args.messages.len() as u64
    };
    info!("Produced {produced} messages to {}", args.topic);

    if args.no_flush {
        return Ok(());
    }
    let timeout = args.flush_timeout.unwrap_or(DEFAULT_FLUSH_TIMEOUT);
    ensure_flushed(&mut producer, timeout).await
}

/// Produce every non-empty line of `reader`, returning how many were sent.
pub(crate) async fn produce_lines<T, R>(
    producer: &mut Producer<T>,
    topic: &str,
    key: Option<&str>,
    reader: R,
) -> anyhow::Result<u64>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut produced = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if line.is_empty() {
            continue;
        }
        producer
            .produce(topic, &line, key)
            .await
            .with_context(|| format!("Failed to produce to {topic}"))?;
        produced += 1;
    }

    Ok(produced)
}
