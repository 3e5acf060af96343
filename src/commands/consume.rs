//! `consume` subcommand.
//!
//! Spawns `--workers` consumers in the same group, each on its own
//! connection, and prints every acknowledged message as
//! `<topic>:<partition>:<offset>\t<value>`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use kafka_resp_client::{Consumer, ConsumerConfig, DEFAULT_CONSUME_TIMEOUT};
use kafka_resp_transport::{ConfigDefaults, Transport};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::{parse_duration, ConnectionArgs};

/// Arguments for `kafka-resp consume`.
#[derive(Args, Clone, Debug)]
pub struct ConsumeArgs {
    /// Topic to consume from
    #[arg(long)]
    pub topic: String,

    /// Consumer group
    #[arg(long)]
    pub group: String,

    /// Consumer id within the group (default: random); workers get `<id>-<n>`
    #[arg(long)]
    pub id: Option<String>,

    /// How long each blocking pop waits for a message [default: 5s]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Stop once this many messages have been processed across all workers
    #[arg(long)]
    pub max_messages: Option<u64>,

    /// Stop after the first pop that times out instead of waiting again
    #[arg(long)]
    pub exit_when_idle: bool,

    /// Number of consumers to run in the group
    #[arg(long, default_value_t = 1)]
    pub workers: usize,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl ConsumeArgs {
    /// Blocking pop timeout, falling back to the client default.
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_CONSUME_TIMEOUT)
    }

    /// Consumer configuration for worker `index`.
    pub fn consumer_config(&self, index: usize) -> ConsumerConfig {
        let id = match self.id.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(id) if self.workers > 1 => Some(format!("{id}-{index}")),
            Some(id) => Some(id.to_string()),
        };
        ConsumerConfig {
            connection: self.connection.options(),
            topic: self.topic.clone(),
            group: self.group.clone(),
            id,
        }
    }
}

/// When a consume loop should stop.
#[derive(Debug, Clone)]
pub(crate) struct StopCondition {
    processed: Arc<AtomicU64>,
    max_messages: Option<u64>,
    exit_when_idle: bool,
}

impl StopCondition {
    fn reached(&self) -> bool {
        self.max_messages
            .is_some_and(|max| self.processed.load(Ordering::SeqCst) >= max)
    }
}

/// Run the consumer group until a stop condition is met or Ctrl-C.
pub async fn run(args: ConsumeArgs) -> anyhow::Result<()> {
    if args.workers == 0 {
        anyhow::bail!("--workers must be at least 1");
    }
    let defaults = args.connection.config_defaults()?;
    let stop = StopCondition {
        processed: Arc::new(AtomicU64::new(0)),
        max_messages: args.max_messages,
        exit_when_idle: args.exit_when_idle,
    };

    info!(
        "Starting {} consumer(s) in group {} for topic {}",
        args.workers, args.group, args.topic
    );

    let mut workers = JoinSet::new();
    for index in 0..args.workers {
        let config = args.consumer_config(index);
        let defaults = defaults.clone();
        let stop = stop.clone();
        let timeout = args.timeout();
        workers.spawn(async move { run_worker(config, defaults, timeout, stop).await });
    }

    let interrupted = tokio::select! {
        result = join_workers(&mut workers) => {
            result?;
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        info!("Interrupted, stopping consumers");
        workers.shutdown().await;
    }

    info!(
        "Processed {} messages",
        stop.processed.load(Ordering::SeqCst)
    );
    Ok(())
}

async fn join_workers(workers: &mut JoinSet<anyhow::Result<()>>) -> anyhow::Result<()> {
    while let Some(joined) = workers.join_next().await {
        joined.context("Consumer task panicked")??;
    }
    Ok(())
}

async fn run_worker(
    config: ConsumerConfig,
    defaults: ConfigDefaults,
    timeout: Duration,
    stop: StopCondition,
) -> anyhow::Result<()> {
    let mut consumer = Consumer::connect(&config, &defaults)
        .await
        .context("Failed to connect consumer")?;

    consume_loop(&mut consumer, timeout, &stop, |line| println!("{line}")).await
}

/// Consume until `stop` is reached, handing each formatted message to `output`.
pub(crate) async fn consume_loop<T, O>(
    consumer: &mut Consumer<T>,
    timeout: Duration,
    stop: &StopCondition,
    mut output: O,
) -> anyhow::Result<()>
where
    T: Transport,
    O: FnMut(String) + Send,
{
    while !stop.reached() {
        let message = consumer
            .consume_with(timeout, |message| {
                output(format!("{message}\t{}", message.value));
                Ok(())
            })
            .await
            .with_context(|| format!("Consumer {} failed", consumer.name()))?;

        match message {
            Some(_) => {
                stop.processed.fetch_add(1, Ordering::SeqCst);
            }
            None if stop.exit_when_idle => {
                debug!("Consumer {} idle, exiting", consumer.name());
                break;
            }
            None => {}
        }
    }
    Ok(())
}
