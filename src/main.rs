//! Command-line interface for kafka-resp
//!
//! # Usage Examples
//!
//! ## Produce
//! ```bash
//! # Keyed messages from arguments, flushed within 5s
//! kafka-resp produce --topic orders --key customer-7 order-1 order-2
//!
//! # One message per stdin line, no flush
//! cat events.txt | kafka-resp produce --topic events --no-flush
//! ```
//!
//! ## Consume
//! ```bash
//! # Three workers of the billing group, stop after 100 messages
//! kafka-resp consume --topic orders --group billing --workers 3 --max-messages 100
//! ```
//!
//! ## Flush
//! ```bash
//! # Block until the proxy reports nothing unflushed
//! kafka-resp flush --timeout 0
//! ```
//!
//! Connection flags (`--host`, `--port`, `--read-timeout`, ...) are accepted
//! by every subcommand and can also be set through `KAFKA_RESP_*` variables.
//! Logging is controlled with `RUST_LOG`.

use clap::{Parser, Subcommand};
use kafka_resp::commands::{self, ConsumeArgs, FlushArgs, ProduceArgs};

#[derive(Parser)]
#[command(name = "kafka-resp")]
#[command(about = "Produce to and consume from a Kafka-style log through a RESP proxy")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce messages to a topic
    Produce(ProduceArgs),
    /// Consume and acknowledge messages as members of a consumer group
    Consume(ConsumeArgs),
    /// Wait for produced messages to be flushed
    Flush(FlushArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Produce(args) => commands::produce::run(args).await,
        Commands::Consume(args) => commands::consume::run(args).await,
        Commands::Flush(args) => commands::flush::run(args).await,
    }
}
