use std::io::{BufRead, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use autotrade::dry_run::{DryRunBackend, DryRunTransport};
use autotrade::engine::Dispatcher;
use autotrade::models::{Proposal, TransportEvent};
use autotrade::store::FileSnapshotStore;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "autotrade", about = "Trade offer decision engine")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/autotrade.toml", global = true)]
    config: String,

    /// Log as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one Proposal (JSON) and print the Evaluation
    Evaluate {
        /// Read Proposal JSON from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Run newline-delimited TransportEvent JSON through the engine with
    /// dry-run collaborators
    Replay {
        /// Read events from a file instead of stdin
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read input: {path}"))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (respects RUST_LOG env var)
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = autotrade::load_config(&cli.config)?;

    match cli.command {
        Command::Evaluate { input, pretty } => {
            let raw = read_input(input.as_deref())?;
            let proposal: Proposal =
                serde_json::from_str(&raw).context("Failed to parse Proposal JSON")?;

            let evaluation = autotrade::evaluate(proposal, &config);

            let output = if pretty {
                serde_json::to_string_pretty(&evaluation)?
            } else {
                serde_json::to_string(&evaluation)?
            };
            println!("{output}");
        }
        Command::Replay { input } => {
            let raw = read_input(input.as_deref())?;
            let mut events = Vec::new();
            for (n, line) in raw.as_bytes().lines().enumerate() {
                let line = line.context("Failed to read event line")?;
                if line.trim().is_empty() {
                    continue;
                }
                let event: TransportEvent = serde_json::from_str(&line)
                    .with_context(|| format!("Failed to parse event on line {}", n + 1))?;
                events.push(event);
            }

            let store = FileSnapshotStore::new(&config.snapshot.path);
            let engine = autotrade::build_engine(
                config,
                Arc::new(DryRunTransport),
                Arc::new(DryRunBackend),
            );

            let (out_tx, mut out_rx) = mpsc::unbounded_channel();
            let dispatcher = Dispatcher::start(engine, store).await.with_outcomes(out_tx);
            let cancel = dispatcher.cancel_token();

            // Handle shutdown signals
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Received shutdown signal");
                cancel.cancel();
            });

            let (tx, rx) = mpsc::channel(64);
            let run = tokio::spawn(dispatcher.run(rx));
            for event in events {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            drop(tx);

            while let Some(outcome) = out_rx.recv().await {
                println!("{}", serde_json::to_string(&outcome)?);
            }
            run.await.context("Dispatcher task failed")?;
        }
    }

    Ok(())
}
