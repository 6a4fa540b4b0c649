//! Drop-in Host
//!
//! Stands in for the host runtime: reads method calls as JSON lines on stdin,
//! drives the bridge against the mock native drop-in, and writes every host
//! event as a JSON line on stdout. Logs go to stderr.

mod handlers;
mod state;

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dropin_bridge::{BridgeConfig, ChannelEmitter};
use dropin_core::native::MockDropIn;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = BridgeConfig::from_env()?;
    let (emitter, mut events) = ChannelEmitter::new();
    let mut state = AppState::new(&config, Arc::new(MockDropIn::interactive()), emitter);

    tracing::info!(
        modules = ?state.package.module_names(),
        package = %config.package_name,
        policy = ?config.delivery_policy,
        "Drop-in host ready, reading commands from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            Some(event) = events.recv() => write_line(&mut stdout, &event).await?,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(error) = handlers::execute(&mut state, &line) {
                    write_line(&mut stdout, &error).await?;
                }
            }
        }
    }

    // Events emitted by the last command
    while let Ok(event) = events.try_recv() {
        write_line(&mut stdout, &event).await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

async fn write_line<T: Serialize>(stdout: &mut Stdout, value: &T) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    stdout.write_all(&line).await?;
    stdout.flush().await?;
    Ok(())
}
