//! Host runtime: wires stores, repositories and the navigation worker to a
//! line-oriented JSON protocol.
//!
//! Input lines are [`NavigationEvent`]s, output lines are
//! [`RedirectCommand`]s. Logs never go to the output stream.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::application::services::NavigationInterceptor;
use crate::config::Config;
use crate::domain::navigation_event::{NavigationEvent, RedirectCommand};
use crate::infrastructure::persistence::{KvSettingsRepository, KvStatsRepository};
use crate::infrastructure::storage::{Stores, open_stores};
use crate::infrastructure::tabs::ChannelRedirectSink;

/// Counters reported once the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub events: usize,
    pub malformed: usize,
}

/// Runs the engine on stdin/stdout until EOF or Ctrl+C.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened or stdin cannot be read.
pub async fn run(config: Config) -> Result<()> {
    let stores = open_stores(&config)
        .await
        .context("Failed to open storage")?;
    if stores.sync.health_check().await && stores.local.health_check().await {
        tracing::info!(backend = %config.storage_backend, "Storage ready");
    } else {
        tracing::warn!(backend = %config.storage_backend, "Storage health check failed");
    }

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();

    let summary = serve(&config, stores, input, output, shutdown_signal()).await?;
    tracing::info!(
        events = summary.events,
        malformed = summary.malformed,
        "Input closed, shutting down"
    );

    Ok(())
}

/// Pumps navigation events from `input` through the interceptor and writes
/// redirect commands to `output`.
///
/// Returns after `input` reaches EOF (or `shutdown` resolves) and every
/// accepted event has been handled and its redirect written.
///
/// # Errors
///
/// Returns an error if reading `input` fails.
pub async fn serve<R, W, F>(
    config: &Config,
    stores: Stores,
    input: R,
    output: W,
    shutdown: F,
) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    F: Future<Output = ()>,
{
    let settings = Arc::new(KvSettingsRepository::new(
        stores.sync.clone(),
        config.default_affiliate_id.clone(),
    ));
    let stats = Arc::new(KvStatsRepository::new(stores.local.clone()));

    let (event_tx, event_rx) = mpsc::channel::<NavigationEvent>(config.event_queue_capacity);
    let (redirect_tx, redirect_rx) =
        mpsc::channel::<RedirectCommand>(config.event_queue_capacity);

    let tabs = Arc::new(ChannelRedirectSink::new(redirect_tx));
    let interceptor = NavigationInterceptor::new(settings, stats, tabs);

    let writer = tokio::spawn(write_redirects(redirect_rx, output));
    let worker = tokio::spawn(interceptor.run(event_rx));
    tracing::info!("Navigation worker started");

    let mut summary = SessionSummary::default();
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read navigation events")?,
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                None
            }
        };
        let Some(line) = line else { break };

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<NavigationEvent>(&line) {
            Ok(event) => {
                summary.events += 1;
                if event_tx.send(event).await.is_err() {
                    tracing::error!("Navigation worker stopped unexpectedly");
                    break;
                }
            }
            Err(e) => {
                summary.malformed += 1;
                tracing::warn!(error = %e, "Ignoring malformed navigation event");
            }
        }
    }

    drop(event_tx);
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Navigation worker panicked");
    }
    if let Err(e) = writer.await {
        tracing::error!(error = %e, "Redirect writer panicked");
    }

    Ok(summary)
}

/// Writes each redirect command as one JSON line.
async fn write_redirects<W>(mut rx: mpsc::Receiver<RedirectCommand>, mut output: W)
where
    W: AsyncWrite + Unpin,
{
    while let Some(command) = rx.recv().await {
        let mut line = match serde_json::to_string(&command) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(tab_id = %command.tab_id, error = %e, "Failed to encode redirect");
                continue;
            }
        };
        line.push('\n');

        if let Err(e) = output.write_all(line.as_bytes()).await {
            tracing::error!(error = %e, "Redirect output closed");
            break;
        }
        if let Err(e) = output.flush().await {
            tracing::error!(error = %e, "Failed to flush redirect output");
            break;
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
