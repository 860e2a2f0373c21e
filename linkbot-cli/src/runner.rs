use std::sync::Arc;

use anyhow::{Context, Result};
use event_consumer::{CancellationToken, EventConsumer};
use event_processor::EventProcessor;
use linkbot_core::init_tracing;
use linkbot_telegram::TelegramClient;
use storage::{MemoryPageStore, PageStore, SqlitePageStore};
use tracing::{error, info, instrument, warn};

use crate::config::BotConfig;

/// Creates the page store selected by `STORAGE_TYPE`.
#[instrument(skip(config), fields(storage_type = %config.storage_type))]
pub async fn build_store(config: &BotConfig) -> Result<Arc<dyn PageStore>> {
    let store: Arc<dyn PageStore> = match config.storage_type.as_str() {
        "sqlite" => {
            info!(database_url = %config.database_url, "Using SQLite page store");
            Arc::new(SqlitePageStore::new(&config.database_url).await.map_err(|e| {
                error!(error = %e, "Failed to initialize SQLite store");
                anyhow::anyhow!("Failed to initialize SQLite store: {}", e)
            })?)
        }
        _ => {
            info!("Using in-memory page store");
            Arc::new(MemoryPageStore::new())
        }
    };
    Ok(store)
}

/// Main entry: validate config, init logging, install signal handlers, then run the consumer until stopped.
///
/// Returns an error when the consumer stops on too many failed events, so the process exits non-zero.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file.as_deref(), config.log_format)
        .context("Failed to initialize tracing")?;
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    run_with_cancel(&config, cancel).await
}

/// Builds every component and runs the consumer loop until `cancel` fires or the loop fails.
/// Does not touch the global tracing subscriber or signal handlers.
#[instrument(skip(config, cancel))]
pub async fn run_with_cancel(config: &BotConfig, cancel: CancellationToken) -> Result<()> {
    config.validate()?;

    let store = build_store(config).await?;
    let client = Arc::new(
        TelegramClient::from_config(&config.telegram_config())
            .context("Failed to build Telegram client")?,
    );
    let processor = Arc::new(EventProcessor::new(client, store));
    let consumer = EventConsumer::new(processor.clone(), processor, config.consumer_config())?;

    info!(
        batch_size = config.batch_size,
        failure_threshold = config.failure_threshold,
        "Bot started successfully"
    );

    consumer.run(cancel).await?;

    info!("Bot stopped");
    Ok(())
}

fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("Shutdown signal received, stopping after the current batch");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "Cannot listen for SIGTERM, only Ctrl-C will stop the bot");
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            return;
        }
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                error!(error = %e, "Cannot listen for Ctrl-C");
                terminate.recv().await;
            }
        }
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
