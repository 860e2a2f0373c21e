//! The consumer loop and per-batch dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use linkbot_core::{Event, Fetcher, LinkbotError, Processor, Result};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ConsumerConfig;

/// Result of one dispatch round. Lives only until the threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub total: usize,
    pub failed: usize,
}

pub struct EventConsumer {
    fetcher: Arc<dyn Fetcher>,
    processor: Arc<dyn Processor>,
    config: ConsumerConfig,
}

impl EventConsumer {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        processor: Arc<dyn Processor>,
        config: ConsumerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher,
            processor,
            config,
        })
    }

    /// Polls until `cancel` fires (returns `Ok`) or one batch reaches the failure threshold (returns
    /// [`LinkbotError::TooManyFailures`]).
    ///
    /// `cancel` is observed before each fetch and during the idle wait. A batch that has started always runs to
    /// completion. Fetch errors are logged and the fetch is retried right away, except fatal ones
    /// ([`LinkbotError::is_fatal`]), which are returned.
    #[instrument(skip(self, cancel), fields(batch_size = self.config.batch_size))]
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        info!(
            failure_threshold = self.config.failure_threshold,
            idle_wait = ?self.config.idle_wait,
            "consumer started"
        );

        loop {
            if cancel.is_cancelled() {
                info!("stop requested, consumer exiting");
                return Ok(());
            }

            let events = match self.fetcher.fetch(self.config.batch_size).await {
                Ok(events) => events,
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "consumer: fetch cannot succeed, consumer stopping");
                    return Err(e);
                }
                Err(e) => {
                    error!(error = %e, "consumer: fetch failed");
                    tokio::task::yield_now().await;
                    continue;
                }
            };

            if events.is_empty() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!("stop requested while idle, consumer exiting");
                        return Ok(());
                    }
                    _ = tokio::time::sleep(self.config.idle_wait) => {}
                }
                continue;
            }

            let outcome = self.handle_batch(events).await;
            if outcome.failed >= self.config.failure_threshold {
                error!(
                    failed = outcome.failed,
                    total = outcome.total,
                    threshold = self.config.failure_threshold,
                    "too many failed events in batch, consumer stopping"
                );
                return Err(LinkbotError::TooManyFailures {
                    failed: outcome.failed,
                    threshold: self.config.failure_threshold,
                });
            }
            if outcome.failed > 0 {
                warn!(failed = outcome.failed, total = outcome.total, "batch finished with failures");
            }
        }
    }

    /// Runs one task per event and waits for all of them. A handler error or panic counts as one failure.
    pub async fn handle_batch(&self, events: Vec<Event>) -> BatchOutcome {
        let total = events.len();
        let failed = Arc::new(AtomicUsize::new(0));
        let mut handlers = JoinSet::new();

        for event in events {
            let processor = self.processor.clone();
            let failed = failed.clone();
            handlers.spawn(async move {
                info!(text = %event.text, "got new message");
                if let Err(e) = processor.process(event).await {
                    error!(error = %e, "can't handle event");
                    failed.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        while let Some(joined) = handlers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "event handler task panicked");
                failed.fetch_add(1, Ordering::SeqCst);
            }
        }

        let outcome = BatchOutcome {
            total,
            failed: failed.load(Ordering::SeqCst),
        };
        debug!(total = outcome.total, failed = outcome.failed, "batch done");
        outcome
    }
}
