//! Integration tests for [`event_consumer::EventConsumer`].
//!
//! Covers: normal batches until cancellation, the per-batch failure threshold boundary (4 vs 5), the batch barrier
//! (no event of batch N+1 starts before batch N finishes), cancellation before fetch / while idle / during a batch,
//! and fetch errors being retried without counting as failures.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use event_consumer::{BatchOutcome, CancellationToken, ConsumerConfig, EventConsumer};
use linkbot_core::{Event, Fetcher, LinkbotError, Processor, Routing};

/// Serves queued fetch results, then empty batches forever.
struct MockFetcher {
    batches: Mutex<VecDeque<linkbot_core::Result<Vec<Event>>>>,
    calls: AtomicUsize,
}

impl MockFetcher {
    fn new(batches: Vec<linkbot_core::Result<Vec<Event>>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, _limit: usize) -> linkbot_core::Result<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Records every processed event text; fails events whose text starts with "fail".
#[derive(Default)]
struct MockProcessor {
    called: Mutex<Vec<String>>,
    delay: Duration,
    /// Records "start:<text>" / "end:<text>" around each call.
    timeline: Mutex<Vec<String>>,
}

impl MockProcessor {
    fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Default::default()
        })
    }

    fn called(&self) -> Vec<String> {
        self.called.lock().unwrap().clone()
    }

    fn timeline(&self) -> Vec<String> {
        self.timeline.lock().unwrap().clone()
    }
}

#[async_trait]
impl Processor for MockProcessor {
    async fn process(&self, event: Event) -> linkbot_core::Result<()> {
        self.timeline
            .lock()
            .unwrap()
            .push(format!("start:{}", event.text));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.called.lock().unwrap().push(event.text.clone());
        self.timeline
            .lock()
            .unwrap()
            .push(format!("end:{}", event.text));
        if event.text.starts_with("fail") {
            return Err(LinkbotError::Storage("mock error".to_string()));
        }
        Ok(())
    }
}

fn event(text: &str) -> Event {
    Event::message(
        text,
        Routing {
            chat_id: 1,
            username: "alex".to_string(),
        },
    )
}

fn events(prefix: &str, n: usize) -> Vec<Event> {
    (1..=n).map(|i| event(&format!("{}{}", prefix, i))).collect()
}

fn fast_config() -> ConsumerConfig {
    ConsumerConfig {
        batch_size: 10,
        idle_wait: Duration::from_millis(10),
        failure_threshold: 5,
    }
}

/// Runs the consumer until it returns, cancelling after `cancel_after`. Fails the test if it hangs.
async fn run_with_cancel(
    consumer: EventConsumer,
    cancel_after: Duration,
) -> linkbot_core::Result<()> {
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(cancel_after).await;
        canceller.cancel();
    });
    tokio::time::timeout(Duration::from_secs(5), consumer.run(cancel))
        .await
        .expect("consumer did not return in time")
}

/// **Test: A successful batch is fully processed; the loop keeps polling until cancelled and returns Ok.**
#[tokio::test]
async fn test_valid_batch_then_cancel() {
    let fetcher = MockFetcher::new(vec![Ok(vec![event("event1"), event("event2")])]);
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(fetcher.clone(), processor.clone(), fast_config()).unwrap();

    let result = run_with_cancel(consumer, Duration::from_millis(100)).await;

    assert!(result.is_ok());
    let mut called = processor.called();
    called.sort();
    assert_eq!(called, vec!["event1", "event2"]);
    assert!(fetcher.calls() >= 2);
}

/// **Test: Two queued batches of six failing events; the first batch is fatal.**
///
/// **Setup:** threshold 5; batches [6 failing], [6 failing].
/// **Action:** run.
/// **Expected:** TooManyFailures { failed: 6 }; exactly six events were handled.
#[tokio::test]
async fn test_all_processors_fail() {
    let fetcher = MockFetcher::new(vec![Ok(events("fail-a", 6)), Ok(events("fail-b", 6))]);
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(fetcher.clone(), processor.clone(), fast_config()).unwrap();

    let result = run_with_cancel(consumer, Duration::from_secs(3)).await;

    match result {
        Err(LinkbotError::TooManyFailures { failed, threshold }) => {
            assert_eq!(failed, 6);
            assert_eq!(threshold, 5);
        }
        other => panic!("expected TooManyFailures, got {:?}", other),
    }
    assert_eq!(processor.called().len(), 6);
    assert_eq!(fetcher.calls(), 1);
}

/// **Test: Exactly `threshold` failures in one batch is fatal.**
#[tokio::test]
async fn test_threshold_reached_is_fatal() {
    let mut batch = events("fail", 5);
    batch.extend(events("ok", 3));
    let fetcher = MockFetcher::new(vec![Ok(batch)]);
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(fetcher, processor.clone(), fast_config()).unwrap();

    let result = run_with_cancel(consumer, Duration::from_secs(3)).await;

    assert!(matches!(
        result,
        Err(LinkbotError::TooManyFailures { failed: 5, .. })
    ));
    assert_eq!(processor.called().len(), 8);
}

/// **Test: Failures are counted per batch; four failures in each of two batches never stop the loop.**
#[tokio::test]
async fn test_below_threshold_continues() {
    let fetcher = MockFetcher::new(vec![
        Ok(events("fail-a", 4)),
        Ok(events("fail-b", 4)),
        Ok(vec![event("ok")]),
    ]);
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(fetcher, processor.clone(), fast_config()).unwrap();

    let result = run_with_cancel(consumer, Duration::from_millis(200)).await;

    assert!(result.is_ok());
    assert_eq!(processor.called().len(), 9);
}

/// **Test: No handler of batch 2 starts before every handler of batch 1 has finished.**
///
/// **Setup:** Processor sleeps 30ms per event; two batches of five.
/// **Action:** run, then inspect the start/end timeline.
/// **Expected:** the last "end:b1-*" precedes the first "start:b2-*".
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_barrier() {
    let fetcher = MockFetcher::new(vec![Ok(events("b1-", 5)), Ok(events("b2-", 5))]);
    let processor = MockProcessor::with_delay(Duration::from_millis(30));
    let consumer = EventConsumer::new(fetcher, processor.clone(), fast_config()).unwrap();

    run_with_cancel(consumer, Duration::from_millis(300))
        .await
        .unwrap();

    let timeline = processor.timeline();
    assert_eq!(timeline.len(), 20);
    let last_end_b1 = timeline
        .iter()
        .rposition(|e| e.starts_with("end:b1-"))
        .unwrap();
    let first_start_b2 = timeline
        .iter()
        .position(|e| e.starts_with("start:b2-"))
        .unwrap();
    assert!(last_end_b1 < first_start_b2, "timeline: {:?}", timeline);
}

/// **Test: Handlers within a batch run concurrently.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_handlers_overlap() {
    let processor = MockProcessor::with_delay(Duration::from_millis(200));
    let consumer = EventConsumer::new(
        MockFetcher::new(Vec::new()),
        processor.clone(),
        fast_config(),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let outcome = consumer.handle_batch(events("e", 10)).await;

    assert_eq!(outcome, BatchOutcome { total: 10, failed: 0 });
    assert!(started.elapsed() < Duration::from_millis(1500));
}

/// **Test: handle_batch() counts failed handlers.**
#[tokio::test]
async fn test_handle_batch_counts_failures() {
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(
        MockFetcher::new(Vec::new()),
        processor.clone(),
        fast_config(),
    )
    .unwrap();

    let mut batch = events("fail", 3);
    batch.extend(events("ok", 4));
    let outcome = consumer.handle_batch(batch).await;

    assert_eq!(outcome, BatchOutcome { total: 7, failed: 3 });
}

/// **Test: An already-cancelled token returns Ok before the first fetch.**
#[tokio::test]
async fn test_cancel_before_fetch() {
    let fetcher = MockFetcher::new(vec![Ok(events("e", 3))]);
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(fetcher.clone(), processor.clone(), fast_config()).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    consumer.run(cancel).await.unwrap();

    assert_eq!(fetcher.calls(), 0);
    assert!(processor.called().is_empty());
}

/// **Test: Cancellation interrupts a long idle wait.**
#[tokio::test]
async fn test_cancel_while_idle() {
    let fetcher = MockFetcher::new(Vec::new());
    let consumer = EventConsumer::new(
        fetcher.clone(),
        Arc::new(MockProcessor::default()),
        ConsumerConfig {
            idle_wait: Duration::from_secs(60),
            ..fast_config()
        },
    )
    .unwrap();

    let started = std::time::Instant::now();
    run_with_cancel(consumer, Duration::from_millis(50))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(fetcher.calls(), 1);
}

/// Cancels the token from inside the first handled event.
struct CancellingProcessor {
    cancel: CancellationToken,
    handled: AtomicUsize,
}

#[async_trait]
impl Processor for CancellingProcessor {
    async fn process(&self, _event: Event) -> linkbot_core::Result<()> {
        self.cancel.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.handled.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// **Test: Cancelling mid-batch lets the batch finish, then the loop returns without fetching again.**
#[tokio::test]
async fn test_cancel_during_batch_completes_batch() {
    let cancel = CancellationToken::new();
    let fetcher = MockFetcher::new(vec![Ok(events("e", 4)), Ok(events("never", 4))]);
    let processor = Arc::new(CancellingProcessor {
        cancel: cancel.clone(),
        handled: AtomicUsize::new(0),
    });
    let consumer = EventConsumer::new(fetcher.clone(), processor.clone(), fast_config()).unwrap();

    tokio::time::timeout(Duration::from_secs(5), consumer.run(cancel))
        .await
        .expect("consumer did not return in time")
        .unwrap();

    assert_eq!(processor.handled.load(Ordering::SeqCst), 4);
    assert_eq!(fetcher.calls(), 1);
}

/// **Test: Fetch errors are retried and never count toward the failure threshold.**
#[tokio::test]
async fn test_fetch_errors_are_retried() {
    let mut batches: Vec<linkbot_core::Result<Vec<Event>>> = (0..10)
        .map(|_| Err(LinkbotError::Source("network down".to_string())))
        .collect();
    batches.push(Ok(vec![event("after-errors")]));
    let fetcher = MockFetcher::new(batches);
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(fetcher.clone(), processor.clone(), fast_config()).unwrap();

    let result = run_with_cancel(consumer, Duration::from_millis(100)).await;

    assert!(result.is_ok());
    assert_eq!(processor.called(), vec!["after-errors"]);
    assert!(fetcher.calls() >= 11);
}

#[test]
fn test_new_rejects_invalid_config() {
    let result = EventConsumer::new(
        MockFetcher::new(Vec::new()),
        Arc::new(MockProcessor::default()),
        ConsumerConfig {
            batch_size: 0,
            ..fast_config()
        },
    );
    assert!(matches!(result, Err(LinkbotError::Config(_))));
}

/// **Test: A fatal fetch error (Config) stops the loop instead of being retried.**
///
/// **Setup:** First fetch fails with `LinkbotError::Config`, later batches would succeed.
/// **Expected:** run returns that Config error after exactly one fetch; nothing is processed.
#[tokio::test]
async fn test_fatal_fetch_error_stops_loop() {
    let fetcher = MockFetcher::new(vec![
        Err(LinkbotError::Config("offset out of range".to_string())),
        Ok(events("never", 2)),
    ]);
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(fetcher.clone(), processor.clone(), fast_config()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), consumer.run(CancellationToken::new()))
        .await
        .expect("consumer did not return in time");

    assert!(matches!(result, Err(LinkbotError::Config(_))));
    assert_eq!(fetcher.calls(), 1);
    assert!(processor.called().is_empty());
}

/// **Test: An idle wait too long to express in milliseconds still starts, idles and cancels cleanly.**
#[tokio::test]
async fn test_huge_idle_wait_is_cancellable() {
    let fetcher = MockFetcher::new(Vec::new());
    let processor = Arc::new(MockProcessor::default());
    let consumer = EventConsumer::new(
        fetcher.clone(),
        processor,
        ConsumerConfig {
            idle_wait: Duration::from_secs(u64::MAX),
            ..fast_config()
        },
    )
    .unwrap();

    let result = run_with_cancel(consumer, Duration::from_millis(50)).await;

    assert!(result.is_ok());
    assert_eq!(fetcher.calls(), 1);
}
