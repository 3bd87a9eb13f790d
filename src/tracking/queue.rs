use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::TrackerConfig;
use crate::store::{keys, Store};

use super::event::TrackingEvent;
use super::sink::EventSink;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Uniform call surface for event recording. Contexts without a persistent
/// store get [`NoopTracker`], so call sites never branch on environment.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Append an event. The caller must already have stamped `user_id` and
    /// `timestamp`.
    async fn add(&self, event: TrackingEvent);
    /// Attempt to deliver everything currently buffered.
    async fn sync_now(&self);
    /// Cancel the periodic flush task.
    fn stop(&self);
}

struct QueueState {
    queue: Vec<TrackingEvent>,
    retry_count: u32,
}

/// Buffers tracking events and ships them to the sink in ordered batches: on
/// a fixed interval, when the buffer fills, on explicit request, and once
/// more at shutdown. A failed delivery leaves the buffer untouched, so the
/// next attempt naturally retries the same batch plus anything newer.
#[derive(Clone)]
pub struct TrackingQueue {
    state: Arc<Mutex<QueueState>>,
    store: Store,
    sink: Arc<dyn EventSink>,
    config: TrackerConfig,
    cancel: CancellationToken,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TrackingQueue {
    /// Build the queue, reloading any undelivered events a previous session
    /// left in the store. The periodic flush does not run until
    /// [`TrackingQueue::start_auto_sync`].
    pub async fn new(store: Store, sink: Arc<dyn EventSink>, config: TrackerConfig) -> Self {
        let buffered: Vec<TrackingEvent> = store.read_or_default(keys::TRACKING_QUEUE).await;
        if !buffered.is_empty() {
            info!(
                "recovered {} undelivered tracking event(s) from previous session",
                buffered.len()
            );
        }

        Self {
            state: Arc::new(Mutex::new(QueueState {
                queue: buffered,
                retry_count: 0,
            })),
            store,
            sink,
            config,
            cancel: CancellationToken::new(),
            ticker: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the periodic flush task. Calling again replaces the previous
    /// ticker.
    pub async fn start_auto_sync(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let queue = self.clone();
        let cancel = self.cancel.clone();
        let period = self.config.sync_interval;

        *ticker_guard = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately once; the queue is empty at startup
            // often enough that we wait a full period first
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        queue.sync_now().await;
                    }
                    _ = cancel.cancelled() => {
                        log_info!("auto-sync loop shutting down");
                        break;
                    }
                }
            }
        }));
    }

    /// Append an event and persist the new snapshot before returning. A full
    /// buffer kicks off a flush the caller never waits on.
    pub async fn add(&self, event: TrackingEvent) {
        let should_flush = {
            let mut state = self.state.lock().await;
            state.queue.push(event);
            self.persist(&state.queue).await;
            state.queue.len() >= self.config.max_queue_size
        };

        if should_flush {
            let queue = self.clone();
            tokio::spawn(async move {
                queue.sync_now().await;
            });
        }
    }

    /// Deliver the entire buffer as one batch. The queue lock is held across
    /// delivery, so exactly the batch that was sent is the batch that gets
    /// cleared.
    pub async fn sync_now(&self) {
        let mut state = self.state.lock().await;
        if state.queue.is_empty() {
            return;
        }

        match self.sink.deliver(&state.queue).await {
            Ok(()) => {
                log_info!("delivered {} tracking event(s)", state.queue.len());
                state.queue.clear();
                state.retry_count = 0;
                self.persist(&state.queue).await;
            }
            Err(err) => {
                state.retry_count += 1;
                log_error!(
                    "tracking sync failed (attempt {}): {err:#}",
                    state.retry_count
                );
                if state.retry_count >= self.config.max_retries {
                    log_warn!(
                        "{} consecutive sync failures; events stay buffered locally",
                        state.retry_count
                    );
                }
            }
        }
    }

    /// Cancel the periodic flush. An in-flight delivery is left to finish on
    /// its own.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stop the ticker and make one last delivery attempt. This is the
    /// page-unload analog.
    pub async fn shutdown(&self) {
        self.stop();
        self.sync_now().await;
    }

    async fn persist(&self, queue: &[TrackingEvent]) {
        if let Err(err) = self.store.put(keys::TRACKING_QUEUE, queue).await {
            log_error!("failed to persist tracking queue snapshot: {err:#}");
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.queue.is_empty()
    }

    pub async fn retry_count(&self) -> u32 {
        self.state.lock().await.retry_count
    }

    /// Snapshot of the buffer, in insertion order.
    pub async fn buffered(&self) -> Vec<TrackingEvent> {
        self.state.lock().await.queue.clone()
    }
}

#[async_trait]
impl Tracker for TrackingQueue {
    async fn add(&self, event: TrackingEvent) {
        TrackingQueue::add(self, event).await;
    }

    async fn sync_now(&self) {
        TrackingQueue::sync_now(self).await;
    }

    fn stop(&self) {
        TrackingQueue::stop(self);
    }
}

/// Tracker for contexts without persistence; every operation is a no-op.
pub struct NoopTracker;

#[async_trait]
impl Tracker for NoopTracker {
    async fn add(&self, _event: TrackingEvent) {}

    async fn sync_now(&self) {}

    fn stop(&self) {}
}
