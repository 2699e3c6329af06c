use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::feed::FeedService;
use crate::app::feed_state::{FeedController, FeedSnapshot, FetchTicket, RefreshTrigger};
use crate::app::location::Locator;
use crate::app::nearby::MediaFilter;
use crate::infra::memory::FeedSignal;

/// Keeps a live nearby feed: loads once, reloads on feed signals, and drops
/// expired posts on a fixed tick without going back to the store.
pub struct FeedWatcher {
    feed: FeedService,
    locator: Arc<dyn Locator>,
    filter: MediaFilter,
    tick_every: Duration,
}

impl FeedWatcher {
    pub fn new(feed: FeedService, locator: Arc<dyn Locator>, tick_every: Duration) -> Self {
        Self {
            feed,
            locator,
            filter: MediaFilter::All,
            tick_every,
        }
    }

    pub fn with_filter(mut self, filter: MediaFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Runs the watcher on its own task. Every state change is published on
    /// the returned receiver.
    pub fn spawn(
        self,
        shutdown: broadcast::Receiver<()>,
    ) -> (JoinHandle<Result<()>>, watch::Receiver<FeedSnapshot>) {
        let (updates, snapshots) = watch::channel(FeedController::new().snapshot());
        let handle = tokio::spawn(self.run(updates, shutdown));
        (handle, snapshots)
    }

    pub async fn run(
        self,
        updates: watch::Sender<FeedSnapshot>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        let mut controller = FeedController::new();
        controller.set_filter(self.filter);

        // Subscribe before the first load so a post created meanwhile still triggers a reload.
        let mut events = self.feed.subscribe();

        if let Some(ticket) = controller.start() {
            self.fetch(&mut controller, ticket);
            updates.send_replace(controller.snapshot());
        }

        let mut ticker = tokio::time::interval(self.tick_every);
        ticker.tick().await;
        info!(tick_seconds = self.tick_every.as_secs(), "feed watcher started");

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = ticker.tick() => {
                    let removed = controller.tick(self.feed.clock().now());
                    if removed > 0 {
                        debug!(removed, "expired posts dropped from feed");
                        updates.send_replace(controller.snapshot());
                    }
                }
                event = events.recv() => {
                    let signal = match event {
                        Ok(event) => event.feed_signal(),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "feed watcher lagged behind store events");
                            Some(FeedSignal::RefreshFeed)
                        }
                        Err(RecvError::Closed) => break,
                    };
                    if let Some(signal) = signal {
                        if let Some(ticket) = controller.refresh(RefreshTrigger::Signal(signal)) {
                            self.fetch(&mut controller, ticket);
                            updates.send_replace(controller.snapshot());
                        }
                    }
                }
            }
        }

        info!("feed watcher stopped");
        Ok(())
    }

    fn fetch(&self, controller: &mut FeedController, ticket: FetchTicket) {
        // The controller applies the media filter itself, so fetch everything.
        let result = self
            .feed
            .load(self.locator.as_ref(), None, MediaFilter::All);
        controller.complete(ticket, result);
    }
}
