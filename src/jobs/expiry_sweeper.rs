use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::app::posts::PostService;

/// Periodically removes expired posts until shutdown is signalled.
pub async fn run(
    posts: PostService,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    info!(interval_seconds = every.as_secs(), "expiry sweeper started");
    let mut ticker = tokio::time::interval(every);
    // The first tick of an interval completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {
                match posts.sweep_expired() {
                    Ok(0) => {}
                    Ok(removed) => info!(removed, "expired posts swept"),
                    Err(err) => warn!(error = ?err, "expiry sweep failed"),
                }
            }
        }
    }

    info!("expiry sweeper stopped");
    Ok(())
}
