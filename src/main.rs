use anyhow::anyhow;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proximity_post::app::clock::{RandomIds, SystemClock};
use proximity_post::app::location::FixedLocator;
use proximity_post::app::posts::PostService;
use proximity_post::config::AppConfig;
use proximity_post::jobs::{expiry_sweeper, feed_watcher::FeedWatcher};
use proximity_post::{http, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config, Arc::new(SystemClock), Arc::new(RandomIds))?;

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let sweeper = tokio::spawn(expiry_sweeper::run(
        PostService::new(state.store.clone(), state.clock.clone()),
        Duration::from_secs(config.sweep_interval_seconds),
        shutdown_tx.subscribe(),
    ));

    match config.app_mode.as_str() {
        "api" => {
            let app: Router = http::router(state).layer(TraceLayer::new_for_http());
            let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
            tracing::info!("listening on {}", config.http_addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        "watch" => {
            tracing::info!("starting feed watch mode");
            let locator = Arc::new(FixedLocator(config.default_location));
            let watcher = FeedWatcher::new(
                state.feed_service(),
                locator,
                Duration::from_secs(config.feed_tick_seconds),
            )
            .with_filter(config.watch_media);
            let (handle, mut snapshots) = watcher.spawn(shutdown_tx.subscribe());
            let shutdown = shutdown_signal();
            tokio::pin!(shutdown);

            loop {
                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let snapshot = snapshots.borrow_and_update().clone();
                        tracing::info!(
                            status = ?snapshot.status,
                            posts = snapshot.posts.len(),
                            error = snapshot.error.as_deref().unwrap_or(""),
                            "feed updated"
                        );
                    }
                    _ = &mut shutdown => break,
                }
            }

            let _ = shutdown_tx.send(());
            handle.await??;
        }
        other => return Err(anyhow!("unknown APP_MODE: {}", other)),
    }

    let _ = shutdown_tx.send(());
    sweeper.await??;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
