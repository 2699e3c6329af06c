use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use crate::app::clock::Clock;
use crate::app::location::{resolve_location, LocationError, Locator, ResolvedLocation};
use crate::app::nearby::{nearby_with_distance, MediaFilter};
use crate::domain::location::Location;
use crate::domain::post::NearbyPost;
use crate::infra::memory::{MemoryStore, StoreEvent};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),
    #[error("post not found or has expired")]
    PostNotFoundOrExpired,
    #[error("could not load posts")]
    FetchFailed(#[source] anyhow::Error),
}

/// One answer to "what is near me right now".
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub items: Vec<NearbyPost>,
    pub origin: ResolvedLocation,
    pub radius_miles: f64,
}

#[derive(Clone)]
pub struct FeedService {
    store: MemoryStore,
    clock: Arc<dyn Clock>,
    default_radius_miles: f64,
    fallback_location: Location,
}

impl FeedService {
    pub fn new(
        store: MemoryStore,
        clock: Arc<dyn Clock>,
        default_radius_miles: f64,
        fallback_location: Location,
    ) -> Self {
        Self {
            store,
            clock,
            default_radius_miles,
            fallback_location,
        }
    }

    /// Sweeps, then runs the nearby query around `origin`.
    pub fn nearby(
        &self,
        origin: Location,
        radius_miles: Option<f64>,
        filter: MediaFilter,
    ) -> anyhow::Result<Vec<NearbyPost>> {
        let now = self.clock.now();
        let radius = radius_miles.unwrap_or(self.default_radius_miles);

        self.store.sweep_expired(now)?;
        let repository = self.store.read()?;
        let items: Vec<NearbyPost> = nearby_with_distance(repository.posts(), origin, radius, now)
            .into_iter()
            .filter(|nearby| filter.matches(&nearby.post))
            .collect();

        debug!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            radius,
            count = items.len(),
            "nearby query"
        );
        Ok(items)
    }

    /// Resolves the viewer's location (falling back when needed) and loads the feed.
    pub fn load(
        &self,
        locator: &dyn Locator,
        radius_miles: Option<f64>,
        filter: MediaFilter,
    ) -> Result<FeedPage, FeedError> {
        let origin = resolve_location(locator, self.fallback_location);
        let radius = radius_miles.unwrap_or(self.default_radius_miles);
        let items = self
            .nearby(origin.location, Some(radius), filter)
            .map_err(FeedError::FetchFailed)?;

        Ok(FeedPage {
            items,
            origin,
            radius_miles: radius,
        })
    }

    /// Asks every subscribed feed to reload.
    pub fn refresh_feed(&self) {
        self.store.publish(StoreEvent::RefreshRequested);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
