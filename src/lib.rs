pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;
pub mod jobs;

use std::sync::Arc;

use anyhow::Result;

use crate::app::clock::{Clock, IdGenerator};
use crate::app::feed::FeedService;
use crate::config::AppConfig;
use crate::domain::location::Location;
use crate::domain::user::User;
use crate::infra::{memory::MemoryStore, seed};

#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub clock: Arc<dyn Clock>,
    pub viewer: User,
    pub nearby_radius_miles: f64,
    pub default_location: Location,
}

impl AppState {
    pub fn from_config(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let store = MemoryStore::new(ids.clone());
        if config.seed_demo_posts {
            let seeded = seed::seed_demo_posts(&mut *store.write()?, ids.as_ref(), clock.now());
            tracing::info!(seeded, "loaded demo posts");
        }

        Ok(Self {
            store,
            clock,
            viewer: config.viewer(),
            nearby_radius_miles: config.nearby_radius_miles,
            default_location: config.default_location,
        })
    }

    pub fn feed_service(&self) -> FeedService {
        FeedService::new(
            self.store.clone(),
            self.clock.clone(),
            self.nearby_radius_miles,
            self.default_location,
        )
    }
}
