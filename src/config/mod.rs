use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;

use crate::app::nearby::MediaFilter;
use crate::domain::location::{Location, DEFAULT_LOCATION};
use crate::domain::user::User;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub app_mode: String,
    pub nearby_radius_miles: f64,
    pub default_location: Location,
    pub sweep_interval_seconds: u64,
    pub feed_tick_seconds: u64,
    pub watch_media: MediaFilter,
    pub seed_demo_posts: bool,
    pub viewer_id: String,
    pub viewer_name: String,
    pub viewer_avatar_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_addr = env_or(&lookup, "HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        let app_mode = env_or(&lookup, "APP_MODE", "api");

        let nearby_radius_miles: f64 = env_or_parse(&lookup, "NEARBY_RADIUS_MILES", "50")?;
        if nearby_radius_miles.is_nan() || nearby_radius_miles <= 0.0 {
            return Err(anyhow!("invalid NEARBY_RADIUS_MILES: must be positive"));
        }

        let default_location = Location::new(
            env_or_parse(
                &lookup,
                "DEFAULT_LATITUDE",
                &DEFAULT_LOCATION.latitude.to_string(),
            )?,
            env_or_parse(
                &lookup,
                "DEFAULT_LONGITUDE",
                &DEFAULT_LOCATION.longitude.to_string(),
            )?,
        );
        if !default_location.is_valid() {
            return Err(anyhow!("invalid DEFAULT_LATITUDE/DEFAULT_LONGITUDE: out of range"));
        }

        let sweep_interval_seconds: u64 = env_or_parse(&lookup, "SWEEP_INTERVAL_SECONDS", "60")?;
        let feed_tick_seconds: u64 = env_or_parse(&lookup, "FEED_TICK_SECONDS", "60")?;
        if sweep_interval_seconds == 0 || feed_tick_seconds == 0 {
            return Err(anyhow!("intervals must be at least one second"));
        }

        let watch_media = env_or(&lookup, "WATCH_MEDIA", "all");
        let watch_media = MediaFilter::parse(&watch_media)
            .ok_or_else(|| anyhow!("invalid WATCH_MEDIA: {}", watch_media))?;

        Ok(Self {
            http_addr,
            app_mode,
            nearby_radius_miles,
            default_location,
            sweep_interval_seconds,
            feed_tick_seconds,
            watch_media,
            seed_demo_posts: env_or_parse(&lookup, "SEED_DEMO_POSTS", "true")?,
            viewer_id: env_or(&lookup, "VIEWER_ID", "currentUser"),
            viewer_name: env_or(&lookup, "VIEWER_NAME", "You"),
            viewer_avatar_url: Some(env_or(
                &lookup,
                "VIEWER_AVATAR_URL",
                "https://picsum.photos/seed/currentUser/40/40",
            ))
            .filter(|url| !url.is_empty()),
        })
    }

    pub fn viewer(&self) -> User {
        let user = User::new(self.viewer_id.clone(), self.viewer_name.clone());
        match &self.viewer_avatar_url {
            Some(url) => user.with_avatar(url.clone()),
            None => user,
        }
    }
}

fn env_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn env_or_parse<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = env_or(lookup, key, default);
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
