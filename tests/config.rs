//! Tests for environment-driven configuration.

use std::collections::HashMap;

use anyhow::Result;

use proximity_post::app::nearby::MediaFilter;
use proximity_post::config::AppConfig;
use proximity_post::domain::location::{Location, DEFAULT_LOCATION};
use proximity_post::domain::post::MediaKind;

fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_unset() {
    let config = config(&[]).unwrap();
    assert_eq!(config.http_addr, "0.0.0.0:8080");
    assert_eq!(config.app_mode, "api");
    assert_eq!(config.nearby_radius_miles, 50.0);
    assert_eq!(config.default_location, DEFAULT_LOCATION);
    assert_eq!(config.sweep_interval_seconds, 60);
    assert_eq!(config.feed_tick_seconds, 60);
    assert_eq!(config.watch_media, MediaFilter::All);
    assert!(config.seed_demo_posts);
    assert_eq!(config.viewer().id, "currentUser");
    assert_eq!(config.viewer().display_name, "You");
}

#[test]
fn overrides_are_parsed() {
    let config = config(&[
        ("NEARBY_RADIUS_MILES", "12.5"),
        ("DEFAULT_LATITUDE", "40.7128"),
        ("DEFAULT_LONGITUDE", "-74.006"),
        ("SEED_DEMO_POSTS", "false"),
        ("VIEWER_AVATAR_URL", ""),
        ("WATCH_MEDIA", "audio"),
    ])
    .unwrap();
    assert_eq!(config.nearby_radius_miles, 12.5);
    assert_eq!(config.default_location, Location::new(40.7128, -74.006));
    assert!(!config.seed_demo_posts);
    assert_eq!(config.viewer().avatar_url, None);
    assert_eq!(config.watch_media, MediaFilter::Only(MediaKind::Audio));
}

#[test]
fn rejects_bad_values() {
    assert!(config(&[("HTTP_ADDR", "not an address")]).is_err());
    assert!(config(&[("NEARBY_RADIUS_MILES", "-3")]).is_err());
    assert!(config(&[("DEFAULT_LATITUDE", "95")]).is_err());
    assert!(config(&[("SWEEP_INTERVAL_SECONDS", "0")]).is_err());
    assert!(config(&[("FEED_TICK_SECONDS", "0")]).is_err());
    assert!(config(&[("SEED_DEMO_POSTS", "maybe")]).is_err());
    assert!(config(&[("WATCH_MEDIA", "gif")]).is_err());
}
