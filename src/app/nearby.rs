use time::OffsetDateTime;

use crate::domain::location::{distance_miles, Location};
use crate::domain::post::{MediaKind, NearbyPost, Post};

pub const DEFAULT_RADIUS_MILES: f64 = 50.0;

/// Active posts within `radius_miles` of `origin`, newest first.
///
/// Expired posts (`expires_at <= now`) and posts farther than the radius are
/// dropped. Posts with equal `created_at` keep their relative input order. The
/// input is left untouched.
pub fn query_nearby(
    all: &[Post],
    origin: Location,
    radius_miles: f64,
    now: OffsetDateTime,
) -> Vec<Post> {
    nearby_with_distance(all, origin, radius_miles, now)
        .into_iter()
        .map(|nearby| nearby.post)
        .collect()
}

/// Same selection and order as [`query_nearby`], keeping each post's distance.
pub fn nearby_with_distance(
    all: &[Post],
    origin: Location,
    radius_miles: f64,
    now: OffsetDateTime,
) -> Vec<NearbyPost> {
    let mut nearby: Vec<NearbyPost> = all
        .iter()
        .filter(|post| post.is_active(now))
        .filter_map(|post| {
            let distance = distance_miles(&origin, &post.location);
            (distance <= radius_miles).then(|| NearbyPost {
                post: post.clone(),
                distance_miles: distance,
                expires_in_seconds: post.seconds_until_expiry(now),
            })
        })
        .collect();

    // sort_by is stable, so ties stay in store order.
    nearby.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
    nearby
}

/// Which media kinds a feed shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFilter {
    #[default]
    All,
    Only(MediaKind),
}

impl MediaFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            other => MediaKind::parse(other).map(Self::Only),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => post.media_kind == *kind,
        }
    }
}
