//! Tests for the feed state machine and the pull-to-refresh gesture.

use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use proximity_post::app::feed::{FeedError, FeedPage};
use proximity_post::app::feed_state::{
    FeedController, FeedStatus, PullToRefresh, RefreshTrigger, LOAD_ERROR_MESSAGE,
    PULL_THRESHOLD_PX,
};
use proximity_post::app::location::ResolvedLocation;
use proximity_post::app::nearby::MediaFilter;
use proximity_post::domain::location::DEFAULT_LOCATION;
use proximity_post::domain::post::{MediaKind, NearbyPost, Post};
use proximity_post::infra::memory::FeedSignal;

const NOW: OffsetDateTime = datetime!(2024-05-01 12:00 UTC);

fn nearby(n: u128, kind: MediaKind, ttl: Duration) -> NearbyPost {
    NearbyPost {
        post: Post {
            id: Uuid::from_u128(n),
            author_id: "user".into(),
            author_name: "User".into(),
            author_avatar_url: None,
            media_url: None,
            cover_art_url: None,
            media_kind: kind,
            text_body: None,
            caption: None,
            location: DEFAULT_LOCATION,
            created_at: NOW - Duration::minutes(5),
            expires_at: NOW + ttl,
            like_count: 0,
            comment_count: 0,
        },
        distance_miles: 0.0,
        expires_in_seconds: ttl.whole_seconds(),
    }
}

fn page(items: Vec<NearbyPost>) -> Result<FeedPage, FeedError> {
    Ok(FeedPage {
        items,
        origin: ResolvedLocation {
            location: DEFAULT_LOCATION,
            notice: None,
        },
        radius_miles: 50.0,
    })
}

fn failure() -> Result<FeedPage, FeedError> {
    Err(FeedError::FetchFailed(anyhow::anyhow!("store unavailable")))
}

fn loaded(items: Vec<NearbyPost>) -> FeedController {
    let mut feed = FeedController::new();
    let ticket = feed.start().unwrap();
    feed.complete(ticket, page(items));
    feed
}

#[test]
fn initial_load_moves_through_loading() {
    let mut feed = FeedController::new();
    assert_eq!(feed.status(), FeedStatus::Idle);

    let ticket = feed.start().unwrap();
    assert_eq!(ticket.trigger, None);
    assert_eq!(feed.status(), FeedStatus::Loading);
    assert!(feed.start().is_none());

    feed.complete(
        ticket,
        page(vec![nearby(1, MediaKind::Text, Duration::hours(1))]),
    );
    assert_eq!(feed.status(), FeedStatus::Loaded);
    assert_eq!(feed.visible_posts().len(), 1);
}

#[test]
fn failed_load_is_retryable() {
    let mut feed = FeedController::new();
    let ticket = feed.start().unwrap();
    feed.complete(ticket, failure());
    assert_eq!(feed.status(), FeedStatus::Errored);
    assert_eq!(feed.error(), Some(LOAD_ERROR_MESSAGE));

    let retry = feed.retry().unwrap();
    assert_eq!(feed.status(), FeedStatus::Refreshing);
    assert_eq!(feed.error(), None);

    feed.complete(retry, page(vec![]));
    assert_eq!(feed.status(), FeedStatus::Loaded);
    assert!(feed.retry().is_none());
}

#[test]
fn refresh_from_loaded_replaces_posts() {
    let mut feed = loaded(vec![nearby(1, MediaKind::Text, Duration::hours(1))]);
    let ticket = feed
        .refresh(RefreshTrigger::Signal(FeedSignal::PostCreated))
        .unwrap();
    assert_eq!(feed.status(), FeedStatus::Refreshing);

    feed.complete(
        ticket,
        page(vec![
            nearby(2, MediaKind::Text, Duration::hours(1)),
            nearby(1, MediaKind::Text, Duration::hours(1)),
        ]),
    );
    assert_eq!(feed.status(), FeedStatus::Loaded);
    assert_eq!(feed.visible_posts()[0].post.id, Uuid::from_u128(2));
}

#[test]
fn last_resolved_fetch_wins() {
    let mut feed = loaded(vec![]);
    let first = feed.refresh(RefreshTrigger::Manual).unwrap();
    let second = feed
        .refresh(RefreshTrigger::Signal(FeedSignal::RefreshFeed))
        .unwrap();
    assert!(second.seq > first.seq);

    feed.complete(
        second,
        page(vec![nearby(2, MediaKind::Text, Duration::hours(1))]),
    );
    assert_eq!(feed.status(), FeedStatus::Refreshing);

    // The older request resolves later and overwrites the newer result.
    feed.complete(
        first,
        page(vec![nearby(1, MediaKind::Text, Duration::hours(1))]),
    );
    assert_eq!(feed.status(), FeedStatus::Loaded);
    let ids: Vec<_> = feed.visible_posts().iter().map(|n| n.post.id).collect();
    assert_eq!(ids, vec![Uuid::from_u128(1)]);
}

#[test]
fn tick_drops_newly_expired_posts() {
    let mut feed = loaded(vec![
        nearby(1, MediaKind::Text, Duration::minutes(1)),
        nearby(2, MediaKind::Text, Duration::hours(1)),
    ]);

    assert_eq!(feed.tick(NOW), 0);
    assert_eq!(feed.tick(NOW + Duration::minutes(1)), 1);
    assert_eq!(feed.visible_posts().len(), 1);
    assert_eq!(feed.status(), FeedStatus::Loaded);
}

#[test]
fn filter_hides_other_media() {
    let mut feed = loaded(vec![
        nearby(1, MediaKind::Image, Duration::hours(1)),
        nearby(2, MediaKind::Audio, Duration::hours(1)),
    ]);
    feed.set_filter(MediaFilter::Only(MediaKind::Audio));
    let snapshot = feed.snapshot();
    assert_eq!(snapshot.posts.len(), 1);
    assert_eq!(snapshot.posts[0].post.media_kind, MediaKind::Audio);
}

#[test]
fn pull_past_threshold_triggers_one_refresh() {
    let mut feed = loaded(vec![]);
    assert!(feed.touch_start(100.0, true));
    assert_eq!(feed.touch_move(135.0), 0.5);
    assert_eq!(feed.touch_move(200.0), 1.0);

    let ticket = feed.touch_end().unwrap();
    assert_eq!(ticket.trigger, Some(RefreshTrigger::Pull));
    assert_eq!(feed.status(), FeedStatus::Refreshing);
    assert!(!feed.pull().is_armed());
    assert_eq!(feed.pull().progress(), 0.0);
}

#[test]
fn short_pull_cancels() {
    let mut feed = loaded(vec![]);
    assert!(feed.touch_start(100.0, true));
    feed.touch_move(160.0);
    assert!(feed.touch_end().is_none());
    assert_eq!(feed.status(), FeedStatus::Loaded);
}

#[test]
fn upward_drag_resets_progress() {
    let mut pull = PullToRefresh::default();
    assert!(pull.touch_start(100.0, true, false));
    pull.touch_move(150.0);
    assert_eq!(pull.touch_move(90.0), 0.0);
    assert!(!pull.touch_end());
}

#[test]
fn pull_only_arms_at_top_and_when_idle() {
    let mut feed = loaded(vec![]);
    assert!(!feed.touch_start(100.0, false));
    feed.touch_move(400.0);
    assert!(feed.touch_end().is_none());

    feed.refresh(RefreshTrigger::Manual).unwrap();
    assert!(!feed.touch_start(100.0, true));
}

#[test]
fn failed_pull_refresh_keeps_posts_silently() {
    let mut feed = loaded(vec![nearby(1, MediaKind::Text, Duration::hours(1))]);
    feed.touch_start(0.0, true);
    feed.touch_move(PULL_THRESHOLD_PX);
    let ticket = feed.touch_end().unwrap();

    feed.complete(ticket, failure());
    assert_eq!(feed.status(), FeedStatus::Loaded);
    assert_eq!(feed.error(), None);
    assert_eq!(feed.visible_posts().len(), 1);
}

#[test]
fn failed_signal_refresh_keeps_posts_and_reports() {
    let mut feed = loaded(vec![nearby(1, MediaKind::Text, Duration::hours(1))]);
    let ticket = feed
        .refresh(RefreshTrigger::Signal(FeedSignal::RefreshFeed))
        .unwrap();
    feed.complete(ticket, failure());
    assert_eq!(feed.status(), FeedStatus::Errored);
    assert_eq!(feed.visible_posts().len(), 1);
}
