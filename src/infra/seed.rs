use time::{Duration, OffsetDateTime};

use crate::app::clock::IdGenerator;
use crate::domain::location::{Location, DEFAULT_LOCATION};
use crate::domain::post::{MediaKind, Post};
use crate::infra::memory::PostRepository;

struct Fixture {
    author_id: &'static str,
    author_name: &'static str,
    avatar: bool,
    media_url: Option<&'static str>,
    media_kind: MediaKind,
    text_body: Option<&'static str>,
    caption: Option<&'static str>,
    location: Location,
    age: Duration,
    ttl: Duration,
    like_count: u32,
    comment_count: u32,
}

fn fixtures() -> Vec<Fixture> {
    let day = Duration::hours(24);
    vec![
        Fixture {
            author_id: "user1",
            author_name: "Alice",
            avatar: true,
            media_url: Some("https://picsum.photos/seed/post1/600/400"),
            media_kind: MediaKind::Image,
            text_body: None,
            caption: Some("Beautiful sunset view from Griffith Observatory!"),
            location: DEFAULT_LOCATION.offset(0.05, -0.02),
            age: Duration::minutes(30),
            ttl: day,
            like_count: 15,
            comment_count: 3,
        },
        Fixture {
            author_id: "user2",
            author_name: "Bob",
            avatar: true,
            media_url: Some("https://sample-videos.com/video123/mp4/720/big_buck_bunny_720p_1mb.mp4"),
            media_kind: MediaKind::Video,
            text_body: None,
            caption: Some("Street performers at Santa Monica Pier."),
            location: DEFAULT_LOCATION.offset(-0.1, -0.3),
            age: Duration::hours(2),
            ttl: Duration::hours(12),
            like_count: 28,
            comment_count: 7,
        },
        Fixture {
            author_id: "user3",
            author_name: "Charlie",
            avatar: false,
            media_url: Some("https://interactive-examples.mdn.mozilla.net/media/cc0-audio/t-rex-roar.mp3"),
            media_kind: MediaKind::Audio,
            text_body: None,
            caption: Some("Cool music playing in Echo Park."),
            location: DEFAULT_LOCATION.offset(0.02, 0.01),
            age: Duration::hours(5),
            ttl: Duration::hours(72),
            like_count: 8,
            comment_count: 1,
        },
        Fixture {
            author_id: "user4",
            author_name: "Diana",
            avatar: true,
            media_url: Some("https://picsum.photos/seed/post4/600/800"),
            media_kind: MediaKind::Image,
            text_body: None,
            caption: Some("Amazing tacos downtown!"),
            location: DEFAULT_LOCATION.offset(0.005, -0.005),
            age: day,
            ttl: day,
            like_count: 42,
            comment_count: 11,
        },
        Fixture {
            author_id: "user5",
            author_name: "Eve",
            avatar: true,
            media_url: Some("https://picsum.photos/seed/post5/700/500"),
            media_kind: MediaKind::Image,
            text_body: None,
            caption: Some("Hiking in the hills near the city."),
            location: DEFAULT_LOCATION.offset(0.15, 0.1),
            age: Duration::hours(48),
            ttl: Duration::hours(168),
            like_count: 33,
            comment_count: 5,
        },
        Fixture {
            author_id: "user6",
            author_name: "Frank",
            avatar: true,
            media_url: Some("https://picsum.photos/seed/post6/500/500"),
            media_kind: MediaKind::Image,
            text_body: None,
            caption: Some("Greetings from San Francisco!"),
            location: Location::new(37.7749, -122.4194),
            age: Duration::hours(72),
            ttl: day,
            like_count: 101,
            comment_count: 25,
        },
        Fixture {
            author_id: "user7",
            author_name: "Grace",
            avatar: true,
            media_url: None,
            media_kind: MediaKind::Text,
            text_body: Some(
                "Just saw the coolest mural on 5th street! \nHighly recommend checking it out if you are around.",
            ),
            caption: Some("Mural Sighting"),
            location: DEFAULT_LOCATION.offset(0.002, 0.001),
            age: Duration::minutes(15),
            ttl: day,
            like_count: 5,
            comment_count: 0,
        },
        Fixture {
            author_id: "userExpired",
            author_name: "Old Timer",
            avatar: false,
            media_url: None,
            media_kind: MediaKind::Text,
            text_body: Some("This post should have expired already."),
            caption: None,
            location: DEFAULT_LOCATION.offset(0.01, 0.01),
            age: Duration::hours(48),
            ttl: -Duration::hours(1),
            like_count: 10,
            comment_count: 2,
        },
    ]
}

/// Demo posts around Los Angeles, timed relative to `now`.
///
/// `ttl` counts from `now`, not from creation, so the last entry is already expired.
pub fn demo_posts(ids: &dyn IdGenerator, now: OffsetDateTime) -> Vec<Post> {
    fixtures()
        .into_iter()
        .map(|fixture| Post {
            id: ids.next_id(),
            author_avatar_url: fixture
                .avatar
                .then(|| format!("https://picsum.photos/seed/{}/40/40", fixture.author_id)),
            author_id: fixture.author_id.to_string(),
            author_name: fixture.author_name.to_string(),
            media_url: fixture.media_url.map(str::to_string),
            cover_art_url: None,
            media_kind: fixture.media_kind,
            text_body: fixture.text_body.map(str::to_string),
            caption: fixture.caption.map(str::to_string),
            location: fixture.location,
            created_at: now - fixture.age,
            expires_at: now + fixture.ttl,
            like_count: fixture.like_count,
            comment_count: fixture.comment_count,
        })
        .collect()
}

/// Loads the demo posts into the repository. Returns how many were added.
pub fn seed_demo_posts(
    repository: &mut PostRepository,
    ids: &dyn IdGenerator,
    now: OffsetDateTime,
) -> usize {
    let posts = demo_posts(ids, now);
    let count = posts.len();
    for post in posts {
        repository.restore(post);
    }
    count
}
