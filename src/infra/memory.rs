use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::app::clock::IdGenerator;
use crate::domain::post::{Post, PostDraft};

const EVENT_CAPACITY: usize = 64;

/// Change notifications published by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    PostCreated(Uuid),
    PostUpdated(Uuid),
    Swept(usize),
    RefreshRequested,
}

/// What a feed reacts to. Likes and sweeps do not refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSignal {
    PostCreated,
    RefreshFeed,
}

impl StoreEvent {
    pub fn feed_signal(&self) -> Option<FeedSignal> {
        match self {
            Self::PostCreated(_) => Some(FeedSignal::PostCreated),
            Self::RefreshRequested => Some(FeedSignal::RefreshFeed),
            Self::PostUpdated(_) | Self::Swept(_) => None,
        }
    }
}

/// The canonical post list, newest insertions first.
///
/// Every time-dependent call takes `now` explicitly.
pub struct PostRepository {
    posts: Vec<Post>,
    ids: Arc<dyn IdGenerator>,
}

impl PostRepository {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            posts: Vec::new(),
            ids,
        }
    }

    pub fn create(&mut self, draft: PostDraft, now: OffsetDateTime) -> Result<Post> {
        if draft.expires_at <= now {
            return Err(anyhow!("expires_at must be later than the creation time"));
        }

        let post = Post {
            id: self.ids.next_id(),
            author_id: draft.author_id,
            author_name: draft.author_name,
            author_avatar_url: draft.author_avatar_url,
            media_url: draft.media_url,
            cover_art_url: draft.cover_art_url,
            media_kind: draft.media_kind,
            text_body: draft.text_body,
            caption: draft.caption,
            location: draft.location,
            created_at: now,
            expires_at: draft.expires_at,
            like_count: 0,
            comment_count: 0,
        };
        self.posts.insert(0, post.clone());
        Ok(post)
    }

    /// Appends an already-built post as is, for fixtures.
    pub fn restore(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn get_by_id(&self, id: Uuid, now: OffsetDateTime) -> Option<Post> {
        self.active(id, now).cloned()
    }

    pub fn like(&mut self, id: Uuid, now: OffsetDateTime) -> Option<u32> {
        let post = self.active_mut(id, now)?;
        post.like_count = post.like_count.saturating_add(1);
        Some(post.like_count)
    }

    pub fn comment(&mut self, id: Uuid, text: &str, now: OffsetDateTime) -> Option<u32> {
        let post = self.active_mut(id, now)?;
        post.comment_count = post.comment_count.saturating_add(1);
        // Comment bodies are not kept anywhere; only the counter moves.
        info!(post_id = %id, comment = text, "comment received");
        Some(post.comment_count)
    }

    pub fn sweep_expired(&mut self, now: OffsetDateTime) -> usize {
        let before = self.posts.len();
        self.posts.retain(|post| post.is_active(now));
        let removed = before - self.posts.len();
        if removed > 0 {
            debug!(removed, remaining = self.posts.len(), "swept expired posts");
        }
        removed
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn active(&self, id: Uuid, now: OffsetDateTime) -> Option<&Post> {
        self.posts
            .iter()
            .find(|post| post.id == id && post.is_active(now))
    }

    fn active_mut(&mut self, id: Uuid, now: OffsetDateTime) -> Option<&mut Post> {
        self.posts
            .iter_mut()
            .find(|post| post.id == id && post.is_active(now))
    }
}

/// Shared handle to the repository plus its change feed.
#[derive(Clone)]
pub struct MemoryStore {
    repository: Arc<RwLock<PostRepository>>,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            repository: Arc::new(RwLock::new(PostRepository::new(ids))),
            events,
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, PostRepository>> {
        self.repository
            .read()
            .map_err(|_| anyhow!("post store lock poisoned"))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, PostRepository>> {
        self.repository
            .write()
            .map_err(|_| anyhow!("post store lock poisoned"))
    }

    /// Registers a new observer. Events sent before this call are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn publish(&self, event: StoreEvent) {
        // No subscribers is the normal case for a plain API process.
        let _ = self.events.send(event);
    }

    /// Drops expired posts and publishes `Swept` when anything was removed.
    /// Every sweep, scheduled or triggered by a read, goes through here.
    pub fn sweep_expired(&self, now: OffsetDateTime) -> Result<usize> {
        let removed = self.write()?.sweep_expired(now);
        if removed > 0 {
            self.publish(StoreEvent::Swept(removed));
        }
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
