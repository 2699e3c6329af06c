use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::app::clock::Clock;
use crate::domain::location::Location;
use crate::domain::post::{MediaKind, Post, PostDraft, VisibilityDuration};
use crate::domain::user::User;
use crate::infra::memory::{MemoryStore, StoreEvent};

/// Composer input. The author comes from the current user.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub media_kind: MediaKind,
    pub media_url: Option<String>,
    pub cover_art_url: Option<String>,
    pub text_body: Option<String>,
    pub caption: Option<String>,
    pub location: Location,
    pub duration: VisibilityDuration,
}

#[derive(Clone)]
pub struct PostService {
    store: MemoryStore,
    clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(store: MemoryStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn create_post(&self, author: &User, input: NewPost) -> Result<Post> {
        let now = self.clock.now();
        let draft = PostDraft {
            author_id: author.id.clone(),
            author_name: author.display_name.clone(),
            author_avatar_url: author.avatar_url.clone(),
            media_url: input.media_url,
            cover_art_url: input.cover_art_url,
            media_kind: input.media_kind,
            text_body: input.text_body,
            caption: input.caption,
            location: input.location,
            expires_at: input.duration.expires_at(now),
        };

        let post = self.store.write()?.create(draft, now)?;
        tracing::info!(
            post_id = %post.id,
            media_kind = post.media_kind.as_str(),
            hours = input.duration.hours(),
            "post created"
        );
        self.store.publish(StoreEvent::PostCreated(post.id));
        Ok(post)
    }

    /// Active post by id. Expired posts are swept first and read as absent.
    pub fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let now = self.clock.now();
        self.store.sweep_expired(now)?;
        Ok(self.store.read()?.get_by_id(post_id, now))
    }

    pub fn sweep_expired(&self) -> Result<usize> {
        self.store.sweep_expired(self.clock.now())
    }

    pub fn count(&self) -> Result<usize> {
        self.store.len()
    }
}
