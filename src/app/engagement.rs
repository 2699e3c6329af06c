use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::app::clock::Clock;
use crate::infra::memory::{MemoryStore, StoreEvent};

/// Likes and comments. Both only ever move a counter up by one.
#[derive(Clone)]
pub struct EngagementService {
    store: MemoryStore,
    clock: Arc<dyn Clock>,
}

impl EngagementService {
    pub fn new(store: MemoryStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// New like count, or `None` when the post is unknown or expired.
    pub fn like_post(&self, post_id: Uuid) -> Result<Option<u32>> {
        let now = self.clock.now();
        let like_count = self.store.write()?.like(post_id, now);
        if like_count.is_some() {
            self.store.publish(StoreEvent::PostUpdated(post_id));
        }
        Ok(like_count)
    }

    /// New comment count, or `None` when the post is unknown or expired.
    /// The text is logged and then dropped.
    pub fn comment_post(&self, post_id: Uuid, text: &str) -> Result<Option<u32>> {
        let now = self.clock.now();
        let comment_count = self.store.write()?.comment(post_id, text, now);
        if comment_count.is_some() {
            self.store.publish(StoreEvent::PostUpdated(post_id));
        }
        Ok(comment_count)
    }
}
