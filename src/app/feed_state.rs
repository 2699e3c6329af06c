//! Viewer-side feed state: what is loaded, whether a fetch is running, and the
//! pull-to-refresh gesture that can start one.
//!
//! The controller does no I/O. A caller asks it for a [`FetchTicket`], performs
//! the fetch however it likes, and hands the result back through
//! [`FeedController::complete`]. Overlapping fetches are allowed and the last
//! one to resolve wins, regardless of the order they were issued in.

use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::app::feed::{FeedError, FeedPage};
use crate::app::location::LocationNotice;
use crate::app::nearby::MediaFilter;
use crate::domain::post::NearbyPost;
use crate::infra::memory::FeedSignal;

/// Drag distance, in pixels, that arms a refresh.
pub const PULL_THRESHOLD_PX: f64 = 70.0;

pub const LOAD_ERROR_MESSAGE: &str = "Could not load posts. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Manual,
    Pull,
    Signal(FeedSignal),
}

/// Handle for one in-flight fetch. `trigger` is `None` for the initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub trigger: Option<RefreshTrigger>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub status: FeedStatus,
    pub posts: Vec<NearbyPost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_notice: Option<LocationNotice>,
}

#[derive(Debug, Clone)]
pub struct PullToRefresh {
    threshold: f64,
    start_y: Option<f64>,
    progress: f64,
}

impl Default for PullToRefresh {
    fn default() -> Self {
        Self::new(PULL_THRESHOLD_PX)
    }
}

impl PullToRefresh {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_y: None,
            progress: 0.0,
        }
    }

    /// Arms the gesture only at the top of the list and while idle.
    pub fn touch_start(&mut self, y: f64, at_top: bool, busy: bool) -> bool {
        self.progress = 0.0;
        if at_top && !busy {
            self.start_y = Some(y);
            true
        } else {
            self.start_y = None;
            false
        }
    }

    /// Progress toward the threshold in [0, 1].
    pub fn touch_move(&mut self, y: f64) -> f64 {
        if let Some(start) = self.start_y {
            let pulled = y - start;
            self.progress = if pulled > 0.0 {
                (pulled / self.threshold).min(1.0)
            } else {
                0.0
            };
        }
        self.progress
    }

    /// True when the release should trigger exactly one refresh.
    pub fn touch_end(&mut self) -> bool {
        let armed = self.start_y.take().is_some();
        let fire = armed && self.progress >= 1.0;
        self.progress = 0.0;
        fire
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_armed(&self) -> bool {
        self.start_y.is_some()
    }
}

#[derive(Debug)]
pub struct FeedController {
    status: FeedStatus,
    posts: Vec<NearbyPost>,
    error: Option<String>,
    notice: Option<LocationNotice>,
    filter: MediaFilter,
    pull: PullToRefresh,
    issued: u64,
    in_flight: usize,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedController {
    pub fn new() -> Self {
        Self {
            status: FeedStatus::Idle,
            posts: Vec::new(),
            error: None,
            notice: None,
            filter: MediaFilter::All,
            pull: PullToRefresh::default(),
            issued: 0,
            in_flight: 0,
        }
    }

    /// Initial load. Only valid once, from `Idle`.
    pub fn start(&mut self) -> Option<FetchTicket> {
        if self.status != FeedStatus::Idle {
            return None;
        }
        self.status = FeedStatus::Loading;
        Some(self.issue(None))
    }

    pub fn refresh(&mut self, trigger: RefreshTrigger) -> Option<FetchTicket> {
        match self.status {
            FeedStatus::Idle => self.status = FeedStatus::Loading,
            FeedStatus::Loaded | FeedStatus::Errored => self.status = FeedStatus::Refreshing,
            FeedStatus::Loading | FeedStatus::Refreshing => {}
        }
        if trigger != RefreshTrigger::Pull {
            self.error = None;
        }
        Some(self.issue(Some(trigger)))
    }

    /// Manual retry after a failure.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.status != FeedStatus::Errored {
            return None;
        }
        self.refresh(RefreshTrigger::Manual)
    }

    /// Applies a fetch result. Whatever resolves last overwrites the list.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<FeedPage, FeedError>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match result {
            Ok(page) => {
                self.posts = page.items;
                self.notice = page.origin.notice;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, seq = ticket.seq, "feed fetch failed");
                // Pull refreshes fail quietly and keep what is already shown.
                if ticket.trigger != Some(RefreshTrigger::Pull) {
                    self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                }
            }
        }

        if self.in_flight == 0 {
            self.status = if self.error.is_some() {
                FeedStatus::Errored
            } else {
                FeedStatus::Loaded
            };
        }
    }

    /// Drops loaded posts that expired since the last fetch, without refetching.
    pub fn tick(&mut self, now: OffsetDateTime) -> usize {
        let before = self.posts.len();
        self.posts.retain(|nearby| nearby.post.is_active(now));
        before - self.posts.len()
    }

    pub fn set_filter(&mut self, filter: MediaFilter) {
        self.filter = filter;
    }

    pub fn touch_start(&mut self, y: f64, at_top: bool) -> bool {
        let busy = self.is_busy();
        self.pull.touch_start(y, at_top, busy)
    }

    pub fn touch_move(&mut self, y: f64) -> f64 {
        self.pull.touch_move(y)
    }

    pub fn touch_end(&mut self) -> Option<FetchTicket> {
        if self.pull.touch_end() {
            self.refresh(RefreshTrigger::Pull)
        } else {
            None
        }
    }

    pub fn pull(&self) -> &PullToRefresh {
        &self.pull
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.status, FeedStatus::Loading | FeedStatus::Refreshing)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&LocationNotice> {
        self.notice.as_ref()
    }

    /// Loaded posts that pass the media filter.
    pub fn visible_posts(&self) -> Vec<&NearbyPost> {
        self.posts
            .iter()
            .filter(|nearby| self.filter.matches(&nearby.post))
            .collect()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            status: self.status,
            posts: self.visible_posts().into_iter().cloned().collect(),
            error: self.error.clone(),
            location_notice: self.notice.clone(),
        }
    }

    fn issue(&mut self, trigger: Option<RefreshTrigger>) -> FetchTicket {
        self.issued += 1;
        self.in_flight += 1;
        FetchTicket {
            seq: self.issued,
            trigger,
        }
    }
}
