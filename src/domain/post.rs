use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::domain::location::Location;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_art_url: Option<String>,
    pub media_kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub location: Location,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub like_count: u32,
    pub comment_count: u32,
}

impl Post {
    /// A post stays visible strictly before its expiry instant.
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }

    /// Whole seconds left before expiry, zero once expired.
    pub fn seconds_until_expiry(&self, now: OffsetDateTime) -> i64 {
        (self.expires_at - now).whole_seconds().max(0)
    }
}

/// A post as seen from a query origin.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyPost {
    #[serde(flatten)]
    pub post: Post,
    pub distance_miles: f64,
    /// Countdown as of the query, for "expires in" labels.
    pub expires_in_seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Text,
}

impl MediaKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
        }
    }

    /// MIME type prefix an uploaded file must carry for this kind.
    pub fn content_type_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Image => Some("image/"),
            Self::Video => Some("video/"),
            Self::Audio => Some("audio/"),
            Self::Text => None,
        }
    }
}

/// How long a new post stays visible. Only these four choices are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityDuration {
    TwelveHours,
    #[default]
    OneDay,
    ThreeDays,
    OneWeek,
}

impl VisibilityDuration {
    pub fn from_hours(hours: u32) -> Option<Self> {
        match hours {
            12 => Some(Self::TwelveHours),
            24 => Some(Self::OneDay),
            72 => Some(Self::ThreeDays),
            168 => Some(Self::OneWeek),
            _ => None,
        }
    }

    pub fn hours(&self) -> u32 {
        match self {
            Self::TwelveHours => 12,
            Self::OneDay => 24,
            Self::ThreeDays => 72,
            Self::OneWeek => 168,
        }
    }

    pub fn expires_at(&self, now: OffsetDateTime) -> OffsetDateTime {
        now + Duration::hours(i64::from(self.hours()))
    }
}

/// Everything the composer supplies; the store fills in id, timestamps and counters.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub author_id: String,
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub media_url: Option<String>,
    pub cover_art_url: Option<String>,
    pub media_kind: MediaKind,
    pub text_body: Option<String>,
    pub caption: Option<String>,
    pub location: Location,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("please upload a file for your {0} post")]
    MissingMedia(&'static str),
    #[error("please upload a {0} file for a {0} post")]
    WrongContentType(&'static str),
    #[error("please enter some text for your post")]
    MissingText,
}

/// Checks that the payload matches the declared media kind.
pub fn validate_content(
    kind: MediaKind,
    media_url: Option<&str>,
    content_type: Option<&str>,
    text_body: Option<&str>,
) -> Result<(), ContentError> {
    match kind.content_type_prefix() {
        None => {
            if text_body.map_or(true, |text| text.trim().is_empty()) {
                return Err(ContentError::MissingText);
            }
        }
        Some(prefix) => {
            if media_url.map_or(true, |url| url.trim().is_empty()) {
                return Err(ContentError::MissingMedia(kind.as_str()));
            }
            if let Some(content_type) = content_type {
                if !content_type.starts_with(prefix) {
                    return Err(ContentError::WrongContentType(kind.as_str()));
                }
            }
        }
    }
    Ok(())
}
