use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::engagement::EngagementService;
use crate::app::feed::{FeedError, FeedPage};
use crate::app::location::{ClientCoordinates, LocationError, Locator};
use crate::app::nearby::MediaFilter;
use crate::app::posts::{NewPost, PostService};
use crate::domain::post::{validate_content, MediaKind, Post, VisibilityDuration};
use crate::http::{AppError, AuthUser};
use crate::AppState;

const MAX_CAPTION_LEN: usize = 2200;
const MAX_COMMENT_LEN: usize = 1000;
/// Anything wider than half the Earth's circumference is every post anyway.
const MAX_RADIUS_MILES: f64 = 12_500.0;

fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("invalid post id"))
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    posts: usize,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.store.len() {
        Ok(posts) => Json(HealthResponse {
            status: "ok",
            posts,
        }),
        Err(err) => {
            tracing::error!(error = ?err, "post store unavailable");
            Json(HealthResponse {
                status: "degraded",
                posts: 0,
            })
        }
    }
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub media_kind: String,
    pub media_url: Option<String>,
    pub media_content_type: Option<String>,
    pub cover_art_url: Option<String>,
    pub text_body: Option<String>,
    pub caption: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub duration_hours: Option<u32>,
}

pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let media_kind = MediaKind::parse(&payload.media_kind).ok_or_else(|| {
        AppError::bad_request("media_kind must be one of image, video, audio, text")
    })?;

    let duration = match payload.duration_hours {
        Some(hours) => VisibilityDuration::from_hours(hours).ok_or_else(|| {
            AppError::bad_request("duration_hours must be one of 12, 24, 72, 168")
        })?,
        None => VisibilityDuration::default(),
    };

    let caption = payload.caption.filter(|caption| !caption.trim().is_empty());
    if let Some(caption) = &caption {
        if caption.chars().count() > MAX_CAPTION_LEN {
            return Err(AppError::bad_request(
                "caption must be at most 2200 characters",
            ));
        }
    }

    validate_content(
        media_kind,
        payload.media_url.as_deref(),
        payload.media_content_type.as_deref(),
        payload.text_body.as_deref(),
    )
    .map_err(|err| AppError::bad_request(err.to_string()))?;

    let coordinates = ClientCoordinates {
        latitude: payload.latitude,
        longitude: payload.longitude,
    };
    let location = match coordinates.current_location() {
        Ok(location) => location,
        Err(LocationError::Unsupported) => {
            tracing::warn!("post composed without a position, using default location");
            state.default_location
        }
        Err(err) => return Err(FeedError::LocationUnavailable(err).into()),
    };

    let is_text = media_kind == MediaKind::Text;
    let input = NewPost {
        media_kind,
        media_url: if is_text { None } else { payload.media_url },
        cover_art_url: payload
            .cover_art_url
            .filter(|_| media_kind == MediaKind::Audio),
        text_body: if is_text { payload.text_body } else { None },
        caption,
        location,
        duration,
    };

    let service = PostService::new(state.store.clone(), state.clock.clone());
    let post = service.create_post(&auth.user, input).map_err(|err| {
        tracing::error!(error = ?err, author_id = %auth.user.id, "failed to create post");
        AppError::internal("failed to create post")
    })?;

    Ok(Json(post))
}

pub async fn get_post(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Post>, AppError> {
    let id = parse_post_id(&id)?;
    let service = PostService::new(state.store.clone(), state.clock.clone());
    let post = service.get_post(id).map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to fetch post");
        AppError::internal("failed to fetch post")
    })?;

    match post {
        Some(post) => Ok(Json(post)),
        None => Err(FeedError::PostNotFoundOrExpired.into()),
    }
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub like_count: u32,
}

pub async fn like_post(
    Path(id): Path<String>,
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<LikeResponse>, AppError> {
    let id = parse_post_id(&id)?;
    let service = EngagementService::new(state.store.clone(), state.clock.clone());
    let like_count = service.like_post(id).map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to like post");
        AppError::internal("failed to like post")
    })?;

    let like_count = like_count.ok_or(FeedError::PostNotFoundOrExpired)?;
    Ok(Json(LikeResponse { like_count }))
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub comment_count: u32,
}

pub async fn comment_post(
    Path(id): Path<String>,
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let id = parse_post_id(&id)?;
    if payload.text.trim().is_empty() {
        return Err(AppError::bad_request("comment text cannot be empty"));
    }
    if payload.text.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::bad_request("comment text exceeds 1000 characters"));
    }

    let service = EngagementService::new(state.store.clone(), state.clock.clone());
    let comment_count = service.comment_post(id, &payload.text).map_err(|err| {
        tracing::error!(error = ?err, post_id = %id, "failed to comment");
        AppError::internal("failed to comment")
    })?;

    let comment_count = comment_count.ok_or(FeedError::PostNotFoundOrExpired)?;
    Ok(Json(CommentResponse { comment_count }))
}

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub media: Option<String>,
}

pub async fn nearby_feed(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<FeedPage>, AppError> {
    if let Some(radius) = query.radius {
        if !(radius > 0.0 && radius <= MAX_RADIUS_MILES) {
            return Err(AppError::bad_request(
                "radius must be greater than 0 and at most 12500 miles",
            ));
        }
    }

    let filter = match query.media.as_deref() {
        Some(media) => MediaFilter::parse(media).ok_or_else(|| {
            AppError::bad_request("media must be one of all, image, video, audio, text")
        })?,
        None => MediaFilter::All,
    };

    let coordinates = ClientCoordinates {
        latitude: query.lat,
        longitude: query.lng,
    };
    let page = state
        .feed_service()
        .load(&coordinates, query.radius, filter)?;

    Ok(Json(page))
}

pub async fn refresh_feed(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.feed_service().refresh_feed();
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct SweepResponse {
    pub removed: usize,
}

pub async fn sweep_expired(State(state): State<AppState>) -> Result<Json<SweepResponse>, AppError> {
    let service = PostService::new(state.store.clone(), state.clock.clone());
    let removed = service.sweep_expired().map_err(|err| {
        tracing::error!(error = ?err, "failed to sweep expired posts");
        AppError::internal("failed to sweep expired posts")
    })?;

    Ok(Json(SweepResponse { removed }))
}
