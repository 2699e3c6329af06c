use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts", post(handlers::create_post))
        .route("/posts/:id", get(handlers::get_post))
        .route("/posts/:id/like", post(handlers::like_post))
        .route("/posts/:id/comment", post(handlers::comment_post))
}

pub fn feed() -> Router<AppState> {
    Router::new()
        .route("/feed/nearby", get(handlers::nearby_feed))
        .route("/feed/refresh", post(handlers::refresh_feed))
}

pub fn maintenance() -> Router<AppState> {
    Router::new().route("/maintenance/sweep", post(handlers::sweep_expired))
}
