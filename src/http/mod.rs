use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

mod auth;
mod error;
mod handlers;
mod routes;

pub use auth::AuthUser;
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(routes::posts())
        .merge(routes::feed())
        .merge(routes::maintenance());

    Router::new()
        .merge(routes::health())
        .nest("/v1", v1)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
