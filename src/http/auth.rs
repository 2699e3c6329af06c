use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::user::User;
use crate::http::AppError;
use crate::AppState;

/// The caller. Every request acts as the single configured user; there is no sign-in.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(AuthUser {
            user: state.viewer.clone(),
        })
    }
}
