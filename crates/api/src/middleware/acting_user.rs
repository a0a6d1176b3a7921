//! Caller identity extractor.
//!
//! Authentication happens upstream of this service; the authenticating
//! proxy forwards the caller's user id in the `x-user-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gigline_core::types::UserId;

use crate::error::AppError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf a request is made.
///
/// ```ignore
/// async fn my_handler(user: ActingUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ActingUser {
    pub user_id: UserId,
}

impl<S: Send + Sync> FromRequestParts<S> for ActingUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))?;

        Ok(ActingUser {
            user_id: user_id.to_string(),
        })
    }
}
