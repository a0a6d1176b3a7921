//! Inbox endpoints. Every handler reads or updates the notifications of
//! the [`ActingUser`] only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gigline_core::error::CoreError;
use gigline_core::types::RecordId;
use gigline_db::models::notification::Notification;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::acting_user::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

const INBOX_PAGE_DEFAULT: i64 = 50;
const INBOX_PAGE_MAX: i64 = 100;

/// `?unread_only=&limit=&offset=` on the inbox listing.
#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl InboxQuery {
    /// Page size in `1..=100` (50 when absent).
    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(INBOX_PAGE_DEFAULT)
            .clamp(1, INBOX_PAGE_MAX)
    }

    fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/v1/notifications
///
/// Newest first.
pub async fn list_notifications(
    user: ActingUser,
    State(state): State<AppState>,
    Query(query): Query<InboxQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let inbox = state
        .notifications
        .list_for_user(
            &user.user_id,
            query.unread_only.unwrap_or_default(),
            query.limit(),
            query.offset(),
        )
        .await
        .map_err(CoreError::from)?;

    Ok(Json(DataResponse { data: inbox }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    user: ActingUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = state
        .notifications
        .unread_count(&user.user_id)
        .await
        .map_err(CoreError::from)?;

    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// 204 when marked. A notification owned by someone else is reported as
/// missing.
pub async fn mark_read(
    user: ActingUser,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    let marked = state
        .notifications
        .mark_read(id, &user.user_id)
        .await
        .map_err(CoreError::from)?;

    if marked {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "Notification",
            id: id.to_string(),
        }
        .into())
    }
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    user: ActingUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = state
        .notifications
        .mark_all_read(&user.user_id)
        .await
        .map_err(CoreError::from)?;

    tracing::debug!(user_id = %user.user_id, marked_read, "Inbox marked read");

    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}
