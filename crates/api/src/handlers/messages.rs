//! Handlers for the project conversation resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gigline_core::types::{ProjectId, SequenceNumber, UserId};
use gigline_db::models::message::Message;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::require_project;
use crate::middleware::acting_user::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /projects/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Only messages with a higher sequence number are returned.
    pub after: Option<SequenceNumber>,
    /// Page size. Defaults to 100, clamped to 500.
    pub limit: Option<i64>,
}

/// Request body for `POST /projects/{id}/messages`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: UserId,
    pub content: String,
}

/// GET /api/v1/projects/{id}/messages
pub async fn list_messages(
    _user: ActingUser,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    require_project(&state, &project_id).await?;
    let messages = state
        .channel
        .history(&project_id, params.after, params.limit)
        .await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/projects/{id}/messages
///
/// The acting user is the sender. Returns 201 with the committed message,
/// including its sequence number.
pub async fn send_message(
    user: ActingUser,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    require_project(&state, &project_id).await?;
    let message = state
        .channel
        .send_message(&project_id, &user.user_id, &input.recipient_id, &input.content)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}
