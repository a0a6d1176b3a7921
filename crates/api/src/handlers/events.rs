//! Handler for raising domain events from other services.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gigline_db::models::notification::Notification;
use gigline_events::DomainEvent;

use crate::error::AppResult;
use crate::middleware::acting_user::ActingUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/events
///
/// Publish an event and return the notification it produced. When the body
/// names no actor, the acting user is taken as the actor.
pub async fn publish_event(
    user: ActingUser,
    State(state): State<AppState>,
    Json(mut event): Json<DomainEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Notification>>)> {
    if event.actor_id.is_none() {
        event.actor_id = Some(user.user_id);
    }

    tracing::debug!(
        kind = %event.kind,
        project_id = %event.project_id,
        "Publishing domain event"
    );

    let notification = state.event_bus.publish(event).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: notification })))
}
