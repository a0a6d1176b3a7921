use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use gigline_core::types::{ProjectId, SequenceNumber, UserId};
use gigline_messaging::ConversationFeed;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::require_project;
use crate::middleware::acting_user::ActingUser;
use crate::state::AppState;
use crate::ws::manager::ConnectionKind;

/// Query parameters for the conversation socket.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Last sequence number the client already has.
    pub after: Option<SequenceNumber>,
}

/// GET /api/v1/notifications/ws
///
/// Upgrades to a socket that receives every notification routed to the
/// acting user as `{"type":"notification","data":{...}}`.
pub async fn notifications_ws(
    ws: WebSocketUpgrade,
    user: ActingUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user.user_id, None))
}

/// GET /api/v1/projects/{id}/messages/ws?after=
///
/// Upgrades to a socket that streams the conversation: first everything
/// after `after`, then live messages, as `{"type":"message","data":{...}}`.
/// The feed is joined before the upgrade so a failing backlog read is an
/// ordinary HTTP error.
pub async fn conversation_ws(
    ws: WebSocketUpgrade,
    user: ActingUser,
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    require_project(&state, &project_id).await?;
    let feed = state.channel.join(&project_id, params.after).await?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user.user_id, Some(feed))))
}

/// Manage a single WebSocket connection after upgrade.
///
/// The connection is registered with `WsManager` (for pushes, pings and
/// shutdown), then one loop forwards manager frames and feed messages to
/// the sink while watching the inbound stream for close.
async fn handle_socket(
    socket: WebSocket,
    state: AppState,
    user_id: UserId,
    mut feed: Option<ConversationFeed>,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connected");

    let kind = if feed.is_some() {
        ConnectionKind::Conversation
    } else {
        ConnectionKind::Notifications
    };
    let mut outbound = state
        .ws_manager
        .add_with_kind(conn_id.clone(), user_id, kind)
        .await;
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let Some(frame) = frame else { break };
                let closing = matches!(frame, Message::Close(_));
                if sink.send(frame).await.is_err() || closing {
                    break;
                }
            }
            message = next_feed_message(&mut feed) => {
                let Some(message) = message else { break };
                let payload = serde_json::json!({ "type": "message", "data": message });
                if sink.send(Message::Text(payload.to_string().into())).await.is_err() {
                    tracing::debug!(conn_id = %conn_id, "WebSocket sink closed");
                    break;
                }
            }
            inbound = stream.next() => match inbound {
                None | Some(Ok(Message::Close(_))) => break,
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(conn_id = %conn_id, "Pong received");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            },
        }
    }

    state.ws_manager.remove(&conn_id).await;
    if let Some(feed) = feed {
        state.channel.close_channel(feed.handle()).await;
    }
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

async fn next_feed_message(
    feed: &mut Option<ConversationFeed>,
) -> Option<gigline_db::models::message::Message> {
    match feed {
        Some(feed) => feed.next_message().await,
        None => std::future::pending().await,
    }
}
