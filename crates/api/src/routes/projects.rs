//! Route definitions for project-scoped resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{messages, payments};
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /{id}/messages       -> list_messages
/// POST   /{id}/messages       -> send_message
/// GET    /{id}/messages/ws    -> conversation stream (WebSocket)
/// GET    /{id}/payments       -> list_payments
/// POST   /{id}/payments       -> create_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/{id}/messages/ws", get(ws::conversation_ws))
        .route(
            "/{id}/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
}
