pub mod health;
pub mod notifications;
pub mod projects;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                                          publish a domain event (POST)
///
/// /notifications                                   list
/// /notifications/unread-count                      unread count
/// /notifications/read-all                          mark all read (POST)
/// /notifications/{id}/read                         mark one read (POST)
/// /notifications/ws                                WebSocket push
///
/// /projects/{id}/messages                          history, send
/// /projects/{id}/messages/ws                       WebSocket conversation stream
/// /projects/{id}/payments                          ledger, pay
/// ```
///
/// Every route requires the `x-user-id` header.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(handlers::events::publish_event))
        .nest("/notifications", notifications::router())
        .nest("/projects", projects::router())
}
