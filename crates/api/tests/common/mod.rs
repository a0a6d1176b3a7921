#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use gigline_db::models::project::Project;
use gigline_db::MemoryStore;
use gigline_events::{DeliveryQueue, DeliveryRelay};
use gigline_payments::{PaymentGateway, SimulatedGateway};
use http_body_util::BodyExt;
use tower::ServiceExt;

use gigline_api::config::ServerConfig;
use gigline_api::router::build_app_router;
use gigline_api::state::{AppState, Stores};

pub const PROJECT_ID: &str = "proj-1";
pub const CLIENT_ID: &str = "client-1";
pub const FREELANCER_ID: &str = "freelancer-1";

/// Build a test `ServerConfig` with safe defaults and in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        database_max_connections: 1,
    }
}

/// A fully wired application on top of a [`MemoryStore`].
///
/// The delivery queue is held but never drained, so no email is attempted.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub queue: DeliveryQueue,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the production router over a seeded store and the simulated gateway.
pub async fn build_test_app() -> TestApp {
    build_test_app_with_gateway(Arc::new(SimulatedGateway::new())).await
}

/// Build the production router over a seeded [`MemoryStore`] and `gateway`.
///
/// The store contains [`PROJECT_ID`] with [`CLIENT_ID`] and
/// [`FREELANCER_ID`] as participants.
pub async fn build_test_app_with_gateway(gateway: Arc<dyn PaymentGateway>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    store
        .put_project(Project {
            id: PROJECT_ID.to_string(),
            title: "Landing page".to_string(),
            client_id: Some(CLIENT_ID.to_string()),
            freelancer_id: Some(FREELANCER_ID.to_string()),
        })
        .await;

    let (relay, queue) = DeliveryRelay::channel();
    let state = AppState::assemble(
        test_config(),
        None,
        &Stores::memory(Arc::clone(&store)),
        gateway,
        relay,
    );

    TestApp {
        router: build_app_router(state.clone()),
        state,
        store,
        queue,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request, optionally as `user`.
pub async fn get(app: Router, uri: &str, user: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, user, None).await
}

/// Send a POST request with a JSON body, optionally as `user`.
pub async fn post_json(
    app: Router,
    uri: &str,
    user: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, user, Some(body)).await
}

/// Send a POST request without a body.
pub async fn post(app: Router, uri: &str, user: Option<&str>) -> Response<Body> {
    send(app, Method::POST, uri, user, None).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A card the simulated gateway accepts.
pub fn valid_card() -> serde_json::Value {
    serde_json::json!({
        "cardNumber": "4242 4242 4242 4242",
        "expiryDate": "12/99",
        "cvv": "123",
        "cardholderName": "Pat Payer",
    })
}
