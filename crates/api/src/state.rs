use std::sync::Arc;

use gigline_db::{
    DbPool, MemoryStore, MessageStore, NotificationStore, PaymentLedger, PgStore,
    ProfileDirectory, ProjectDirectory,
};
use gigline_events::{DeliveryRelay, EventBus, NotificationRouter};
use gigline_messaging::MessageChannel;
use gigline_payments::{PaymentGateway, PaymentRecorder};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Storage behind every pipeline component.
#[derive(Clone)]
pub struct Stores {
    pub messages: Arc<dyn MessageStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub ledger: Arc<dyn PaymentLedger>,
    pub projects: Arc<dyn ProjectDirectory>,
    pub profiles: Arc<dyn ProfileDirectory>,
}

impl Stores {
    /// Every store backed by one PostgreSQL pool.
    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self {
            messages: store.clone(),
            notifications: store.clone(),
            ledger: store.clone(),
            projects: store.clone(),
            profiles: store,
        }
    }

    /// Every store backed by process memory.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            messages: store.clone(),
            notifications: store.clone(),
            ledger: store.clone(),
            projects: store.clone(),
            profiles: store,
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database pool, when running on PostgreSQL.
    pub pool: Option<DbPool>,
    /// WebSocket connection manager.
    pub ws_manager: Arc<WsManager>,
    /// Domain event ingestion point.
    pub event_bus: Arc<EventBus>,
    /// Project conversations.
    pub channel: Arc<MessageChannel>,
    /// Payment processing and the ledger.
    pub payments: Arc<PaymentRecorder>,
    /// Notification inbox queries.
    pub notifications: Arc<dyn NotificationStore>,
    /// Project lookups for request validation.
    pub projects: Arc<dyn ProjectDirectory>,
}

impl AppState {
    /// Wire the pipeline together: router -> bus -> channel / recorder.
    ///
    /// `relay` is the producer half of the delivery outbox; the caller owns
    /// the queue half and the worker draining it.
    pub fn assemble(
        config: ServerConfig,
        pool: Option<DbPool>,
        stores: &Stores,
        gateway: Arc<dyn PaymentGateway>,
        relay: DeliveryRelay,
    ) -> Self {
        let router = NotificationRouter::new(
            Arc::clone(&stores.projects),
            Arc::clone(&stores.notifications),
            relay,
        );
        let event_bus = Arc::new(EventBus::with_router(router));
        let channel = Arc::new(MessageChannel::new(
            Arc::clone(&stores.messages),
            Arc::clone(&event_bus),
        ));
        let payments = Arc::new(PaymentRecorder::new(
            gateway,
            Arc::clone(&stores.ledger),
            Arc::clone(&event_bus),
        ));

        Self {
            config: Arc::new(config),
            pool,
            ws_manager: Arc::new(WsManager::new()),
            event_bus,
            channel,
            payments,
            notifications: Arc::clone(&stores.notifications),
            projects: Arc::clone(&stores.projects),
        }
    }
}
