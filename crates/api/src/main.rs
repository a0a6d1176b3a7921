use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use gigline_api::config::ServerConfig;
use gigline_api::notifications::NotificationPush;
use gigline_api::router::build_app_router;
use gigline_api::state::{AppState, Stores};
use gigline_api::ws;
use gigline_db::{MemoryStore, PgStore};
use gigline_events::{
    DeliveryConfig, DeliveryRelay, DeliveryWorker, EmailConfig, EmailTransport, LogOnlyTransport,
    SmtpTransport,
};
use gigline_payments::{GatewayConfig, HttpPaymentGateway, PaymentGateway, SimulatedGateway};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "gigline_api=debug,gigline_events=debug,gigline_messaging=debug,gigline_payments=debug,tower_http=debug"
            .into()
    });
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    let delivery_config = DeliveryConfig::from_env().expect("Invalid delivery configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let (pool, stores) = match &config.database_url {
        Some(database_url) => {
            let pool = gigline_db::create_pool(database_url, config.database_max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            gigline_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            gigline_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            (Some(pool.clone()), Stores::postgres(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on exit)");
            (None, Stores::memory(Arc::new(MemoryStore::new())))
        }
    };

    // --- Email transport ---
    let transport: Arc<dyn EmailTransport> = match EmailConfig::from_env()
        .expect("Invalid email configuration")
    {
        Some(email_config) => {
            tracing::info!(
                smtp_host = %email_config.smtp_host,
                smtp_port = email_config.smtp_port,
                "SMTP email delivery enabled"
            );
            Arc::new(SmtpTransport::new(&email_config).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, notification emails will only be logged");
            Arc::new(LogOnlyTransport)
        }
    };

    // --- Payment gateway ---
    let gateway: Arc<dyn PaymentGateway> = match GatewayConfig::from_env()
        .expect("Invalid payment gateway configuration")
    {
        Some(gateway_config) => {
            tracing::info!(url = %gateway_config.url, "HTTP payment gateway enabled");
            Arc::new(
                HttpPaymentGateway::new(&gateway_config)
                    .expect("Failed to build payment gateway client"),
            )
        }
        None => {
            tracing::warn!("PAYMENT_GATEWAY_URL not set, using the simulated gateway");
            Arc::new(SimulatedGateway::new())
        }
    };

    // --- Delivery worker ---
    let (relay, queue) = DeliveryRelay::channel();
    let worker = Arc::new(DeliveryWorker::new(
        Arc::clone(&stores.profiles),
        transport,
        &delivery_config,
    ));
    let delivery_cancel = CancellationToken::new();
    let delivery_handle = tokio::spawn(worker.run(queue, delivery_cancel.clone()));

    // --- Application state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let state = AppState::assemble(config, pool, &stores, gateway, relay);

    // --- Notification push ---
    let push_cancel = CancellationToken::new();
    let push = NotificationPush::new(Arc::clone(&state.ws_manager));
    let push_handle = tokio::spawn(push.run(state.event_bus.subscribe(), push_cancel.clone()));

    // --- WebSocket heartbeat ---
    let heartbeat_cancel = CancellationToken::new();
    let heartbeat_handle = ws::start_heartbeat(
        Arc::clone(&state.ws_manager),
        ws::HEARTBEAT_INTERVAL,
        heartbeat_cancel.clone(),
    );

    // --- Start server ---
    let addr = SocketAddr::new(
        state.config.host.parse().expect("Invalid HOST"),
        state.config.port,
    );
    let ws_manager = Arc::clone(&state.ws_manager);
    let app = build_app_router(state);

    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    // In-flight email attempts finish; anything still queued is dropped and logged.
    delivery_cancel.cancel();
    if tokio::time::timeout(shutdown_timeout, delivery_handle)
        .await
        .is_err()
    {
        tracing::warn!("Delivery worker did not stop within the shutdown timeout");
    }

    push_cancel.cancel();
    heartbeat_cancel.cancel();
    let _ = tokio::time::timeout(shutdown_timeout, push_handle).await;
    let _ = tokio::time::timeout(shutdown_timeout, heartbeat_handle).await;

    ws_manager.shutdown_all().await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
