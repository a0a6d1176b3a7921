use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// Default gap between keep-alive rounds.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Ping every open socket each `every`, dropping connections whose socket
/// task has already gone away. Stops when `cancel` fires.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    every: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let pruned = ws_manager.ping_all().await;
                    if pruned > 0 {
                        tracing::debug!(pruned, "Dropped stale WebSocket connections");
                    }
                }
            }
        }
        tracing::info!("Keep-alive pings stopped");
    })
}
