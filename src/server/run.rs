// Server loop module
// Accept loop with content reload and graceful shutdown

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until shutdown is signalled.
///
/// Three events drive the loop: an accepted connection (served on its own
/// task), a reload notification (page store re-read from disk), and the
/// shutdown notification, which stops accepting. After the loop, in-flight
/// connections are drained, bounded by the per-connection timeout.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.reload.notified() => {
                logger::log_reload_triggered();
                // Failure keeps the previous snapshot; already logged by the store
                let _ = state.store.reload().await;
            }

            () = signals.shutdown.notified() => {
                logger::log_shutdown();
                break;
            }
        }
    }

    drop(listener);
    drain_connections(&state, &active_connections).await;
    Ok(())
}

/// Wait for in-flight connection tasks to finish.
///
/// The wait is bounded: connection tasks already time themselves out after
/// the configured read/write timeout, so that is the longest a drain can
/// take.
async fn drain_connections(state: &AppState, active_connections: &AtomicUsize) {
    let cap = Duration::from_secs(std::cmp::max(
        state.config.performance.read_timeout,
        state.config.performance.write_timeout,
    ));
    let started = std::time::Instant::now();

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            return;
        }
        if started.elapsed() >= cap {
            logger::log_warning(&format!(
                "Drain timed out with {active} connections still active"
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::listener::create_reusable_listener;

    #[tokio::test]
    async fn test_serve_returns_after_shutdown_notify() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).expect("bind");
        let config = Config::load_from("does-not-exist").expect("defaults load");
        let state = Arc::new(AppState::new(&config));
        let signals = Arc::new(SignalHandler::new());

        // Notify stores a permit, so the loop's first notified() resolves
        signals.shutdown.notify_one();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            serve(listener, state, Arc::clone(&signals)),
        )
        .await
        .expect("serve returns after shutdown");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let config = Config::load_from("does-not-exist").expect("defaults load");
        let state = AppState::new(&config);
        let counter = AtomicUsize::new(0);
        // No active connections: returns without sleeping out the cap
        tokio::time::timeout(
            Duration::from_secs(1),
            drain_connections(&state, &counter),
        )
        .await
        .expect("idle drain is immediate");
    }
}
