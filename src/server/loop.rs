// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the active connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop. Must be called from within a `LocalSet`.
///
/// On shutdown the listener is closed first, then open connections are
/// told to close and get up to `performance.shutdown_grace_period` to
/// finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = signals.shutdown.notified() => break,
        }
    }

    drop(listener);
    state.begin_shutdown();
    logger::log_info(&format!(
        "Listener closed, waiting for {} active connection(s)",
        state.active_connections()
    ));

    let remaining = drain_connections(&state, state.config.shutdown_grace_period()).await;
    logger::log_shutdown_complete(remaining);
}

/// Wait until no connections remain or the grace period ends.
/// Returns the number still open.
async fn drain_connections(state: &AppState, grace_period: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace_period;

    loop {
        let active = state.active_connections();
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_loop_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let state = Arc::new(AppState::new(Config::defaults().unwrap()));
        let signals = Arc::new(SignalHandler::new());
        signals.request_shutdown();

        let local = tokio::task::LocalSet::new();
        tokio::time::timeout(
            Duration::from_secs(5),
            local.run_until(start_server_loop(listener, Arc::clone(&state), signals)),
        )
        .await
        .unwrap();

        // Open connections were told to close
        tokio::time::timeout(Duration::from_secs(1), state.shutdown_started())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace_period() {
        let state = AppState::new(Config::defaults().unwrap());
        state.active_connections.store(2, Ordering::SeqCst);

        let remaining = drain_connections(&state, Duration::from_millis(120)).await;
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let state = AppState::new(Config::defaults().unwrap());
        let remaining = drain_connections(&state, Duration::from_secs(60)).await;
        assert_eq!(remaining, 0);
    }
}
