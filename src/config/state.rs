// Application state module
// Shared, read-only configuration plus live connection bookkeeping

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

use super::types::Config;

/// Application state, shared by every connection task
pub struct AppState {
    pub config: Config,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
    /// Flips to `true` once the server starts shutting down
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            active_connections: AtomicUsize::new(0),
            shutdown: watch::channel(false).0,
        }
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Ask every open connection to finish its current request and close
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Resolves once `begin_shutdown` has been called, including before
    /// this future was created
    pub async fn shutdown_started(&self) {
        let mut rx = self.shutdown.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = rx.wait_for(|stopping| *stopping).await;
    }
}
