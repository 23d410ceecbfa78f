// Connection handling module
// Accepts a single TCP connection and serves it with the API handler

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing `performance.max_connections`.
///
/// Must be called from within a `LocalSet`.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    // Increment first, then check, so concurrent accepts cannot both pass
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve one connection on a local task.
///
/// The whole connection, keep-alive included, is bounded by the larger of
/// the read and write timeouts. Shutdown switches the connection to
/// hyper's graceful close. The active counter is released when the task
/// finishes.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = state.config.connection_timeout();

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { handler::handle_request(req, state, peer_addr).await }
            }),
        );
        tokio::pin!(conn);

        // On shutdown, idle keep-alive connections close at once and busy
        // ones after their in-flight response
        let serve = async {
            let mut draining = false;
            loop {
                tokio::select! {
                    result = conn.as_mut() => break result,
                    () = state.shutdown_started(), if !draining => {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            }
        };

        match tokio::time::timeout(timeout_duration, serve).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::LocalSet;

    /// Serve exactly one connection; `request` of `None` only reads
    async fn roundtrip(state: Arc<AppState>, request: Option<&[u8]>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server_state = Arc::clone(&state);
        tokio::task::spawn_local(async move {
            let (stream, peer_addr) = listener.accept().await.unwrap();
            accept_connection(stream, peer_addr, &server_state);
        });

        let mut client = TcpStream::connect(addr).await.unwrap();
        if let Some(request) = request {
            client.write_all(request).await.unwrap();
        }
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn test_state() -> Arc<AppState> {
        let mut config = Config::defaults().unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(config))
    }

    #[tokio::test]
    async fn test_serves_health_over_tcp() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let response = roundtrip(
                    test_state(),
                    Some(&b"GET /api/v1/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"[..]),
                )
                .await;

                assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
                assert!(response.contains("access-control-allow-origin: *\r\n"));
                assert!(response.contains("content-type: application/json\r\n"));
                assert!(response.ends_with(
                    r#"{"status":"ok","service":"peakcart-api","version":"1.0.0"}"#
                ));
            })
            .await;
    }

    #[tokio::test]
    async fn test_cart_post_over_tcp() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let body = r#"{"product_id":2,"quantity":2}"#;
                let request = format!(
                    "POST /api/v1/cart/add HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let response = roundtrip(test_state(), Some(request.as_bytes())).await;

                assert!(response.starts_with("HTTP/1.1 201 Created\r\n"), "{response}");
                assert!(response.contains(r#""cart_total":"259.90""#));
            })
            .await;
    }

    #[tokio::test]
    async fn test_rejects_over_connection_limit() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let mut config = Config::defaults().unwrap();
                config.performance.max_connections = Some(0);
                let state = Arc::new(AppState::new(config));

                let response = roundtrip(Arc::clone(&state), None).await;

                assert!(response.is_empty());
                assert_eq!(state.active_connections(), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_keep_alive() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let state = test_state();
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                let addr = listener.local_addr().unwrap();

                let server_state = Arc::clone(&state);
                tokio::task::spawn_local(async move {
                    let (stream, peer_addr) = listener.accept().await.unwrap();
                    accept_connection(stream, peer_addr, &server_state);
                });

                let mut client = TcpStream::connect(addr).await.unwrap();
                client
                    .write_all(b"GET /api/v1/health HTTP/1.1\r\nHost: localhost\r\n\r\n")
                    .await
                    .unwrap();

                let mut seen = String::new();
                let mut buf = [0u8; 1024];
                while !seen.ends_with(r#""version":"1.0.0"}"#) {
                    let n = client.read(&mut buf).await.unwrap();
                    assert_ne!(n, 0, "closed before the response: {seen}");
                    seen.push_str(std::str::from_utf8(&buf[..n]).unwrap());
                }
                assert_eq!(state.active_connections(), 1);

                state.begin_shutdown();

                let mut rest = Vec::new();
                tokio::time::timeout(Duration::from_secs(2), client.read_to_end(&mut rest))
                    .await
                    .expect("idle connection left open after shutdown")
                    .unwrap();
                assert!(rest.is_empty());

                tokio::time::timeout(Duration::from_secs(2), async {
                    while state.active_connections() != 0 {
                        tokio::task::yield_now().await;
                    }
                })
                .await
                .unwrap();
            })
            .await;
    }
}
