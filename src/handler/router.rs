//! Request handling module
//!
//! Entry point for HTTP request processing: enforces the body size limit,
//! reads the body, dispatches to the API router and writes the access log.

use crate::api::{self, ApiRequest};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of reading a request body
enum BodyRead {
    Complete(Bytes),
    TooLarge,
    /// The body stream failed; handlers treat this as "no body"
    Failed,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let max_body_size = state.config.http.max_body_size;

    let response = if declared_length_exceeds(&parts, max_body_size) {
        logger::log_warning(&format!(
            "Rejected {} {}: declared body exceeds {max_body_size} bytes",
            parts.method,
            parts.uri.path()
        ));
        http::build_413_response()
    } else {
        match read_body(body, max_body_size).await {
            BodyRead::TooLarge => {
                logger::log_warning(&format!(
                    "Rejected {} {}: body exceeds {max_body_size} bytes",
                    parts.method,
                    parts.uri.path()
                ));
                http::build_413_response()
            }
            BodyRead::Complete(bytes) => dispatch(&parts, Some(&bytes[..])),
            BodyRead::Failed => dispatch(&parts, None),
        }
    };

    if state.config.logging.access_log {
        let entry = access_log_entry(&parts, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn dispatch(parts: &Parts, body: Option<&[u8]>) -> Response<Full<Bytes>> {
    let api_response = api::handle(&ApiRequest {
        method: &parts.method,
        path: parts.uri.path(),
        query: parts.uri.query(),
        body,
    });
    http::build_api_response(&api_response)
}

/// Check the Content-Length header against the limit. A malformed header
/// is left for the streaming check to catch.
fn declared_length_exceeds(parts: &Parts, max_body_size: u64) -> bool {
    parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|size| size > max_body_size)
}

async fn read_body<B>(body: B, max_body_size: u64) -> BodyRead
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => BodyRead::Complete(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => BodyRead::TooLarge,
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            BodyRead::Failed
        }
    }
}

fn access_log_entry(
    parts: &Parts,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", parts.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}
