//! HTTP response building module
//!
//! Turns transport-independent API results into hyper responses. Every
//! response, success or failure, carries the same CORS headers.

use crate::api::{ApiError, ApiResponse};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

/// CORS headers attached to every response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

fn with_cors(mut builder: Builder) -> Builder {
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    builder
}

/// Build the hyper response for an API result
pub fn build_api_response(resp: &ApiResponse) -> Response<Full<Bytes>> {
    match &resp.body {
        Some(body) => build_json_response(resp.status, Bytes::from(body.to_string())),
        None => build_empty_response(resp.status),
    }
}

/// Build JSON response with CORS headers
pub fn build_json_response(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    with_cors(Response::builder().status(status))
        .header("Content-Type", "application/json")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build bodiless response (OPTIONS preflight)
pub fn build_empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    with_cors(Response::builder().status(status))
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_api_response(&ApiError::PayloadTooLarge.into())
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn assert_cors(resp: &Response<Full<Bytes>>) {
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    }

    #[tokio::test]
    async fn test_json_response_has_cors() {
        let api = ApiResponse::ok(&serde_json::json!({"status": "ok"}));
        let resp = build_api_response(&api);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_cors(&resp);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_preflight_is_empty() {
        let resp = build_api_response(&ApiResponse::no_content());
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().get("content-type").is_none());
        assert_cors(&resp);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_error_response_has_cors() {
        let resp = build_api_response(&ApiError::EndpointNotFound.into());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_cors(&resp);

        let resp = build_413_response();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_cors(&resp);
    }
}
