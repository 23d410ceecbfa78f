// API response utility functions module

use super::error::ApiError;
use super::types::ErrorResponse;
use crate::logger;
use hyper::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Transport-independent result of handling a request.
/// `body` is `None` for responses that carry no content (preflight).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Build a JSON response
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self {
                status,
                body: Some(value),
            },
            Err(e) => {
                logger::log_error(&format!("Failed to serialize response: {e}"));
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: Some(serde_json::json!({
                        "success": false,
                        "error": "Internal server error"
                    })),
                }
            }
        }
    }

    /// 200 OK with a JSON body
    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::json(StatusCode::OK, body)
    }

    /// Error envelope with the status implied by the error
    pub fn error(err: ApiError) -> Self {
        Self::json(err.status(), &ErrorResponse::new(err))
    }

    /// Empty response (CORS preflight)
    pub const fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        Self::error(err)
    }
}
