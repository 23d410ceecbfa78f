// Health check endpoint
// Answers on any method; only the path is checked.

use super::response::ApiResponse;
use super::types::HealthResponse;

pub const SERVICE_NAME: &str = "peakcart-api";
pub const SERVICE_VERSION: &str = "1.0.0";

pub fn health() -> ApiResponse {
    ApiResponse::ok(&HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
    })
}
