// API payload types
// Response envelopes returned by the catalog, cart and health endpoints

use super::error::ApiError;
use crate::catalog::Product;
use serde::Serialize;

/// Failure envelope: `{"success": false, "error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(err: ApiError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
        }
    }
}

/// Product listing
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<&'static Product>,
    pub count: usize,
}

impl ProductListResponse {
    pub fn new(data: Vec<&'static Product>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Single product
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub data: &'static Product,
}

/// Successful cart addition
#[derive(Debug, Serialize)]
pub struct CartAddResponse {
    pub success: bool,
    pub message: String,
    pub cart_total: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
