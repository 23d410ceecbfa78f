//! Catalog endpoints
//!
//! - `GET /api/v1/products[?category=...]`
//! - `GET /api/v1/products/{id}`

use super::error::ApiError;
use super::response::ApiResponse;
use super::types::{ProductListResponse, ProductResponse};
use crate::catalog;

/// List the catalog, filtered by `category` when the query names a
/// non-empty one. Only the first `category` parameter is considered.
pub fn list_products(query: Option<&str>) -> ApiResponse {
    let category = query.and_then(category_filter);

    let data = match category {
        Some(category) => catalog::by_category(&category),
        None => catalog::all().iter().collect(),
    };

    ApiResponse::ok(&ProductListResponse::new(data))
}

/// Look up one product. `raw_id` is the digit-only path segment; values
/// too large for an id cannot exist in the catalog.
pub fn get_product(raw_id: &str) -> ApiResponse {
    let product = raw_id.parse::<u64>().ok().and_then(catalog::find_by_id);

    match product {
        Some(data) => ApiResponse::ok(&ProductResponse {
            success: true,
            data,
        }),
        None => ApiError::ProductNotFound.into(),
    }
}

fn category_filter(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "category")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
