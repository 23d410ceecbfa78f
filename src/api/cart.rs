//! Cart endpoint
//!
//! `POST /api/v1/cart/add` prices a line item without keeping any cart
//! state. Validation short-circuits in a fixed order:
//! JSON syntax, integer types, quantity range, then product lookup.

use super::error::ApiError;
use super::response::ApiResponse;
use super::types::CartAddResponse;
use crate::catalog::{self, Price, Product};
use hyper::StatusCode;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Skipped when it leads a request body
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 10;

/// Typed cart request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CartAddRequest {
    #[serde(deserialize_with = "integer")]
    pub product_id: i64,
    #[serde(deserialize_with = "integer")]
    pub quantity: i64,
}

impl CartAddRequest {
    /// Decode a parsed JSON document. Anything other than an object with
    /// two integer fields is a type error.
    pub fn from_json(value: Value) -> Result<Self, ApiError> {
        if !value.is_object() {
            return Err(ApiError::NonIntegerFields);
        }
        serde_json::from_value(value).map_err(|_| ApiError::NonIntegerFields)
    }
}

/// A validated, priced line item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartQuote {
    pub product: &'static Product,
    pub quantity: u64,
}

impl CartQuote {
    pub const fn total(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    pub fn message(&self) -> String {
        format!("Added {}x {} to cart", self.quantity, self.product.name)
    }
}

/// Run the validation chain over a raw body. `None` means the body could
/// not be read at all.
pub fn quote(body: Option<&[u8]>) -> Result<CartQuote, ApiError> {
    let body = body.ok_or(ApiError::InvalidJson)?;
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;
    let request = CartAddRequest::from_json(value)?;

    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&request.quantity) {
        return Err(ApiError::QuantityOutOfRange);
    }
    let quantity = u64::try_from(request.quantity).map_err(|_| ApiError::QuantityOutOfRange)?;

    let product = u64::try_from(request.product_id)
        .ok()
        .and_then(catalog::find_by_id)
        .ok_or(ApiError::ProductNotFound)?;

    Ok(CartQuote { product, quantity })
}

pub fn add_to_cart(body: Option<&[u8]>) -> ApiResponse {
    match quote(body) {
        Ok(quote) => ApiResponse::json(
            StatusCode::CREATED,
            &CartAddResponse {
                success: true,
                message: quote.message(),
                cart_total: quote.total().to_string(),
            },
        ),
        Err(err) => err.into(),
    }
}

/// Accept a JSON number with no fractional part; `3.0` is an integer,
/// `3.5` and `"3"` are not. Integral values beyond `i64` saturate.
fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    as_integer(&number).ok_or_else(|| D::Error::custom("expected an integer"))
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn as_integer(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(body: &str) -> Result<CartQuote, ApiError> {
        quote(Some(body.as_bytes()))
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let quote = run("\u{feff}{\"product_id\": 1, \"quantity\": 3}").unwrap();
        assert_eq!(quote.product.id, 1);
        assert_eq!(quote.total().to_string(), "239.97");

        // Only a leading mark is skipped
        assert_eq!(
            run("{\"product_id\": 1, \"quantity\": 3}\u{feff}").unwrap_err(),
            ApiError::InvalidJson
        );
    }

    #[test]
    fn test_add_success() {
        let resp = add_to_cart(Some(br#"{"product_id": 1, "quantity": 3}"#));
        assert_eq!(resp.status, StatusCode::CREATED);
        assert_eq!(
            resp.body.unwrap(),
            serde_json::json!({
                "success": true,
                "message": "Added 3x Wireless Headphones to cart",
                "cart_total": "239.97"
            })
        );
    }

    #[test]
    fn test_total_keeps_two_decimals() {
        let quote = run(r#"{"product_id": 4, "quantity": 2}"#).unwrap();
        assert_eq!(quote.total().to_string(), "398.00");

        let quote = run(r#"{"product_id": 3, "quantity": 1}"#).unwrap();
        assert_eq!(quote.total().to_string(), "18.50");
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(run("{not json"), Err(ApiError::InvalidJson));
        assert_eq!(run(""), Err(ApiError::InvalidJson));
        assert_eq!(quote(None), Err(ApiError::InvalidJson));
    }

    #[test]
    fn test_non_integer_fields() {
        for body in [
            r#"{"product_id": 3.5, "quantity": 1}"#,
            r#"{"product_id": 1, "quantity": 2.5}"#,
            r#"{"product_id": "1", "quantity": 1}"#,
            r#"{"product_id": 1, "quantity": true}"#,
            r#"{"product_id": null, "quantity": 1}"#,
            r#"{"product_id": 1}"#,
            r"{}",
            r"[1, 3]",
            r"null",
            r"42",
        ] {
            assert_eq!(run(body), Err(ApiError::NonIntegerFields), "body: {body}");
        }
    }

    #[test]
    fn test_type_check_precedes_range_check() {
        assert_eq!(
            run(r#"{"product_id": 3.5, "quantity": 0}"#),
            Err(ApiError::NonIntegerFields)
        );
    }

    #[test]
    fn test_integral_float_is_integer() {
        let quote = run(r#"{"product_id": 2.0, "quantity": 1.0}"#).unwrap();
        assert_eq!(quote.product.id, 2);
        assert_eq!(quote.quantity, 1);
    }

    #[test]
    fn test_quantity_range() {
        for quantity in [0, 11, -1, 1_000_000] {
            let body = format!(r#"{{"product_id": 1, "quantity": {quantity}}}"#);
            assert_eq!(run(&body), Err(ApiError::QuantityOutOfRange));
        }
        // range is checked before the product exists
        assert_eq!(
            run(r#"{"product_id": 999, "quantity": 11}"#),
            Err(ApiError::QuantityOutOfRange)
        );
        assert!(run(r#"{"product_id": 1, "quantity": 1}"#).is_ok());
        assert!(run(r#"{"product_id": 1, "quantity": 10}"#).is_ok());
    }

    #[test]
    fn test_product_not_found() {
        let resp = add_to_cart(Some(br#"{"product_id": 999, "quantity": 1}"#));
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(
            resp.body.unwrap(),
            serde_json::json!({"success": false, "error": "Product not found"})
        );
        assert_eq!(
            run(r#"{"product_id": -1, "quantity": 1}"#),
            Err(ApiError::ProductNotFound)
        );
        assert_eq!(
            run(r#"{"product_id": 1e30, "quantity": 1}"#),
            Err(ApiError::ProductNotFound)
        );
    }

    #[test]
    fn test_extra_fields_ignored() {
        let quote = run(r#"{"product_id": 5, "quantity": 2, "coupon": "X"}"#).unwrap();
        assert_eq!(quote.message(), "Added 2x Yoga Mat to cart");
        assert_eq!(quote.total().to_string(), "69.98");
    }

    #[test]
    fn test_stock_is_not_reserved() {
        let before = catalog::find_by_id(4).unwrap().stock;
        for _ in 0..3 {
            run(r#"{"product_id": 4, "quantity": 10}"#).unwrap();
        }
        assert_eq!(catalog::find_by_id(4).unwrap().stock, before);
    }
}
