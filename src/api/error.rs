// API error taxonomy
// Every error is reported to the client as {"success": false, "error": <message>}

use hyper::StatusCode;
use thiserror::Error;

/// Broad class of a request failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Body is not JSON, has the wrong types, or fails a range check
    MalformedInput,
    /// The referenced product does not exist
    NotFound,
    /// No route matched the request
    RouteNotFound,
    /// The request body exceeds the configured limit
    PayloadTooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Invalid JSON body")]
    InvalidJson,
    #[error("product_id and quantity must be integers")]
    NonIntegerFields,
    #[error("quantity must be between 1 and 10")]
    QuantityOutOfRange,
    #[error("Product not found")]
    ProductNotFound,
    #[error("Endpoint not found")]
    EndpointNotFound,
    #[error("Request body too large")]
    PayloadTooLarge,
}

impl ApiError {
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::InvalidJson | Self::NonIntegerFields | Self::QuantityOutOfRange => {
                ErrorKind::MalformedInput
            }
            Self::ProductNotFound => ErrorKind::NotFound,
            Self::EndpointNotFound => ErrorKind::RouteNotFound,
            Self::PayloadTooLarge => ErrorKind::PayloadTooLarge,
        }
    }

    pub const fn status(self) -> StatusCode {
        match self.kind() {
            ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound | ErrorKind::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NonIntegerFields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::QuantityOutOfRange.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::ProductNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EndpointNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ApiError::ProductNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ApiError::EndpointNotFound.kind(), ErrorKind::RouteNotFound);
        assert_eq!(ApiError::QuantityOutOfRange.kind(), ErrorKind::MalformedInput);
    }
}
