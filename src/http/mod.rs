//! HTTP protocol layer module
//!
//! Response builders shared by the request handler, decoupled from the
//! catalog business logic.

pub mod response;

// Re-export commonly used types
pub use response::{build_413_response, build_api_response};
