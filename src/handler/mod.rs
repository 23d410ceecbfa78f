//! Request handler module
//!
//! Bridges hyper requests to the transport-independent API router.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
