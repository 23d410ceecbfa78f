//! Routing module
//!
//! Provides an ordered route table with segment-based path templates:
//! - Literal segments (`/api/v1/products`)
//! - Named parameters (`{slug}`)
//! - Digit-constrained parameters (`{id:digits}`)

mod matcher;

pub use matcher::{match_route, MethodMatch, Route};
