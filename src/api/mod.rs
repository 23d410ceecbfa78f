// API module entry
// Product catalog API: ordered route table and request dispatch

mod admin;
mod cart;
mod error;
mod health;
mod products;
mod response;
mod types;

use hyper::Method;
use std::sync::OnceLock;

use crate::logger::{self, LogLevel};
use crate::routing::{self, MethodMatch, Route};

// Re-export public types
pub use error::ApiError;
pub use health::{SERVICE_NAME, SERVICE_VERSION};
pub use response::ApiResponse;

/// Handler behind each route table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListProducts,
    GetProduct,
    AddToCart,
    Health,
    AdminUsers,
    AdminConfig,
}

impl Endpoint {
    /// Routes left out of the published API schema
    pub const fn is_shadow(self) -> bool {
        matches!(self, Self::AdminUsers | Self::AdminConfig)
    }
}

/// A request reduced to what the router needs
#[derive(Debug, Clone, Copy)]
pub struct ApiRequest<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Raw query string without the leading `?`
    pub query: Option<&'a str>,
    /// Request body; `None` if it could not be read
    pub body: Option<&'a [u8]>,
}

/// The route table, in priority order. First match wins.
pub fn route_table() -> &'static [Route<Endpoint>] {
    static ROUTES: OnceLock<Vec<Route<Endpoint>>> = OnceLock::new();
    ROUTES.get_or_init(|| {
        vec![
            Route::new(
                "list_products",
                MethodMatch::Only(Method::GET),
                "/api/v1/products",
                Endpoint::ListProducts,
            ),
            Route::new(
                "get_product",
                MethodMatch::Only(Method::GET),
                "/api/v1/products/{id:digits}",
                Endpoint::GetProduct,
            ),
            Route::new(
                "add_to_cart",
                MethodMatch::Only(Method::POST),
                "/api/v1/cart/add",
                Endpoint::AddToCart,
            ),
            Route::new("health", MethodMatch::Any, "/api/v1/health", Endpoint::Health),
            Route::new(
                "admin_users",
                MethodMatch::Only(Method::GET),
                "/api/v1/admin/users",
                Endpoint::AdminUsers,
            ),
            Route::new(
                "admin_config",
                MethodMatch::Only(Method::GET),
                "/api/v1/admin/config",
                Endpoint::AdminConfig,
            ),
        ]
    })
}

/// Dispatch a request to its handler
///
/// OPTIONS on any path is answered as a CORS preflight before the route
/// table is consulted. Unmatched requests get the catch-all 404.
pub fn handle(req: &ApiRequest<'_>) -> ApiResponse {
    if *req.method == Method::OPTIONS {
        return ApiResponse::no_content();
    }

    let Some((route, params)) = routing::match_route(req.method, req.path, route_table()) else {
        return ApiError::EndpointNotFound.into();
    };

    if route.handler.is_shadow() {
        logger::log_shadow_endpoint(req.method.as_str(), req.path);
    } else if logger::enabled(LogLevel::Debug) {
        logger::log_debug(&format!("[Route] {} {} -> {}", req.method, req.path, route.name));
    }

    match route.handler {
        Endpoint::ListProducts => products::list_products(req.query),
        Endpoint::GetProduct => match params.get("id") {
            Some(id) => products::get_product(id),
            None => ApiError::ProductNotFound.into(),
        },
        Endpoint::AddToCart => cart::add_to_cart(req.body),
        Endpoint::Health => health::health(),
        Endpoint::AdminUsers => admin::admin_users(),
        Endpoint::AdminConfig => admin::admin_config(),
    }
}
