//! Undocumented admin endpoints
//!
//! These routes are deliberately absent from the published API schema.
//! They return fixed, sensitive-looking payloads so that API security
//! tooling has shadow endpoints to discover and block. Nothing here is
//! real data and nothing is ever mutated.

use super::response::ApiResponse;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AdminUser {
    pub id: u64,
    pub email: &'static str,
    pub role: &'static str,
    pub last_login: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AdminUsersResponse {
    pub success: bool,
    pub data: &'static [AdminUser],
    pub warning: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FeatureFlags {
    pub new_checkout: bool,
    pub ai_recommendations: bool,
}

#[derive(Debug, Serialize)]
pub struct ExposedConfig {
    pub environment: &'static str,
    pub debug_mode: bool,
    pub db_host: &'static str,
    pub stripe_webhook_url: &'static str,
    pub feature_flags: FeatureFlags,
}

static ADMIN_USERS: [AdminUser; 3] = [
    AdminUser {
        id: 101,
        email: "admin@peakcart.io",
        role: "super_admin",
        last_login: "2026-02-10T14:32:00Z",
    },
    AdminUser {
        id: 102,
        email: "ops@peakcart.io",
        role: "warehouse_admin",
        last_login: "2026-02-09T09:15:00Z",
    },
    AdminUser {
        id: 103,
        email: "dev@peakcart.io",
        role: "developer",
        last_login: "2026-01-28T22:41:00Z",
    },
];

static EXPOSED_CONFIG: ExposedConfig = ExposedConfig {
    environment: "production",
    debug_mode: false,
    db_host: "rds-prod-peakcart.us-east-1.amazonaws.com",
    stripe_webhook_url: "https://peakcart.io/webhooks/stripe",
    feature_flags: FeatureFlags {
        new_checkout: true,
        ai_recommendations: false,
    },
};

const USERS_DEPRECATION_WARNING: &str = "This endpoint is deprecated. Use /admin/v2/users instead.";

/// `GET /api/v1/admin/users`
pub fn admin_users() -> ApiResponse {
    ApiResponse::ok(&AdminUsersResponse {
        success: true,
        data: &ADMIN_USERS,
        warning: USERS_DEPRECATION_WARNING,
    })
}

/// `GET /api/v1/admin/config`
pub fn admin_config() -> ApiResponse {
    ApiResponse::ok(&EXPOSED_CONFIG)
}
