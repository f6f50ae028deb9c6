//! Shared test harness: state and router construction.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use adpulse_api::auth::jwt::JwtConfig;
use adpulse_api::config::ServerConfig;
use adpulse_api::routes;
use adpulse_api::state::AppState;
use adpulse_core::tokens::SealKey;

/// Shared secret the cron tests present.
pub const TEST_CRON_SECRET: &str = "test-cron-secret";

/// Seal key used for integration tokens in tests.
pub fn test_seal_key() -> SealKey {
    SealKey::new([7u8; 32])
}

/// Build a test `ServerConfig` with safe defaults and fixed secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cron_secret: TEST_CRON_SECRET.to_string(),
        token_seal_key: test_seal_key(),
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build an `AppState` over the given pool, pointing the ads client at
/// `ads_base_url` when provided (a mock provider) or at the real Graph
/// API otherwise (tests that never call out don't care).
pub fn test_state(pool: PgPool, ads_base_url: Option<String>) -> AppState {
    let ads = match ads_base_url {
        Some(url) => adpulse_ads::AdsClient::with_base_url(url),
        None => adpulse_ads::AdsClient::new(),
    };
    AppState {
        pool,
        config: Arc::new(test_config()),
        ads: Arc::new(ads),
    }
}

/// Build the application router the way `main.rs` does, minus the
/// middleware layers that need a live socket.
pub fn build_test_app(pool: PgPool) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .with_state(test_state(pool, None))
}
