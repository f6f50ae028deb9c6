pub mod health;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login             login (public)
///
/// /dashboard              KPI totals, timeline, highlights
/// /campaigns              campaign list with window metrics
///
/// /alerts                 list current alerts
/// /alerts/{id}            update alert status
/// /alerts/sync            manual rule-engine trigger
///
/// /cron/alerts/sync       scheduled trigger (x-cron-secret header)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/campaigns", get(handlers::campaigns::list_campaigns))
        .route("/alerts", get(handlers::alerts::list_alerts))
        .route("/alerts/{id}", patch(handlers::alerts::update_alert))
        .route("/alerts/sync", post(handlers::alerts::sync_alerts))
        .route("/cron/alerts/sync", post(handlers::alerts::cron_sync_alerts))
}
