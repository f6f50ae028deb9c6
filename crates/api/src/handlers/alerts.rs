//! Alert handlers: list, status updates, and the two sync triggers.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use adpulse_core::alert::AlertStatus;
use adpulse_core::error::CoreError;
use adpulse_core::types::DbId;
use adpulse_db::repositories::AlertRepo;

use crate::engine::alerts::run_alert_sync;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Header carrying the shared secret for the scheduled trigger.
const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Query params for `GET /alerts`.
#[derive(Debug, Deserialize)]
pub struct ListAlertsQuery {
    /// Filter by lifecycle status (`NEW`, `READ`, `RESOLVED`).
    pub status: Option<String>,
}

/// Body for `PATCH /alerts/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateAlertRequest {
    pub status: String,
}

/// GET /api/v1/alerts
///
/// The current alert set, newest first.
pub async fn list_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListAlertsQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        if AlertStatus::from_str(status).is_none() {
            return Err(AppError::BadRequest(format!("Unknown status: {status}")));
        }
    }

    let alerts =
        AlertRepo::list_for_user(&state.pool, auth.user_id, params.status.as_deref()).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// PATCH /api/v1/alerts/{id}
///
/// Update one alert's lifecycle status (mark read / resolved). The new
/// status is what the next engine run carries forward.
pub async fn update_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
    Json(input): Json<UpdateAlertRequest>,
) -> AppResult<impl IntoResponse> {
    let status = AlertStatus::from_str(&input.status)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {}", input.status)))?;

    let alert = AlertRepo::update_status(&state.pool, auth.user_id, alert_id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "alert",
            id: alert_id,
        }))?;

    tracing::info!(user_id = auth.user_id, alert_id, status = %input.status, "Alert status updated");

    Ok(Json(DataResponse { data: alert }))
}

/// POST /api/v1/alerts/sync
///
/// Manual "sync now" trigger. Returns the size of the regenerated alert
/// set even when the run was partially degraded.
pub async fn sync_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let outcome = run_alert_sync(&state, auth.user_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// Query params for the scheduled trigger.
#[derive(Debug, Deserialize)]
pub struct CronSyncQuery {
    /// Tenant to sync.
    pub user_id: DbId,
}

/// POST /api/v1/cron/alerts/sync
///
/// Scheduled trigger: unauthenticated but guarded by the `x-cron-secret`
/// shared-secret header.
pub async fn cron_sync_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CronSyncQuery>,
) -> AppResult<impl IntoResponse> {
    let provided = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !secrets_match(provided, &state.config.cron_secret) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid or missing cron secret".into(),
        )));
    }

    let outcome = run_alert_sync(&state, params.user_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// Compare secrets via SHA-256 digests so the comparison cannot leak
/// prefix length through timing.
fn secrets_match(provided: &str, expected: &str) -> bool {
    Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_comparison() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(!secrets_match("s3cret", "s3cret "));
        assert!(!secrets_match("", "s3cret"));
    }
}
