//! Liveness endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /healthz
///
/// Returns 200 with a database round-trip, so orchestrators see both
/// process and store health.
pub async fn healthz(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    adpulse_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
