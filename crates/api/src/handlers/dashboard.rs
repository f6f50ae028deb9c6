//! Dashboard aggregation handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::engine::metrics;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::RangeQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// KPI totals, spend timeline, and account highlights over the resolved
/// window. Live provider problems degrade to stored snapshots; this
/// endpoint always answers.
pub async fn dashboard(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RangeQuery>,
) -> AppResult<impl IntoResponse> {
    let data = metrics::dashboard(&state, auth.user_id, &params).await?;
    Ok(Json(DataResponse { data }))
}
