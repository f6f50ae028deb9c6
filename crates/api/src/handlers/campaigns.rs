//! Campaign list handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use adpulse_core::types::DbId;

use crate::engine::metrics;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::RangeQuery;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query params for `GET /campaigns`: the shared range params plus list
/// filters. Kept flat (no nesting) because query-string deserialization
/// does not compose through nested structs.
#[derive(Debug, Deserialize)]
pub struct CampaignListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub preset: Option<String>,
    pub tz_offset_minutes: Option<i32>,
    pub client_id: Option<DbId>,
    /// Filter by provider status text (exact, case-insensitive).
    pub status: Option<String>,
    /// Case-insensitive name search.
    pub q: Option<String>,
}

impl CampaignListQuery {
    fn range(&self) -> RangeQuery {
        RangeQuery {
            from: self.from,
            to: self.to,
            preset: self.preset.clone(),
            tz_offset_minutes: self.tz_offset_minutes,
            client_id: self.client_id,
        }
    }
}

/// GET /api/v1/campaigns
///
/// Campaign table rows with window metrics, live-enriched per campaign
/// when an integration is connected.
pub async fn list_campaigns(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CampaignListQuery>,
) -> AppResult<impl IntoResponse> {
    let items = metrics::campaign_list(
        &state,
        auth.user_id,
        &params.range(),
        params.status.as_deref(),
        params.q.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: items }))
}
