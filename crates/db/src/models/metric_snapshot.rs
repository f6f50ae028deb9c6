//! Daily metric snapshot model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use adpulse_core::types::{Cents, DbId, Timestamp};

/// What a snapshot row is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeType {
    AdAccount,
    Campaign,
}

impl ScopeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeType::AdAccount => "AD_ACCOUNT",
            ScopeType::Campaign => "CAMPAIGN",
        }
    }
}

/// A row from the `metric_snapshots` table. At most one row exists per
/// (scope_type, scope_id, snapshot_date).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MetricSnapshot {
    pub id: DbId,
    pub scope_type: String,
    pub scope_id: String,
    pub snapshot_date: NaiveDate,
    pub spend_cents: Cents,
    pub impressions: i64,
    pub clicks: i64,
    pub leads: i64,
    /// `round(spend/leads)`, NULL when the day recorded no leads.
    pub cost_per_lead_cents: Option<Cents>,
    pub source: String,
    pub created_at: Timestamp,
}

/// DTO for writing one day of metrics. The repository recomputes
/// `cost_per_lead_cents` from spend and leads on every write.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertMetricSnapshot {
    pub scope_type: ScopeType,
    pub scope_id: String,
    pub snapshot_date: NaiveDate,
    pub spend_cents: Cents,
    pub impressions: i64,
    pub clicks: i64,
    pub leads: i64,
    pub source: String,
}

/// Slim series row the alert engine reads for rule evaluation.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignSeriesRow {
    pub scope_id: String,
    pub snapshot_date: NaiveDate,
    pub spend_cents: Cents,
    pub leads: i64,
}

