//! Campaign registry model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use adpulse_core::types::{Cents, DbId, Timestamp};

/// A row from the `campaigns` table. Status fields hold the provider's
/// last known values; the alert engine refreshes them when it fetches
/// live details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub ad_account_id: DbId,
    pub external_id: String,
    pub name: String,
    pub objective: Option<String>,
    pub status: String,
    pub effective_status: String,
    pub daily_budget_cents: Option<Cents>,
    pub lifetime_budget_cents: Option<Cents>,
    pub updated_at: Timestamp,
}

/// DTO for registering a campaign.
#[derive(Debug, Deserialize)]
pub struct CreateCampaign {
    pub ad_account_id: DbId,
    pub external_id: String,
    pub name: String,
    pub objective: Option<String>,
    pub status: Option<String>,
    pub effective_status: Option<String>,
    pub daily_budget_cents: Option<Cents>,
    pub lifetime_budget_cents: Option<Cents>,
}

/// Campaign row with window metrics attached, as served by the campaign
/// list endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignWithMetrics {
    pub id: DbId,
    pub external_id: String,
    pub name: String,
    pub objective: Option<String>,
    pub status: String,
    pub effective_status: String,
    pub daily_budget_cents: Option<Cents>,
    pub account_name: String,
    pub client_name: Option<String>,
    pub spend_cents: Cents,
    pub clicks: i64,
    pub leads: i64,
}

/// Campaign joined with its ad account and the account's primary client,
/// as read in one batch at the start of an alert-engine run.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignContext {
    pub id: DbId,
    pub external_id: String,
    pub name: String,
    pub status: String,
    pub effective_status: String,
    pub daily_budget_cents: Option<Cents>,
    pub ad_account_id: DbId,
    pub account_external_id: String,
    /// Primary client of the owning account, when linked.
    pub client_id: Option<DbId>,
}
