//! Client (advertiser) entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use adpulse_core::types::{Cents, DbId, Timestamp};

/// A row from the `clients` table: one advertiser the agency manages
/// campaigns for.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub contact_email: Option<String>,
    pub monthly_budget_cents: Option<Cents>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client.
#[derive(Debug, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub contact_email: Option<String>,
    pub monthly_budget_cents: Option<Cents>,
}
