//! Ad account entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use adpulse_core::types::{DbId, Timestamp};

/// A row from the `ad_accounts` table. `external_id` is the provider's
/// account id (without the `act_` prefix).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdAccount {
    pub id: DbId,
    pub user_id: DbId,
    pub external_id: String,
    pub name: String,
    pub status: String,
    pub currency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering an ad account.
#[derive(Debug, Deserialize)]
pub struct CreateAdAccount {
    pub external_id: String,
    pub name: String,
    pub status: Option<String>,
    pub currency: Option<String>,
}

/// Ad account joined with its primary client, as consumed by the
/// dashboard highlight list and the alert engine's attribution.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdAccountWithClient {
    pub id: DbId,
    pub external_id: String,
    pub name: String,
    pub status: String,
    pub updated_at: Timestamp,
    /// Primary client id, when one is linked.
    pub client_id: Option<DbId>,
    pub client_name: Option<String>,
    /// The primary client's monthly budget, used as the account's cap.
    pub monthly_budget_cents: Option<i64>,
}
