//! Per-tenant alert configuration.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use adpulse_core::types::{Cents, DbId, Timestamp};

/// Default low-budget threshold when no config row exists: 1000 cents.
pub const DEFAULT_BUDGET_LOW_THRESHOLD_CENTS: Cents = 1000;

/// A row from the `alert_configs` table. One row per user, created with
/// defaults at registration.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertConfig {
    pub user_id: DbId,
    pub budget_low_threshold_cents: Cents,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AlertConfig {
    /// The configuration an absent row stands for.
    ///
    /// A missing `alert_configs` row is valid state, not an error; the
    /// engine behaves as if this row existed. This constructor is the
    /// contract for that case -- callers must not invent their own
    /// fallback values.
    pub fn default_for(user_id: DbId) -> Self {
        let now = chrono::Utc::now();
        Self {
            user_id,
            budget_low_threshold_cents: DEFAULT_BUDGET_LOW_THRESHOLD_CENTS,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for updating a user's alert config.
#[derive(Debug, Deserialize)]
pub struct UpdateAlertConfig {
    pub budget_low_threshold_cents: Option<Cents>,
    pub enabled: Option<bool>,
}
