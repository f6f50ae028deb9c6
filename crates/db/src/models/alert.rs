//! Persisted alert model.

use serde::Serialize;
use sqlx::FromRow;

use adpulse_core::alert::{AlertKey, AlertStatus};
use adpulse_core::types::{DbId, Timestamp};

/// A row from the `alerts` table. The whole table contents for a user
/// are replaced on every rule-engine run; only `status` survives across
/// runs, carried forward by identity key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub user_id: DbId,
    pub severity: String,
    pub status: String,
    pub client_id: Option<DbId>,
    pub ad_account_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

impl Alert {
    /// Identity key matching [`adpulse_core::alert::AlertDraft::key`].
    pub fn key(&self) -> AlertKey {
        AlertKey {
            campaign_id: self.campaign_id,
            ad_account_id: self.ad_account_id,
            title: self.title.clone(),
            message: self.message.clone(),
        }
    }

    /// Parsed lifecycle status. Unknown text (schema drift) reads as
    /// `New`.
    pub fn parsed_status(&self) -> AlertStatus {
        AlertStatus::from_str(&self.status).unwrap_or(AlertStatus::New)
    }
}
