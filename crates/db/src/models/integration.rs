//! Provider integration model.

use serde::Serialize;
use sqlx::FromRow;

use adpulse_core::types::{DbId, Timestamp};

/// Integration connection states.
pub const STATUS_CONNECTED: &str = "CONNECTED";
pub const STATUS_DISCONNECTED: &str = "DISCONNECTED";

/// A row from the `integrations` table: one per user, holding the
/// sealed provider access token and sync bookkeeping.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Integration {
    pub user_id: DbId,
    pub status: String,
    /// AES-GCM sealed access token; unsealed just in time for calls.
    #[serde(skip_serializing)]
    pub sealed_access_token: Option<Vec<u8>>,
    pub last_sync_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Integration {
    /// Whether live provider calls are possible.
    pub fn is_connected(&self) -> bool {
        self.status == STATUS_CONNECTED && self.sealed_access_token.is_some()
    }
}
