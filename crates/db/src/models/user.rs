//! Agency user (tenant) model.

use serde::Serialize;
use sqlx::FromRow;

use adpulse_core::types::{DbId, Timestamp};

/// A row from the `users` table. One user is one agency tenant; every
/// client, account, campaign, and alert hangs off a `user_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
}
