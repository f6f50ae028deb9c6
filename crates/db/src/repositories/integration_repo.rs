//! Repository for the `integrations` table.

use sqlx::PgPool;

use adpulse_core::types::{DbId, Timestamp};

use crate::models::integration::Integration;

const COLUMNS: &str =
    "user_id, status, sealed_access_token, last_sync_at, created_at, updated_at";

/// Provides access to the per-user provider integration.
pub struct IntegrationRepo;

impl IntegrationRepo {
    /// Find a user's integration. `None` means the tenant never
    /// connected the provider.
    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<Integration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM integrations WHERE user_id = $1");
        sqlx::query_as::<_, Integration>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Store a freshly sealed token and mark the integration connected.
    pub async fn upsert_connected(
        pool: &PgPool,
        user_id: DbId,
        sealed_access_token: &[u8],
    ) -> Result<Integration, sqlx::Error> {
        let query = format!(
            "INSERT INTO integrations (user_id, status, sealed_access_token) \
             VALUES ($1, 'CONNECTED', $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                status = 'CONNECTED', \
                sealed_access_token = EXCLUDED.sealed_access_token, \
                updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Integration>(&query)
            .bind(user_id)
            .bind(sealed_access_token)
            .fetch_one(pool)
            .await
    }

    /// Record a successful sync (written by the external sync jobs).
    pub async fn set_last_sync(
        pool: &PgPool,
        user_id: DbId,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE integrations SET last_sync_at = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(at)
        .execute(pool)
        .await?;
        Ok(())
    }
}
