//! Repository for the `alert_configs` table.

use sqlx::PgPool;

use adpulse_core::types::DbId;

use crate::models::alert_config::{AlertConfig, UpdateAlertConfig};

const COLUMNS: &str = "user_id, budget_low_threshold_cents, enabled, created_at, updated_at";

/// Provides per-user alert configuration access.
pub struct AlertConfigRepo;

impl AlertConfigRepo {
    /// Find a user's config row. Returns `None` when none exists.
    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<AlertConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_configs WHERE user_id = $1");
        sqlx::query_as::<_, AlertConfig>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Load a user's config, falling back to
    /// [`AlertConfig::default_for`] when no row exists. The absent row
    /// is valid state, not an error.
    pub async fn load_or_default(pool: &PgPool, user_id: DbId) -> Result<AlertConfig, sqlx::Error> {
        Ok(Self::find(pool, user_id)
            .await?
            .unwrap_or_else(|| AlertConfig::default_for(user_id)))
    }

    /// Create the default config row for a new user.
    pub async fn create_default(pool: &PgPool, user_id: DbId) -> Result<AlertConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_configs (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        match sqlx::query_as::<_, AlertConfig>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
        {
            Some(config) => Ok(config),
            // Row already existed; read it back.
            None => Self::find(pool, user_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Update threshold and/or enabled flag.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateAlertConfig,
    ) -> Result<Option<AlertConfig>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_configs SET \
                budget_low_threshold_cents = COALESCE($2, budget_low_threshold_cents), \
                enabled = COALESCE($3, enabled), \
                updated_at = now() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertConfig>(&query)
            .bind(user_id)
            .bind(input.budget_low_threshold_cents)
            .bind(input.enabled)
            .fetch_optional(pool)
            .await
    }
}
