//! Repository for the `alerts` table.

use sqlx::PgPool;

use adpulse_core::alert::{AlertDraft, AlertStatus};
use adpulse_core::types::DbId;

use crate::models::alert::Alert;

/// Column list for `alerts` queries.
const COLUMNS: &str = "id, user_id, severity, status, client_id, ad_account_id, campaign_id, \
                       title, message, payload, created_at";

/// Provides read/replace operations for the alert store.
pub struct AlertRepo;

impl AlertRepo {
    /// List a user's alerts, newest first, optionally filtered by status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Update one alert's lifecycle status. Returns `None` when the
    /// alert does not exist or belongs to another user.
    pub async fn update_status(
        pool: &PgPool,
        user_id: DbId,
        alert_id: DbId,
        status: AlertStatus,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET status = $3 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(alert_id)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Atomically replace the user's entire alert set with the staged
    /// drafts.
    ///
    /// Runs delete + bulk insert in one transaction so readers never
    /// observe the intermediate empty state. An empty staged set leaves
    /// the store empty -- alerts not regenerated this run disappear.
    pub async fn replace_all(
        pool: &PgPool,
        user_id: DbId,
        drafts: &[AlertDraft],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM alerts WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if !drafts.is_empty() {
            let severities: Vec<&str> = drafts.iter().map(|d| d.severity.as_str()).collect();
            let statuses: Vec<&str> = drafts.iter().map(|d| d.status.as_str()).collect();
            let client_ids: Vec<Option<DbId>> = drafts.iter().map(|d| d.client_id).collect();
            let account_ids: Vec<Option<DbId>> = drafts.iter().map(|d| d.ad_account_id).collect();
            let campaign_ids: Vec<Option<DbId>> = drafts.iter().map(|d| d.campaign_id).collect();
            let titles: Vec<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
            let messages: Vec<&str> = drafts.iter().map(|d| d.message.as_str()).collect();
            let payloads: Vec<serde_json::Value> =
                drafts.iter().map(|d| d.payload.clone()).collect();

            sqlx::query(
                "INSERT INTO alerts \
                    (user_id, severity, status, client_id, ad_account_id, campaign_id, \
                     title, message, payload) \
                 SELECT $1, * FROM UNNEST($2::text[], $3::text[], $4::bigint[], \
                     $5::bigint[], $6::bigint[], $7::text[], $8::text[], $9::jsonb[])",
            )
            .bind(user_id)
            .bind(&severities)
            .bind(&statuses)
            .bind(&client_ids)
            .bind(&account_ids)
            .bind(&campaign_ids)
            .bind(&titles)
            .bind(&messages)
            .bind(&payloads)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(drafts.len() as u64)
    }
}
