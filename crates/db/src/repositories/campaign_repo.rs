//! Repository for the `campaigns` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use adpulse_core::types::DbId;

use crate::models::campaign::{Campaign, CampaignContext, CampaignWithMetrics, CreateCampaign};

const COLUMNS: &str = "id, ad_account_id, external_id, name, objective, status, \
                       effective_status, daily_budget_cents, lifetime_budget_cents, updated_at";

/// Provides campaign registry access.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Register a campaign (sync jobs upsert by provider id).
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns \
                (ad_account_id, external_id, name, objective, status, effective_status, \
                 daily_budget_cents, lifetime_budget_cents) \
             VALUES ($1, $2, $3, $4, COALESCE($5, ''), COALESCE($6, ''), $7, $8) \
             ON CONFLICT (external_id) DO UPDATE SET \
                name = EXCLUDED.name, \
                objective = EXCLUDED.objective, \
                daily_budget_cents = EXCLUDED.daily_budget_cents, \
                lifetime_budget_cents = EXCLUDED.lifetime_budget_cents, \
                updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(input.ad_account_id)
            .bind(&input.external_id)
            .bind(&input.name)
            .bind(&input.objective)
            .bind(&input.status)
            .bind(&input.effective_status)
            .bind(input.daily_budget_cents)
            .bind(input.lifetime_budget_cents)
            .fetch_one(pool)
            .await
    }

    /// Batch read for an alert-engine run: every campaign of the user,
    /// joined with its ad account and the account's primary client.
    pub async fn list_context_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CampaignContext>, sqlx::Error> {
        sqlx::query_as::<_, CampaignContext>(
            "SELECT \
                 c.id, c.external_id, c.name, c.status, c.effective_status, \
                 c.daily_budget_cents, \
                 c.ad_account_id, \
                 a.external_id AS account_external_id, \
                 link.client_id \
             FROM campaigns c \
             JOIN ad_accounts a ON a.id = c.ad_account_id \
             LEFT JOIN client_ad_accounts link \
                 ON link.ad_account_id = a.id AND link.is_primary \
             WHERE a.user_id = $1 \
             ORDER BY c.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Persist a refreshed live status back to the registry.
    pub async fn update_live_status(
        pool: &PgPool,
        campaign_id: DbId,
        status: &str,
        effective_status: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE campaigns SET status = $2, effective_status = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(campaign_id)
        .bind(status)
        .bind(effective_status)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Campaign list with snapshot metrics summed over a window,
    /// filtered by client / status / name search.
    pub async fn list_with_metrics(
        pool: &PgPool,
        user_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
        client_id: Option<DbId>,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<CampaignWithMetrics>, sqlx::Error> {
        sqlx::query_as::<_, CampaignWithMetrics>(
            "SELECT \
                 c.id, c.external_id, c.name, c.objective, c.status, c.effective_status, \
                 c.daily_budget_cents, \
                 a.name AS account_name, \
                 cl.name AS client_name, \
                 COALESCE(SUM(ms.spend_cents), 0)::bigint AS spend_cents, \
                 COALESCE(SUM(ms.clicks), 0)::bigint AS clicks, \
                 COALESCE(SUM(ms.leads), 0)::bigint AS leads \
             FROM campaigns c \
             JOIN ad_accounts a ON a.id = c.ad_account_id \
             LEFT JOIN client_ad_accounts link \
                 ON link.ad_account_id = a.id AND link.is_primary \
             LEFT JOIN clients cl ON cl.id = link.client_id \
             LEFT JOIN metric_snapshots ms \
                 ON ms.scope_type = 'CAMPAIGN' \
                AND ms.scope_id = c.external_id \
                AND ms.snapshot_date BETWEEN $2 AND $3 \
             WHERE a.user_id = $1 \
               AND ($4::bigint IS NULL OR link.client_id = $4) \
               AND ($5::text IS NULL OR c.status ILIKE $5 OR c.effective_status ILIKE $5) \
               AND ($6::text IS NULL OR c.name ILIKE '%' || $6 || '%') \
             GROUP BY c.id, a.name, cl.name \
             ORDER BY spend_cents DESC, c.name ASC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(client_id)
        .bind(status)
        .bind(search)
        .fetch_all(pool)
        .await
    }
}
