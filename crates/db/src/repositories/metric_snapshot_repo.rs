//! Repository for the `metric_snapshots` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use adpulse_core::metrics::snapshot_cost_per_lead;
use adpulse_core::types::DbId;

use crate::models::metric_snapshot::{CampaignSeriesRow, MetricSnapshot, UpsertMetricSnapshot};

const COLUMNS: &str = "id, scope_type, scope_id, snapshot_date, spend_cents, impressions, \
                       clicks, leads, cost_per_lead_cents, source, created_at";

/// Per-account spend over a window (dashboard highlights).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountSpendRow {
    pub ad_account_id: DbId,
    pub spend_cents: i64,
}

/// One account-day of snapshot metrics, keyed by the internal account
/// id. The aggregator mixes these with live rows account by account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountDailyRow {
    pub ad_account_id: DbId,
    pub snapshot_date: NaiveDate,
    pub spend_cents: i64,
    pub impressions: i64,
    pub clicks: i64,
    pub leads: i64,
}

/// Provides read access for the aggregator and engine, plus the upsert
/// used by sync jobs.
pub struct MetricSnapshotRepo;

impl MetricSnapshotRepo {
    /// Write one day of metrics. Recomputes the stored cost-per-lead
    /// deterministically from spend and leads; at most one row exists
    /// per (scope_type, scope_id, snapshot_date).
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertMetricSnapshot,
    ) -> Result<MetricSnapshot, sqlx::Error> {
        let cpl = snapshot_cost_per_lead(input.spend_cents, input.leads);
        let query = format!(
            "INSERT INTO metric_snapshots \
                (scope_type, scope_id, snapshot_date, spend_cents, impressions, clicks, \
                 leads, cost_per_lead_cents, source) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (scope_type, scope_id, snapshot_date) DO UPDATE SET \
                spend_cents = EXCLUDED.spend_cents, \
                impressions = EXCLUDED.impressions, \
                clicks = EXCLUDED.clicks, \
                leads = EXCLUDED.leads, \
                cost_per_lead_cents = EXCLUDED.cost_per_lead_cents, \
                source = EXCLUDED.source \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MetricSnapshot>(&query)
            .bind(input.scope_type.as_str())
            .bind(&input.scope_id)
            .bind(input.snapshot_date)
            .bind(input.spend_cents)
            .bind(input.impressions)
            .bind(input.clicks)
            .bind(input.leads)
            .bind(cpl)
            .bind(&input.source)
            .fetch_one(pool)
            .await
    }

    /// Find one snapshot row.
    pub async fn find(
        pool: &PgPool,
        scope_type: &str,
        scope_id: &str,
        snapshot_date: NaiveDate,
    ) -> Result<Option<MetricSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM metric_snapshots \
             WHERE scope_type = $1 AND scope_id = $2 AND snapshot_date = $3"
        );
        sqlx::query_as::<_, MetricSnapshot>(&query)
            .bind(scope_type)
            .bind(scope_id)
            .bind(snapshot_date)
            .fetch_optional(pool)
            .await
    }

    /// Campaign-scope series for every campaign of the user since a
    /// cutoff date, ascending by date. One batch read feeds a whole
    /// alert-engine run.
    pub async fn campaign_series_for_user(
        pool: &PgPool,
        user_id: DbId,
        since: NaiveDate,
    ) -> Result<Vec<CampaignSeriesRow>, sqlx::Error> {
        sqlx::query_as::<_, CampaignSeriesRow>(
            "SELECT ms.scope_id, ms.snapshot_date, ms.spend_cents, ms.leads \
             FROM metric_snapshots ms \
             WHERE ms.scope_type = 'CAMPAIGN' \
               AND ms.snapshot_date >= $2 \
               AND ms.scope_id IN ( \
                   SELECT c.external_id FROM campaigns c \
                   JOIN ad_accounts a ON a.id = c.ad_account_id \
                   WHERE a.user_id = $1) \
             ORDER BY ms.scope_id, ms.snapshot_date ASC",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Account-scope rows per account and day over a window, optionally
    /// narrowed to the accounts linked to one client. The
    /// aggregator reduces these in code so a live overlay can replace
    /// single accounts.
    pub async fn account_daily_rows(
        pool: &PgPool,
        user_id: DbId,
        client_id: Option<DbId>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AccountDailyRow>, sqlx::Error> {
        sqlx::query_as::<_, AccountDailyRow>(
            "SELECT a.id AS ad_account_id, ms.snapshot_date, \
                    ms.spend_cents, ms.impressions, ms.clicks, ms.leads \
             FROM metric_snapshots ms \
             JOIN ad_accounts a \
                 ON a.external_id = ms.scope_id AND a.user_id = $1 \
             WHERE ms.scope_type = 'AD_ACCOUNT' \
               AND ms.snapshot_date BETWEEN $3 AND $4 \
               AND ($2::bigint IS NULL OR a.id IN ( \
                   SELECT ad_account_id FROM client_ad_accounts WHERE client_id = $2)) \
             ORDER BY a.id, ms.snapshot_date ASC",
        )
        .bind(user_id)
        .bind(client_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Per-account spend over a window (highlight cards). Accounts with
    /// no snapshots in the window report zero.
    pub async fn account_spend(
        pool: &PgPool,
        user_id: DbId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AccountSpendRow>, sqlx::Error> {
        sqlx::query_as::<_, AccountSpendRow>(
            "SELECT a.id AS ad_account_id, COALESCE(SUM(ms.spend_cents), 0)::bigint AS spend_cents \
             FROM ad_accounts a \
             LEFT JOIN metric_snapshots ms \
                 ON ms.scope_type = 'AD_ACCOUNT' \
                AND ms.scope_id = a.external_id \
                AND ms.snapshot_date BETWEEN $2 AND $3 \
             WHERE a.user_id = $1 \
             GROUP BY a.id",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
