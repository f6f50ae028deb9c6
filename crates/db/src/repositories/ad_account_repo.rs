//! Repository for the `ad_accounts` and `client_ad_accounts` tables.

use sqlx::PgPool;

use adpulse_core::types::DbId;

use crate::models::ad_account::{AdAccount, AdAccountWithClient, CreateAdAccount};

const COLUMNS: &str = "id, user_id, external_id, name, status, currency, created_at, updated_at";

/// Provides ad account access, including primary-client joins.
pub struct AdAccountRepo;

impl AdAccountRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateAdAccount,
    ) -> Result<AdAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO ad_accounts (user_id, external_id, name, status, currency) \
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, 'USD')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdAccount>(&query)
            .bind(user_id)
            .bind(&input.external_id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(&input.currency)
            .fetch_one(pool)
            .await
    }

    /// Link an ad account to a client. A primary link demotes any
    /// existing primary for that account first, preserving the
    /// at-most-one-primary invariant.
    pub async fn link_client(
        pool: &PgPool,
        client_id: DbId,
        ad_account_id: DbId,
        is_primary: bool,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        if is_primary {
            sqlx::query(
                "UPDATE client_ad_accounts SET is_primary = false \
                 WHERE ad_account_id = $1 AND is_primary",
            )
            .bind(ad_account_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO client_ad_accounts (client_id, ad_account_id, is_primary) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (client_id, ad_account_id) DO UPDATE SET \
                is_primary = EXCLUDED.is_primary",
        )
        .bind(client_id)
        .bind(ad_account_id)
        .bind(is_primary)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// All of a user's accounts.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AdAccount>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ad_accounts WHERE user_id = $1 ORDER BY name ASC"
        );
        sqlx::query_as::<_, AdAccount>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Accounts joined with their primary client, optionally narrowed to
    /// one client. Feeds the dashboard highlight list and the
    /// aggregator's live fan-out.
    pub async fn list_with_primary_client(
        pool: &PgPool,
        user_id: DbId,
        client_id: Option<DbId>,
    ) -> Result<Vec<AdAccountWithClient>, sqlx::Error> {
        sqlx::query_as::<_, AdAccountWithClient>(
            "SELECT \
                 a.id, a.external_id, a.name, a.status, a.updated_at, \
                 link.client_id, \
                 cl.name AS client_name, \
                 cl.monthly_budget_cents \
             FROM ad_accounts a \
             LEFT JOIN client_ad_accounts link \
                 ON link.ad_account_id = a.id AND link.is_primary \
             LEFT JOIN clients cl ON cl.id = link.client_id \
             WHERE a.user_id = $1 \
               AND ($2::bigint IS NULL OR a.id IN ( \
                   SELECT ad_account_id FROM client_ad_accounts WHERE client_id = $2)) \
             ORDER BY a.name ASC",
        )
        .bind(user_id)
        .bind(client_id)
        .fetch_all(pool)
        .await
    }
}
