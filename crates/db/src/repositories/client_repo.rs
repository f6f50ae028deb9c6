//! Repository for the `clients` table.

use sqlx::PgPool;

use adpulse_core::types::DbId;

use crate::models::client::{Client, CreateClient};

const COLUMNS: &str =
    "id, user_id, name, contact_email, monthly_budget_cents, created_at, updated_at";

/// Provides client (advertiser) access.
pub struct ClientRepo;

impl ClientRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateClient,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (user_id, name, contact_email, monthly_budget_cents) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(input.monthly_budget_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE user_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Client>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
