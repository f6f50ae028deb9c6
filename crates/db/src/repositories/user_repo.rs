//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::User;

const COLUMNS: &str = "id, email, password_hash, created_at";

/// Provides user lookup for authentication and test seeding.
pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
