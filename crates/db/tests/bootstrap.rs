use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    adpulse_db::health_check(&pool).await.unwrap();

    // Verify all tables exist and are queryable.
    let tables = [
        "users",
        "clients",
        "ad_accounts",
        "client_ad_accounts",
        "campaigns",
        "metric_snapshots",
        "alerts",
        "alert_configs",
        "integrations",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The partial unique index allows only one primary client per account.
#[sqlx::test(migrations = "../../migrations")]
async fn test_single_primary_client_per_account(pool: PgPool) {
    let user: (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash) VALUES ('a@b.c', 'x') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let client_a: (i64,) =
        sqlx::query_as("INSERT INTO clients (user_id, name) VALUES ($1, 'A') RETURNING id")
            .bind(user.0)
            .fetch_one(&pool)
            .await
            .unwrap();
    let client_b: (i64,) =
        sqlx::query_as("INSERT INTO clients (user_id, name) VALUES ($1, 'B') RETURNING id")
            .bind(user.0)
            .fetch_one(&pool)
            .await
            .unwrap();
    let account: (i64,) = sqlx::query_as(
        "INSERT INTO ad_accounts (user_id, external_id, name) \
         VALUES ($1, '123', 'Acc') RETURNING id",
    )
    .bind(user.0)
    .fetch_one(&pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO client_ad_accounts (client_id, ad_account_id, is_primary) \
         VALUES ($1, $2, true)",
    )
    .bind(client_a.0)
    .bind(account.0)
    .execute(&pool)
    .await
    .unwrap();

    // A second primary link for the same account must violate the
    // partial unique index.
    let second_primary = sqlx::query(
        "INSERT INTO client_ad_accounts (client_id, ad_account_id, is_primary) \
         VALUES ($1, $2, true)",
    )
    .bind(client_b.0)
    .bind(account.0)
    .execute(&pool)
    .await;
    assert!(second_primary.is_err());

    // A non-primary second link is fine.
    sqlx::query(
        "INSERT INTO client_ad_accounts (client_id, ad_account_id, is_primary) \
         VALUES ($1, $2, false)",
    )
    .bind(client_b.0)
    .bind(account.0)
    .execute(&pool)
    .await
    .unwrap();
}
