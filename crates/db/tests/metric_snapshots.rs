//! Integration tests for the metric snapshot store.

use chrono::NaiveDate;
use sqlx::PgPool;

use adpulse_db::models::metric_snapshot::{ScopeType, UpsertMetricSnapshot};
use adpulse_db::repositories::MetricSnapshotRepo;

fn snapshot(scope_id: &str, date: NaiveDate, spend: i64, leads: i64) -> UpsertMetricSnapshot {
    UpsertMetricSnapshot {
        scope_type: ScopeType::Campaign,
        scope_id: scope_id.to_string(),
        snapshot_date: date,
        spend_cents: spend,
        impressions: 1000,
        clicks: 40,
        leads,
        source: "test".to_string(),
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

/// A snapshot written then read back yields identical scope, date, and
/// metric values, with CPL recomputed deterministically.
#[sqlx::test(migrations = "../../migrations")]
async fn test_snapshot_round_trip(pool: PgPool) {
    let written = MetricSnapshotRepo::upsert(&pool, &snapshot("cmp_1", date(1), 5000, 4))
        .await
        .unwrap();
    assert_eq!(written.cost_per_lead_cents, Some(1250));

    let read = MetricSnapshotRepo::find(&pool, "CAMPAIGN", "cmp_1", date(1))
        .await
        .unwrap()
        .expect("snapshot must exist");

    assert_eq!(read.scope_type, "CAMPAIGN");
    assert_eq!(read.scope_id, "cmp_1");
    assert_eq!(read.snapshot_date, date(1));
    assert_eq!(read.spend_cents, 5000);
    assert_eq!(read.leads, 4);
    assert_eq!(read.cost_per_lead_cents, Some(1250));
}

/// CPL is NULL (not zero) for days without leads, whatever the spend.
#[sqlx::test(migrations = "../../migrations")]
async fn test_cpl_null_without_leads(pool: PgPool) {
    let written = MetricSnapshotRepo::upsert(&pool, &snapshot("cmp_1", date(2), 9999, 0))
        .await
        .unwrap();
    assert_eq!(written.cost_per_lead_cents, None);
}

/// Writing the same (scope, date) twice updates in place; the unique
/// constraint guarantees one row per scope and day.
#[sqlx::test(migrations = "../../migrations")]
async fn test_upsert_is_idempotent_per_day(pool: PgPool) {
    MetricSnapshotRepo::upsert(&pool, &snapshot("cmp_1", date(3), 1000, 1))
        .await
        .unwrap();
    let updated = MetricSnapshotRepo::upsert(&pool, &snapshot("cmp_1", date(3), 2000, 2))
        .await
        .unwrap();

    assert_eq!(updated.spend_cents, 2000);
    assert_eq!(updated.cost_per_lead_cents, Some(1000));

    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM metric_snapshots WHERE scope_id = 'cmp_1' AND snapshot_date = $1",
    )
    .bind(date(3))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count.0, 1);
}

/// The engine's batch series read only returns campaign-scope rows for
/// the requested user, ascending by date.
#[sqlx::test(migrations = "../../migrations")]
async fn test_campaign_series_scoping(pool: PgPool) {
    let user: (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password_hash) VALUES ('a@b.c', 'x') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let account: (i64,) = sqlx::query_as(
        "INSERT INTO ad_accounts (user_id, external_id, name) \
         VALUES ($1, 'acct_1', 'Acc') RETURNING id",
    )
    .bind(user.0)
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO campaigns (ad_account_id, external_id, name) VALUES ($1, 'cmp_1', 'C1')",
    )
    .bind(account.0)
    .execute(&pool)
    .await
    .unwrap();

    for d in [3u32, 1, 2] {
        MetricSnapshotRepo::upsert(&pool, &snapshot("cmp_1", date(d), 100 * d as i64, 0))
            .await
            .unwrap();
    }
    // A campaign that belongs to nobody we know: must not appear.
    MetricSnapshotRepo::upsert(&pool, &snapshot("cmp_foreign", date(1), 777, 0))
        .await
        .unwrap();

    let series = MetricSnapshotRepo::campaign_series_for_user(&pool, user.0, date(1))
        .await
        .unwrap();

    assert_eq!(series.len(), 3);
    assert!(series.iter().all(|r| r.scope_id == "cmp_1"));
    let dates: Vec<NaiveDate> = series.iter().map(|r| r.snapshot_date).collect();
    assert_eq!(dates, vec![date(1), date(2), date(3)]);
}
