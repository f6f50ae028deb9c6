//! Integration tests for the metrics aggregator: snapshot baselines,
//! derived KPIs, live overlay, per-account fallback, and the campaign
//! list.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use sqlx::PgPool;

use adpulse_api::engine::metrics::{campaign_list, dashboard};
use adpulse_api::query::RangeQuery;
use adpulse_core::tokens::seal_token;
use adpulse_db::models::ad_account::CreateAdAccount;
use adpulse_db::models::campaign::CreateCampaign;
use adpulse_db::models::client::CreateClient;
use adpulse_db::models::metric_snapshot::{ScopeType, UpsertMetricSnapshot};
use adpulse_db::repositories::{
    AdAccountRepo, CampaignRepo, ClientRepo, IntegrationRepo, MetricSnapshotRepo, UserRepo,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn range(from: u32, to: u32) -> RangeQuery {
    RangeQuery {
        from: Some(date(from)),
        to: Some(date(to)),
        preset: None,
        tz_offset_minutes: None,
        client_id: None,
    }
}

async fn seed_account_metrics(pool: &PgPool) -> i64 {
    let user = UserRepo::create(pool, "agency@test.dev", "x").await.unwrap();
    let client = ClientRepo::create(
        pool,
        user.id,
        &CreateClient {
            name: "Horizon Realty".to_string(),
            contact_email: None,
            monthly_budget_cents: Some(500_000),
        },
    )
    .await
    .unwrap();
    let account = AdAccountRepo::create(
        pool,
        user.id,
        &CreateAdAccount {
            external_id: "1111".to_string(),
            name: "Horizon Meta".to_string(),
            status: Some("ACTIVE".to_string()),
            currency: None,
        },
    )
    .await
    .unwrap();
    AdAccountRepo::link_client(pool, client.id, account.id, true)
        .await
        .unwrap();

    // Three account-days: 1000/2000/3000 cents, 200 clicks and 10 leads
    // in total, with the last day click- and lead-free.
    let days = [
        (1u32, 1000i64, 100i64, 5i64),
        (2, 2000, 100, 5),
        (3, 3000, 0, 0),
    ];
    for (d, spend, clicks, leads) in days {
        MetricSnapshotRepo::upsert(
            pool,
            &UpsertMetricSnapshot {
                scope_type: ScopeType::AdAccount,
                scope_id: "1111".to_string(),
                snapshot_date: date(d),
                spend_cents: spend,
                impressions: 1000,
                clicks,
                leads,
                source: "test".to_string(),
            },
        )
        .await
        .unwrap();
    }

    user.id
}

// ---------------------------------------------------------------------------
// Snapshot baseline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_baseline_totals_and_derived_kpis(pool: PgPool) {
    let user_id = seed_account_metrics(&pool).await;
    let state = common::test_state(pool, None);

    let data = dashboard(&state, user_id, &range(1, 3)).await.unwrap();

    assert_eq!(data.totals.spend_cents, 6000);
    assert_eq!(data.totals.clicks, 200);
    assert_eq!(data.totals.leads, 10);
    assert_eq!(data.totals.cost_per_lead_cents, 600);
    assert_eq!(data.totals.response_rate_pct, 5.0);
    assert!(!data.live);

    let spends: Vec<i64> = data.timeline.iter().map(|p| p.spend_cents).collect();
    assert_eq!(spends, vec![1000, 2000, 3000]);

    assert_matches!(data.highlights.as_slice(), [highlight] => {
        assert_eq!(highlight.name, "Horizon Meta");
        assert_eq!(highlight.client_name.as_deref(), Some("Horizon Realty"));
        assert_eq!(highlight.budget_cap_cents, Some(500_000));
    });
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_kpis_guard_zero_division(pool: PgPool) {
    let user = UserRepo::create(&pool, "zero@test.dev", "x").await.unwrap();
    AdAccountRepo::create(
        &pool,
        user.id,
        &CreateAdAccount {
            external_id: "2222".to_string(),
            name: "No leads".to_string(),
            status: None,
            currency: None,
        },
    )
    .await
    .unwrap();

    MetricSnapshotRepo::upsert(
        &pool,
        &UpsertMetricSnapshot {
            scope_type: ScopeType::AdAccount,
            scope_id: "2222".to_string(),
            snapshot_date: date(1),
            spend_cents: 12_345,
            impressions: 500,
            clicks: 0,
            leads: 0,
            source: "test".to_string(),
        },
    )
    .await
    .unwrap();

    let state = common::test_state(pool, None);
    let data = dashboard(&state, user.id, &range(1, 1)).await.unwrap();

    assert_eq!(data.totals.spend_cents, 12_345);
    assert_eq!(data.totals.cost_per_lead_cents, 0);
    assert_eq!(data.totals.response_rate_pct, 0.0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_window_excludes_out_of_range_days(pool: PgPool) {
    let user_id = seed_account_metrics(&pool).await;
    let state = common::test_state(pool, None);

    let data = dashboard(&state, user_id, &range(2, 3)).await.unwrap();
    assert_eq!(data.totals.spend_cents, 5000);
    assert_eq!(data.timeline.len(), 2);
}

// ---------------------------------------------------------------------------
// Live overlay
// ---------------------------------------------------------------------------

async fn spawn_provider(status: StatusCode, body: serde_json::Value) -> (String, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let handler_counter = Arc::clone(&counter);

    let app = Router::new().fallback(move || {
        let counter = Arc::clone(&handler_counter);
        let body = body.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (status, Json(body))
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), counter)
}

async fn connect_integration(pool: &PgPool, user_id: i64) {
    let sealed = seal_token(&common::test_seal_key(), "test-access-token").unwrap();
    IntegrationRepo::upsert_connected(pool, user_id, &sealed)
        .await
        .unwrap();
    IntegrationRepo::set_last_sync(pool, user_id, Utc::now()).await.unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_live_data_replaces_baseline_entirely(pool: PgPool) {
    let user_id = seed_account_metrics(&pool).await;
    connect_integration(&pool, user_id).await;

    // The provider reports one day: 50.00 spend, 200 clicks, 10 leads.
    let (base_url, counter) = spawn_provider(
        StatusCode::OK,
        json!({
            "data": [{
                "date_start": "2025-06-01",
                "spend": "50.00",
                "impressions": "1000",
                "clicks": "200",
                "actions": [
                    { "action_type": "link_click", "value": "200" },
                    { "action_type": "lead", "value": "10" },
                ],
            }],
        }),
    )
    .await;
    let state = common::test_state(pool, Some(base_url));

    let data = dashboard(&state, user_id, &range(1, 3)).await.unwrap();

    // Live numbers replaced the 6000-cent baseline, not merged with it.
    assert!(data.live);
    assert_eq!(data.totals.spend_cents, 5000);
    assert_eq!(data.totals.clicks, 200);
    assert_eq!(data.totals.leads, 10);
    assert_eq!(data.totals.cost_per_lead_cents, 500);
    assert_eq!(data.timeline.len(), 1);

    // Both the window and the month-to-date fetch went out.
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    // Highlight month spend comes from the live month fetch.
    assert_eq!(data.highlights[0].month_spend_cents, 5000);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_live_failure_falls_back_to_baseline(pool: PgPool) {
    let user_id = seed_account_metrics(&pool).await;
    connect_integration(&pool, user_id).await;

    let (base_url, _counter) = spawn_provider(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "code": 1, "message": "unexpected error" } }),
    )
    .await;
    let state = common::test_state(pool, Some(base_url));

    let data = dashboard(&state, user_id, &range(1, 3)).await.unwrap();

    // The response still answers, with the snapshot baseline.
    assert!(!data.live);
    assert_eq!(data.totals.spend_cents, 6000);
    assert_eq!(data.highlights[0].month_spend_cents, 0);
}

// ---------------------------------------------------------------------------
// Campaign list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_campaign_list_baseline_and_filters(pool: PgPool) {
    let user_id = seed_account_metrics(&pool).await;

    let account_id: (i64,) =
        sqlx::query_as("SELECT id FROM ad_accounts WHERE user_id = $1 LIMIT 1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();

    let mk = |external: &str, name: &str, status: &str| CreateCampaign {
        ad_account_id: account_id.0,
        external_id: external.to_string(),
        name: name.to_string(),
        objective: None,
        status: Some(status.to_string()),
        effective_status: Some(status.to_string()),
        daily_budget_cents: Some(3000),
        lifetime_budget_cents: None,
    };
    CampaignRepo::create(&pool, &mk("cmp_1", "Riverside lead gen", "ACTIVE"))
        .await
        .unwrap();
    CampaignRepo::create(&pool, &mk("cmp_2", "Open house promo", "PAUSED"))
        .await
        .unwrap();

    for (d, spend, leads) in [(1u32, 1000i64, 2i64), (2, 1000, 0)] {
        MetricSnapshotRepo::upsert(
            &pool,
            &UpsertMetricSnapshot {
                scope_type: ScopeType::Campaign,
                scope_id: "cmp_1".to_string(),
                snapshot_date: date(d),
                spend_cents: spend,
                impressions: 100,
                clicks: 10,
                leads,
                source: "test".to_string(),
            },
        )
        .await
        .unwrap();
    }

    let state = common::test_state(pool, None);

    let items = campaign_list(&state, user_id, &range(1, 3), None, None)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);

    let lead_gen = items.iter().find(|c| c.external_id == "cmp_1").unwrap();
    assert_eq!(lead_gen.spend_cents, 2000);
    assert_eq!(lead_gen.leads, 2);
    assert_eq!(lead_gen.cost_per_lead_cents, 1000);
    assert_eq!(lead_gen.client_name.as_deref(), Some("Horizon Realty"));

    // Name search.
    let found = campaign_list(&state, user_id, &range(1, 3), None, Some("river"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].external_id, "cmp_1");

    // Status filter.
    let paused = campaign_list(&state, user_id, &range(1, 3), Some("PAUSED"), None)
        .await
        .unwrap();
    assert_eq!(paused.len(), 1);
    assert_eq!(paused[0].external_id, "cmp_2");
}
