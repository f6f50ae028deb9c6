//! Metrics aggregator.
//!
//! Answers dashboard and campaign-list queries with best-available
//! numbers: stored snapshots form the baseline, and when the tenant has
//! a connected integration, live insights replace each account's (or
//! campaign's) baseline contribution. Live failures degrade silently to
//! the baseline -- these queries never hard-fail over provider problems.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde::Serialize;

use adpulse_ads::types::InsightsRow;
use adpulse_core::metrics::{cost_per_lead_cents, leads_from_actions, response_rate_pct};
use adpulse_core::types::{Cents, DbId, Timestamp};
use adpulse_core::windows::{month_to_date, DateRange};
use adpulse_db::models::ad_account::AdAccountWithClient;
use adpulse_db::repositories::metric_snapshot_repo::AccountDailyRow;
use adpulse_db::repositories::{AdAccountRepo, CampaignRepo, IntegrationRepo, MetricSnapshotRepo};

use adpulse_core::tokens::unseal_token;

use crate::error::AppResult;
use crate::query::RangeQuery;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Aggregated KPIs over the requested window.
#[derive(Debug, Default, Serialize)]
pub struct KpiTotals {
    pub spend_cents: Cents,
    pub leads: i64,
    pub clicks: i64,
    pub impressions: i64,
    /// `round(spend/leads)`, 0 when leads = 0.
    pub cost_per_lead_cents: Cents,
    /// `leads/clicks*100` rounded to one decimal, 0 when clicks = 0.
    pub response_rate_pct: f64,
}

/// One day of the spend timeline.
#[derive(Debug, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub spend_cents: Cents,
}

/// Per-account highlight card.
#[derive(Debug, Serialize)]
pub struct AccountHighlight {
    pub ad_account_id: DbId,
    pub name: String,
    pub client_name: Option<String>,
    pub status: String,
    /// Spend over the calendar month to date.
    pub month_spend_cents: Cents,
    /// The primary client's monthly budget, shown as the account's cap.
    pub budget_cap_cents: Option<Cents>,
    pub updated_at: Timestamp,
}

/// Full dashboard payload.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub totals: KpiTotals,
    pub timeline: Vec<TimelinePoint>,
    pub highlights: Vec<AccountHighlight>,
    /// Whether any live account data made it into this response.
    pub live: bool,
}

/// One row of the campaign list.
#[derive(Debug, Serialize)]
pub struct CampaignListItem {
    pub id: DbId,
    pub external_id: String,
    pub name: String,
    pub objective: Option<String>,
    pub status: String,
    pub effective_status: String,
    /// Campaign-level daily budget, falling back to the sum of its ad
    /// sets' daily budgets when the campaign has none.
    pub daily_budget_cents: Option<Cents>,
    pub account_name: String,
    pub client_name: Option<String>,
    pub spend_cents: Cents,
    pub clicks: i64,
    pub leads: i64,
    pub cost_per_lead_cents: Cents,
}

// ---------------------------------------------------------------------------
// Internal per-day representation
// ---------------------------------------------------------------------------

/// One day of metrics, source-independent.
#[derive(Debug, Clone, Copy, Default)]
struct DayMetrics {
    spend_cents: Cents,
    impressions: i64,
    clicks: i64,
    leads: i64,
}

fn from_snapshot_rows(rows: &[AccountDailyRow]) -> BTreeMap<NaiveDate, DayMetrics> {
    let mut days = BTreeMap::new();
    for row in rows {
        let day: &mut DayMetrics = days.entry(row.snapshot_date).or_default();
        day.spend_cents += row.spend_cents;
        day.impressions += row.impressions;
        day.clicks += row.clicks;
        day.leads += row.leads;
    }
    days
}

fn from_insights_rows(rows: &[InsightsRow]) -> BTreeMap<NaiveDate, DayMetrics> {
    let mut days = BTreeMap::new();
    for row in rows {
        let Some(date) = row.date() else { continue };
        let day: &mut DayMetrics = days.entry(date).or_default();
        day.spend_cents += row.spend_cents();
        day.impressions += row.impressions();
        day.clicks += row.clicks();
        day.leads += leads_from_actions(&row.action_pairs());
    }
    days
}

fn sum_spend(days: &BTreeMap<NaiveDate, DayMetrics>) -> Cents {
    days.values().map(|d| d.spend_cents).sum()
}

// ---------------------------------------------------------------------------
// Dashboard aggregation
// ---------------------------------------------------------------------------

/// Live fetch result for one account: window days + month-to-date days.
struct LiveAccount {
    window: BTreeMap<NaiveDate, DayMetrics>,
    month: BTreeMap<NaiveDate, DayMetrics>,
}

/// Build the dashboard payload for a tenant.
pub async fn dashboard(state: &AppState, user_id: DbId, query: &RangeQuery) -> AppResult<DashboardData> {
    let now = Utc::now();
    let range = query.resolve(now)?;
    let month_range = month_to_date(now, query.tz_offset());

    let accounts =
        AdAccountRepo::list_with_primary_client(&state.pool, user_id, query.client_id).await?;

    // Snapshot baseline, grouped per account so the live overlay can
    // replace single accounts.
    let window_rows =
        MetricSnapshotRepo::account_daily_rows(&state.pool, user_id, query.client_id, range.from, range.to)
            .await?;
    let mut baseline_window: HashMap<DbId, Vec<AccountDailyRow>> = HashMap::new();
    for row in window_rows {
        baseline_window.entry(row.ad_account_id).or_default().push(row);
    }

    let month_spend =
        MetricSnapshotRepo::account_spend(&state.pool, user_id, month_range.from, month_range.to)
            .await?;
    let baseline_month: HashMap<DbId, Cents> = month_spend
        .into_iter()
        .map(|r| (r.ad_account_id, r.spend_cents))
        .collect();

    // Live overlay: fan out one future per account, each fetching the
    // requested window and the month-to-date window concurrently.
    let live = fetch_live_accounts(state, user_id, &accounts, range, month_range).await;

    // Reduce: each account contributes live days when its fetch
    // succeeded, snapshot days otherwise.
    let mut days: BTreeMap<NaiveDate, DayMetrics> = BTreeMap::new();
    let mut any_live = false;
    let mut highlights = Vec::with_capacity(accounts.len());

    for account in &accounts {
        let live_account = live.get(&account.id);

        let account_days = match live_account {
            Some(l) => {
                any_live = true;
                l.window.clone()
            }
            None => from_snapshot_rows(
                baseline_window
                    .get(&account.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
            ),
        };
        for (date, metrics) in account_days {
            let day = days.entry(date).or_default();
            day.spend_cents += metrics.spend_cents;
            day.impressions += metrics.impressions;
            day.clicks += metrics.clicks;
            day.leads += metrics.leads;
        }

        let month_spend_cents = match live_account {
            Some(l) => sum_spend(&l.month),
            None => baseline_month.get(&account.id).copied().unwrap_or(0),
        };
        highlights.push(AccountHighlight {
            ad_account_id: account.id,
            name: account.name.clone(),
            client_name: account.client_name.clone(),
            status: account.status.clone(),
            month_spend_cents,
            budget_cap_cents: account.monthly_budget_cents,
            updated_at: account.updated_at,
        });
    }

    let mut totals = KpiTotals::default();
    let mut timeline = Vec::with_capacity(days.len());
    for (date, day) in &days {
        totals.spend_cents += day.spend_cents;
        totals.impressions += day.impressions;
        totals.clicks += day.clicks;
        totals.leads += day.leads;
        timeline.push(TimelinePoint {
            date: *date,
            spend_cents: day.spend_cents,
        });
    }
    totals.cost_per_lead_cents = cost_per_lead_cents(totals.spend_cents, totals.leads);
    totals.response_rate_pct = response_rate_pct(totals.leads, totals.clicks);

    Ok(DashboardData {
        totals,
        timeline,
        highlights,
        live: any_live,
    })
}

/// Fan out live insight fetches per account. Returns only the accounts
/// whose fetches succeeded; errors are logged and swallowed so the
/// caller falls back to snapshots account by account.
async fn fetch_live_accounts(
    state: &AppState,
    user_id: DbId,
    accounts: &[AdAccountWithClient],
    range: DateRange,
    month_range: DateRange,
) -> HashMap<DbId, LiveAccount> {
    let Some(token) = live_access_token(state, user_id).await else {
        return HashMap::new();
    };

    let futures = accounts.iter().map(|account| {
        let token = token.clone();
        let ads = state.ads.clone();
        async move {
            let window = ads.fetch_account_insights(&token, &account.external_id, range.from, range.to);
            let month = ads.fetch_account_insights(
                &token,
                &account.external_id,
                month_range.from,
                month_range.to,
            );
            match futures::future::try_join(window, month).await {
                Ok((window_rows, month_rows)) => Some((
                    account.id,
                    LiveAccount {
                        window: from_insights_rows(&window_rows),
                        month: from_insights_rows(&month_rows),
                    },
                )),
                Err(e) => {
                    tracing::warn!(
                        ad_account_id = account.id,
                        error = %e,
                        "Live insights fetch failed, falling back to snapshots"
                    );
                    None
                }
            }
        }
    });

    join_all(futures).await.into_iter().flatten().collect()
}

/// Unseal the tenant's access token when a connected integration exists.
///
/// Any problem (no integration, disconnected, unsealing failure) means
/// "no live data" -- never an error surfaced to the caller.
async fn live_access_token(state: &AppState, user_id: DbId) -> Option<String> {
    let integration = match IntegrationRepo::find(&state.pool, user_id).await {
        Ok(integration) => integration?,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Integration lookup failed, skipping live data");
            return None;
        }
    };
    if !integration.is_connected() {
        return None;
    }
    let blob = integration.sealed_access_token.as_deref().unwrap_or_default();
    match unseal_token(&state.config.token_seal_key, blob) {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::error!(user_id, error = %e, "Failed to unseal access token, skipping live data");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Campaign list aggregation
// ---------------------------------------------------------------------------

/// Build the campaign list for a tenant: stored rows enriched per
/// campaign with live insights and ad-set budget fallback.
pub async fn campaign_list(
    state: &AppState,
    user_id: DbId,
    query: &RangeQuery,
    status: Option<&str>,
    search: Option<&str>,
) -> AppResult<Vec<CampaignListItem>> {
    let now = Utc::now();
    let range = query.resolve(now)?;

    let rows = CampaignRepo::list_with_metrics(
        &state.pool,
        user_id,
        range.from,
        range.to,
        query.client_id,
        status,
        search,
    )
    .await?;

    let token = live_access_token(state, user_id).await;

    let futures = rows.into_iter().map(|row| {
        let token = token.clone();
        let ads = state.ads.clone();
        async move {
            let mut item = CampaignListItem {
                cost_per_lead_cents: cost_per_lead_cents(row.spend_cents, row.leads),
                id: row.id,
                external_id: row.external_id,
                name: row.name,
                objective: row.objective,
                status: row.status,
                effective_status: row.effective_status,
                daily_budget_cents: row.daily_budget_cents,
                account_name: row.account_name,
                client_name: row.client_name,
                spend_cents: row.spend_cents,
                clicks: row.clicks,
                leads: row.leads,
            };

            let Some(token) = token.as_deref() else {
                return item;
            };

            // Live insights replace the snapshot-derived numbers when
            // the fetch succeeds; failures keep the baseline.
            match ads
                .fetch_campaign_insights(token, &item.external_id, range.from, range.to)
                .await
            {
                Ok(rows) => {
                    let days = from_insights_rows(&rows);
                    let mut spend = 0;
                    let mut clicks = 0;
                    let mut leads = 0;
                    for day in days.values() {
                        spend += day.spend_cents;
                        clicks += day.clicks;
                        leads += day.leads;
                    }
                    item.spend_cents = spend;
                    item.clicks = clicks;
                    item.leads = leads;
                    item.cost_per_lead_cents = cost_per_lead_cents(spend, leads);
                }
                Err(e) => {
                    tracing::warn!(
                        campaign_id = item.id,
                        error = %e,
                        "Live campaign insights failed, keeping snapshot metrics"
                    );
                }
            }

            // Campaign-level budget takes precedence; ad sets fill the
            // gap when the campaign has none.
            if item.daily_budget_cents.is_none() {
                match ads.fetch_campaign_ad_sets(token, &item.external_id).await {
                    Ok(ad_sets) => {
                        let total: Cents = ad_sets
                            .iter()
                            .filter_map(|s| s.daily_budget_cents())
                            .sum();
                        if total > 0 {
                            item.daily_budget_cents = Some(total);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            campaign_id = item.id,
                            error = %e,
                            "Ad set budget fetch failed"
                        );
                    }
                }
            }

            item
        }
    });

    Ok(join_all(futures).await)
}
