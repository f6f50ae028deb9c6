//! Alert rule engine.
//!
//! One run produces the authoritative alert set for a tenant: it reads
//! campaigns, their trailing metric series, the current alert store, and
//! the integration in one batch, optionally refreshes campaign status
//! from the provider (bounded), evaluates the rules, and atomically
//! replaces the stored alerts. User-facing alert statuses survive across
//! runs via identity-key carry-forward.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use adpulse_core::alert::{AlertScope, BudgetContext};
use adpulse_core::delivery::{classify, looks_troubled};
use adpulse_core::rules::{
    self, CampaignWindow, DailyMetric, DETAIL_CALL_BUDGET, SNAPSHOT_WINDOW_DAYS,
};
use adpulse_core::staging::{AlertStaging, RunState};
use adpulse_core::tokens::unseal_token;
use adpulse_core::types::DbId;
use adpulse_db::models::campaign::CampaignContext;
use adpulse_db::repositories::{
    AlertConfigRepo, AlertRepo, CampaignRepo, IntegrationRepo, MetricSnapshotRepo,
};

use crate::error::AppResult;
use crate::state::AppState;

/// Result summary of one engine run.
#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    /// Alerts in the committed set.
    pub created: u64,
    /// Whether the provider cut the run's live calls short.
    pub rate_limited: bool,
}

/// Run the alert engine for one tenant.
///
/// A single campaign's fetch failure never aborts the run; only a
/// commit failure does. A detected rate limit stops further live calls
/// while keeping all work done so far.
pub async fn run_alert_sync(state: &AppState, user_id: DbId) -> AppResult<SyncOutcome> {
    let now = Utc::now();

    // All persistence reads happen up front, before any external call.
    let config = AlertConfigRepo::load_or_default(&state.pool, user_id).await?;
    if !config.enabled {
        tracing::info!(user_id, "Alerting disabled for tenant, leaving alert store untouched");
        return Ok(SyncOutcome {
            created: 0,
            rate_limited: false,
        });
    }

    let campaigns = CampaignRepo::list_context_for_user(&state.pool, user_id).await?;
    let since = (now - chrono::Duration::days(SNAPSHOT_WINDOW_DAYS)).date_naive();
    let series_rows = MetricSnapshotRepo::campaign_series_for_user(&state.pool, user_id, since).await?;
    let stored = AlertRepo::list_for_user(&state.pool, user_id, None).await?;
    let integration = IntegrationRepo::find(&state.pool, user_id).await?;

    // Group the series per campaign; rows arrive sorted ascending by
    // (scope_id, date), so each group stays ascending and "yesterday" is
    // the last element.
    let mut series: HashMap<String, Vec<DailyMetric>> = HashMap::new();
    for row in series_rows {
        series.entry(row.scope_id).or_default().push(DailyMetric {
            date: row.snapshot_date,
            spend_cents: row.spend_cents,
            leads: row.leads,
        });
    }

    // Unseal the access token just in time. A sealed token we cannot
    // open degrades to a stored-data run rather than failing it.
    let access_token = match &integration {
        Some(integration) if integration.is_connected() => {
            let blob = integration
                .sealed_access_token
                .as_deref()
                .unwrap_or_default();
            match unseal_token(&state.config.token_seal_key, blob) {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Failed to unseal access token, running without live data");
                    None
                }
            }
        }
        _ => None,
    };

    // Troubled-looking campaigns go first so a mid-run rate-limit cutoff
    // cannot starve them of live detail calls. The sort is stable, so
    // re-runs process campaigns in a deterministic order.
    let mut ordered: Vec<&CampaignContext> = campaigns.iter().collect();
    ordered.sort_by_key(|c| usize::from(!looks_troubled(&c.status, &c.effective_status)));

    let mut staging =
        AlertStaging::with_prior(stored.iter().map(|a| (a.key(), a.parsed_status())));
    let mut run = RunState::default();

    for campaign in ordered {
        let window = CampaignWindow::from_series(
            series
                .get(&campaign.external_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        );
        let scope = AlertScope {
            client_id: campaign.client_id,
            ad_account_id: Some(campaign.ad_account_id),
            campaign_id: Some(campaign.id),
        };

        // Working status starts from the registry and is overwritten by
        // a successful live fetch.
        let mut status = campaign.status.clone();
        let mut effective_status = campaign.effective_status.clone();
        let mut issues_text: Option<String> = None;

        if let Some(token) = access_token.as_deref() {
            if run.may_call(DETAIL_CALL_BUDGET) {
                run.detail_calls_used += 1;
                match state
                    .ads
                    .fetch_campaign_details(token, &campaign.external_id)
                    .await
                {
                    Ok(details) => {
                        if let Some(live) = details.status.clone() {
                            status = live;
                        }
                        if let Some(live) = details.effective_status.clone() {
                            effective_status = live;
                        }
                        issues_text = details.issues_text();

                        // Keep the registry warm. Losing this write only
                        // costs freshness, never the run.
                        if let Err(e) = CampaignRepo::update_live_status(
                            &state.pool,
                            campaign.id,
                            &status,
                            &effective_status,
                        )
                        .await
                        {
                            tracing::warn!(
                                campaign_id = campaign.id,
                                error = %e,
                                "Failed to persist refreshed campaign status"
                            );
                        }
                    }
                    Err(e) if e.is_rate_limit() => {
                        tracing::warn!(
                            campaign_id = campaign.id,
                            "Provider rate limit hit, stopping live calls for this run"
                        );
                        run.rate_limited = true;
                        staging.push(rules::rate_limit_alert(&campaign.name, scope));
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(
                            campaign_id = campaign.id,
                            error = %e,
                            "Live detail fetch failed, evaluating with stored status"
                        );
                    }
                }
            }
        }

        let signal = classify(&status, &effective_status, issues_text.as_deref());
        let budget = BudgetContext {
            daily_budget_cents: campaign.daily_budget_cents,
            threshold_cents: config.budget_low_threshold_cents,
        };
        staging.extend(rules::evaluate_campaign(
            &campaign.name,
            signal,
            window,
            budget,
            scope,
        ));
    }

    if let Some(integration) = &integration {
        if let Some(alert) = rules::stale_sync_alert(integration.last_sync_at, now) {
            staging.push(alert);
        }
    }

    let drafts = staging.into_drafts();
    let created = AlertRepo::replace_all(&state.pool, user_id, &drafts).await?;

    tracing::info!(
        user_id,
        created,
        detail_calls = run.detail_calls_used,
        rate_limited = run.rate_limited,
        "Alert sync complete"
    );

    Ok(SyncOutcome {
        created,
        rate_limited: run.rate_limited,
    })
}
