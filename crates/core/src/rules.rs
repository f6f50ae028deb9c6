//! Alert rule evaluation.
//!
//! Pure logic -- no database or network access. The engine fetches
//! campaigns, snapshot series, and config, reduces each campaign's series
//! to a [`CampaignWindow`], and calls [`evaluate_campaign`]. Alerts for
//! run-level conditions (stale sync, provider rate limiting) have their
//! own constructors.

use chrono::NaiveDate;
use serde_json::json;

use crate::alert::{AlertDraft, AlertScope, AlertSeverity, AlertStatus, BudgetContext};
use crate::delivery::DeliverySignal;
use crate::types::{Cents, Timestamp};

/// Maximum live campaign-detail calls per rule-engine run.
pub const DETAIL_CALL_BUDGET: usize = 15;

/// Days of snapshot history fetched per run.
pub const SNAPSHOT_WINDOW_DAYS: i64 = 14;

/// Yesterday's spend must exceed this many times the 7-day average to
/// count as a spike.
pub const SPIKE_FACTOR: f64 = 2.0;

/// Spikes below this absolute spend are ignored.
pub const SPIKE_MIN_YESTERDAY_CENTS: Cents = 2000;

/// Yesterday's spend below this fraction of the 7-day average counts as
/// a drop.
pub const DROP_FACTOR: f64 = 0.3;

/// Drops are only reported for campaigns averaging above this spend.
pub const DROP_MIN_AVG_CENTS: f64 = 2000.0;

/// A sync older than this is reported as stale.
pub const STALE_SYNC_MAX_AGE_HOURS: i64 = 12;

/// One day of a campaign's metric series.
#[derive(Debug, Clone, Copy)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub spend_cents: Cents,
    pub leads: i64,
}

/// Trailing-window reduction of a campaign's snapshot series.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignWindow {
    pub spend_7d: Cents,
    pub leads_7d: i64,
    pub yesterday_spend: Cents,
    pub yesterday_leads: i64,
    /// Average daily spend over the trailing 7 days.
    pub avg_daily_spend: f64,
}

impl CampaignWindow {
    /// Reduce a snapshot series (ascending by date, "yesterday" last) to
    /// the numbers the rules need.
    ///
    /// The average divides by the number of days actually present in the
    /// trailing 7-day slice, so a campaign with two days of history is
    /// compared against its own short baseline rather than a zero-padded
    /// week.
    pub fn from_series(series: &[DailyMetric]) -> Self {
        let last7 = &series[series.len().saturating_sub(7)..];
        if last7.is_empty() {
            return Self::default();
        }

        let spend_7d: Cents = last7.iter().map(|d| d.spend_cents).sum();
        let leads_7d: i64 = last7.iter().map(|d| d.leads).sum();
        let yesterday = last7[last7.len() - 1];

        Self {
            spend_7d,
            leads_7d,
            yesterday_spend: yesterday.spend_cents,
            yesterday_leads: yesterday.leads,
            avg_daily_spend: spend_7d as f64 / last7.len() as f64,
        }
    }
}

/// Evaluate all per-campaign rules.
///
/// Rules are independent -- one campaign can stage several alerts in one
/// run -- except spend spike/drop, which are mutually exclusive by
/// construction (a drop is only considered when the spike did not fire).
pub fn evaluate_campaign(
    name: &str,
    signal: DeliverySignal,
    window: CampaignWindow,
    budget: BudgetContext,
    scope: AlertScope,
) -> Vec<AlertDraft> {
    let mut alerts = Vec::new();

    if signal.has_payment_error {
        alerts.push(AlertDraft {
            severity: AlertSeverity::High,
            status: AlertStatus::New,
            client_id: scope.client_id,
            ad_account_id: scope.ad_account_id,
            campaign_id: scope.campaign_id,
            title: "Payment issue detected".to_string(),
            message: format!("Campaign \"{name}\" is blocked by a payment or billing problem."),
            payload: json!({
                "hasIssues": signal.has_issues,
            }),
        });
    }

    let avg = window.avg_daily_spend;

    if signal.is_delivering
        && avg > 0.0
        && window.yesterday_spend as f64 > SPIKE_FACTOR * avg
        && window.yesterday_spend > SPIKE_MIN_YESTERDAY_CENTS
    {
        alerts.push(AlertDraft {
            severity: AlertSeverity::High,
            status: AlertStatus::New,
            client_id: scope.client_id,
            ad_account_id: scope.ad_account_id,
            campaign_id: scope.campaign_id,
            title: "Spend spike".to_string(),
            message: format!(
                "Campaign \"{name}\" spent more than twice its 7-day average yesterday."
            ),
            payload: json!({
                "yesterdaySpend": window.yesterday_spend,
                "avg7": avg,
            }),
        });
    } else if signal.is_delivering
        && avg > 0.0
        && (window.yesterday_spend as f64) < DROP_FACTOR * avg
        && avg > DROP_MIN_AVG_CENTS
    {
        alerts.push(AlertDraft {
            severity: AlertSeverity::Medium,
            status: AlertStatus::New,
            client_id: scope.client_id,
            ad_account_id: scope.ad_account_id,
            campaign_id: scope.campaign_id,
            title: "Spend drop".to_string(),
            message: format!("Campaign \"{name}\" spent well below its 7-day average yesterday."),
            payload: json!({
                "yesterdaySpend": window.yesterday_spend,
                "avg7": avg,
            }),
        });
    }

    if signal.is_delivering && window.yesterday_spend > 0 && window.yesterday_leads == 0 {
        alerts.push(AlertDraft {
            severity: AlertSeverity::Medium,
            status: AlertStatus::New,
            client_id: scope.client_id,
            ad_account_id: scope.ad_account_id,
            campaign_id: scope.campaign_id,
            title: "Zero results".to_string(),
            message: format!("Campaign \"{name}\" spent yesterday without generating any leads."),
            payload: json!({
                "yesterdaySpend": window.yesterday_spend,
            }),
        });
    }

    if budget.threshold_cents > 0 {
        if let Some(daily) = budget.daily_budget_cents {
            if daily > 0 && daily < budget.threshold_cents {
                alerts.push(AlertDraft {
                    severity: AlertSeverity::Low,
                    status: AlertStatus::New,
                    client_id: scope.client_id,
                    ad_account_id: scope.ad_account_id,
                    campaign_id: scope.campaign_id,
                    title: "Low daily budget".to_string(),
                    message: format!(
                        "Campaign \"{name}\" has a daily budget below the configured minimum."
                    ),
                    payload: json!({
                        "dailyBudget": daily,
                        "threshold": budget.threshold_cents,
                    }),
                });
            }
        }
    }

    alerts
}

/// Tenant-wide stale-sync alert.
///
/// Fires when the integration's last successful sync is older than
/// [`STALE_SYNC_MAX_AGE_HOURS`]. Carries no client/account/campaign
/// attribution.
pub fn stale_sync_alert(last_sync_at: Option<Timestamp>, now: Timestamp) -> Option<AlertDraft> {
    let last = last_sync_at?;
    if now.signed_duration_since(last) <= chrono::Duration::hours(STALE_SYNC_MAX_AGE_HOURS) {
        return None;
    }

    Some(AlertDraft {
        severity: AlertSeverity::Medium,
        status: AlertStatus::New,
        client_id: None,
        ad_account_id: None,
        campaign_id: None,
        title: "Data sync is stale".to_string(),
        message: format!(
            "Campaign metrics have not synced for more than {STALE_SYNC_MAX_AGE_HOURS} hours."
        ),
        payload: json!({
            "lastSyncAt": last.to_rfc3339(),
        }),
    })
}

/// Alert staged when a live detail fetch trips the provider's rate limit.
///
/// Scoped to the campaign whose fetch failed; the engine stops issuing
/// further live calls for the rest of the run.
pub fn rate_limit_alert(name: &str, scope: AlertScope) -> AlertDraft {
    AlertDraft {
        severity: AlertSeverity::Medium,
        status: AlertStatus::New,
        client_id: scope.client_id,
        ad_account_id: scope.ad_account_id,
        campaign_id: scope.campaign_id,
        title: "Rate limit hit".to_string(),
        message: format!(
            "The ads provider throttled live checks while refreshing campaign \"{name}\"; \
             remaining campaigns used stored data."
        ),
        payload: json!({}),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::delivery::classify;

    fn series(spends: &[(Cents, i64)]) -> Vec<DailyMetric> {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        spends
            .iter()
            .enumerate()
            .map(|(i, &(spend_cents, leads))| DailyMetric {
                date: start + chrono::Duration::days(i as i64),
                spend_cents,
                leads,
            })
            .collect()
    }

    fn delivering() -> DeliverySignal {
        classify("ACTIVE", "ACTIVE", None)
    }

    fn no_budget() -> BudgetContext {
        BudgetContext {
            daily_budget_cents: None,
            threshold_cents: 1000,
        }
    }

    #[test]
    fn payment_error_always_fires_high_regardless_of_spend() {
        let signal = classify("ACTIVE", "ACTIVE", Some("billing hold"));
        for spends in [vec![], vec![(0, 0); 7], vec![(9999, 50); 7]] {
            let window = CampaignWindow::from_series(&series(&spends));
            let alerts = evaluate_campaign("C", signal, window, no_budget(), AlertScope::default());
            let payment: Vec<_> = alerts
                .iter()
                .filter(|a| a.title == "Payment issue detected")
                .collect();
            assert_eq!(payment.len(), 1);
            assert_eq!(payment[0].severity, AlertSeverity::High);
        }
    }

    #[test]
    fn spike_fires_on_doubled_spend_above_floor() {
        // Six prior days totalling 10_000 + 5_000 yesterday = 15_000 over
        // 7 days, average ~2143. Yesterday (5_000) > 2 * 2143 and > 2000.
        let window = CampaignWindow::from_series(&series(&[
            (1000, 1),
            (1000, 1),
            (2000, 1),
            (2000, 1),
            (2000, 1),
            (2000, 1),
            (5000, 1),
        ]));
        let alerts = evaluate_campaign(
            "C",
            delivering(),
            window,
            no_budget(),
            AlertScope::default(),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Spend spike");
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[0].payload["yesterdaySpend"], 5000);
        let avg7 = alerts[0].payload["avg7"].as_f64().unwrap();
        assert!((avg7 - 15000.0 / 7.0).abs() < 0.01);
    }

    #[test]
    fn spike_below_absolute_floor_is_ignored() {
        // 900 > 2x the ~321 average but below the 2000-cent floor.
        let window = CampaignWindow::from_series(&series(&[
            (200, 0),
            (200, 0),
            (200, 0),
            (250, 0),
            (250, 0),
            (250, 0),
            (900, 0),
        ]));
        let alerts = evaluate_campaign(
            "C",
            delivering(),
            window,
            no_budget(),
            AlertScope::default(),
        );
        assert!(alerts.iter().all(|a| a.title != "Spend spike"));
    }

    #[test]
    fn spike_and_drop_are_mutually_exclusive() {
        // A spike never coexists with a drop: construct a window that
        // satisfies the spike and confirm no drop is staged alongside it.
        let window = CampaignWindow {
            spend_7d: 21_000,
            leads_7d: 10,
            yesterday_spend: 9_000,
            yesterday_leads: 5,
            avg_daily_spend: 3_000.0,
        };
        let alerts = evaluate_campaign(
            "C",
            delivering(),
            window,
            no_budget(),
            AlertScope::default(),
        );
        let spike = alerts.iter().any(|a| a.title == "Spend spike");
        let drop = alerts.iter().any(|a| a.title == "Spend drop");
        assert!(spike);
        assert!(!drop);
    }

    #[test]
    fn drop_fires_when_spend_collapses() {
        let window = CampaignWindow {
            spend_7d: 21_000,
            leads_7d: 10,
            yesterday_spend: 500,
            yesterday_leads: 1,
            avg_daily_spend: 3_000.0,
        };
        let alerts = evaluate_campaign(
            "C",
            delivering(),
            window,
            no_budget(),
            AlertScope::default(),
        );
        assert!(alerts.iter().any(|a| a.title == "Spend drop"));
        assert!(alerts.iter().all(|a| a.title != "Spend spike"));
    }

    #[test]
    fn drop_ignored_for_small_averages() {
        let window = CampaignWindow {
            spend_7d: 7_000,
            leads_7d: 3,
            yesterday_spend: 100,
            yesterday_leads: 0,
            avg_daily_spend: 1_000.0,
        };
        let alerts = evaluate_campaign(
            "C",
            delivering(),
            window,
            no_budget(),
            AlertScope::default(),
        );
        assert!(alerts.iter().all(|a| a.title != "Spend drop"));
    }

    #[test]
    fn zero_results_requires_spend_and_delivery() {
        let window = CampaignWindow {
            spend_7d: 3_500,
            leads_7d: 0,
            yesterday_spend: 500,
            yesterday_leads: 0,
            avg_daily_spend: 500.0,
        };

        let alerts = evaluate_campaign(
            "C",
            delivering(),
            window,
            no_budget(),
            AlertScope::default(),
        );
        assert!(alerts.iter().any(|a| a.title == "Zero results"));

        // Paused campaign: same numbers, no alert.
        let paused = classify("PAUSED", "PAUSED", None);
        let alerts = evaluate_campaign("C", paused, window, no_budget(), AlertScope::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn low_budget_fires_alone_for_paused_campaign() {
        // dailyBudget=500, threshold=1000, not delivering: only the
        // budget rule can fire.
        let paused = classify("PAUSED", "PAUSED", None);
        let window = CampaignWindow::from_series(&series(&[(1000, 0); 7]));
        let budget = BudgetContext {
            daily_budget_cents: Some(500),
            threshold_cents: 1000,
        };
        let alerts = evaluate_campaign("C", paused, window, budget, AlertScope::default());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Low daily budget");
        assert_eq!(alerts[0].severity, AlertSeverity::Low);
    }

    #[test]
    fn low_budget_disabled_when_threshold_zero() {
        let budget = BudgetContext {
            daily_budget_cents: Some(500),
            threshold_cents: 0,
        };
        let alerts = evaluate_campaign(
            "C",
            delivering(),
            CampaignWindow::default(),
            budget,
            AlertScope::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn stale_sync_fires_past_twelve_hours() {
        let now = Utc::now();

        let fresh = stale_sync_alert(Some(now - chrono::Duration::hours(11)), now);
        assert!(fresh.is_none());

        let stale = stale_sync_alert(Some(now - chrono::Duration::hours(13)), now).unwrap();
        assert_eq!(stale.severity, AlertSeverity::Medium);
        assert!(stale.campaign_id.is_none());
        assert!(stale.ad_account_id.is_none());
        assert!(stale.client_id.is_none());

        assert!(stale_sync_alert(None, now).is_none());
    }

    #[test]
    fn window_reduction_uses_trailing_seven_of_fourteen() {
        // 14 days, first 7 huge, last 7 flat: the huge days must not
        // leak into the average.
        let mut spends = vec![(100_000, 0); 7];
        spends.extend_from_slice(&[(1000, 1); 7]);
        let window = CampaignWindow::from_series(&series(&spends));

        assert_eq!(window.spend_7d, 7_000);
        assert_eq!(window.leads_7d, 7);
        assert_eq!(window.yesterday_spend, 1000);
        assert!((window.avg_daily_spend - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_series_reduces_to_zeroes() {
        let window = CampaignWindow::from_series(&[]);
        assert_eq!(window.yesterday_spend, 0);
        assert_eq!(window.avg_daily_spend, 0.0);
    }
}
