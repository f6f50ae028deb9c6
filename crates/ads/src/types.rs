//! Response shapes for the Graph API endpoints we consume.
//!
//! The Graph API serializes most numbers as strings; the accessors here
//! convert to the integer-cents representation used everywhere else.

use chrono::NaiveDate;
use serde::Deserialize;

/// One entry of a campaign's `issues_info` list.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueInfo {
    pub error_summary: Option<String>,
    pub error_message: Option<String>,
}

/// `GET /{campaign_id}?fields=status,effective_status,issues_info`.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignDetails {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub effective_status: Option<String>,
    #[serde(default)]
    pub issues_info: Vec<IssueInfo>,
}

impl CampaignDetails {
    /// Flatten the issue list into one text blob for classification.
    pub fn issues_text(&self) -> Option<String> {
        if self.issues_info.is_empty() {
            return None;
        }
        let parts: Vec<&str> = self
            .issues_info
            .iter()
            .flat_map(|i| [i.error_summary.as_deref(), i.error_message.as_deref()])
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A typed action counter on an insights row.
#[derive(Debug, Clone, Deserialize)]
pub struct Action {
    pub action_type: String,
    pub value: String,
}

/// One row of an insights response (`time_increment=1` makes each row a
/// day).
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsRow {
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub spend: Option<String>,
    #[serde(default)]
    pub impressions: Option<String>,
    #[serde(default)]
    pub clicks: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl InsightsRow {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date_start
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Spend in integer cents. The API reports a decimal string in the
    /// account currency's major unit.
    pub fn spend_cents(&self) -> i64 {
        self.spend
            .as_deref()
            .and_then(|s| s.parse::<f64>().ok())
            .map(|v| (v * 100.0).round() as i64)
            .unwrap_or(0)
    }

    pub fn impressions(&self) -> i64 {
        parse_count(self.impressions.as_deref())
    }

    pub fn clicks(&self) -> i64 {
        parse_count(self.clicks.as_deref())
    }

    /// Action counters as `(action_type, count)` pairs for lead
    /// attribution.
    pub fn action_pairs(&self) -> Vec<(String, i64)> {
        self.actions
            .iter()
            .map(|a| (a.action_type.clone(), parse_count(Some(&a.value))))
            .collect()
    }
}

/// `GET /{campaign_id}/adsets?fields=status,daily_budget,...`.
///
/// Budget fields are already minor-unit (cents) integer strings.
#[derive(Debug, Clone, Deserialize)]
pub struct AdSetRow {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub daily_budget: Option<String>,
    #[serde(default)]
    pub lifetime_budget: Option<String>,
    #[serde(default)]
    pub budget_remaining: Option<String>,
}

impl AdSetRow {
    pub fn daily_budget_cents(&self) -> Option<i64> {
        self.daily_budget.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn lifetime_budget_cents(&self) -> Option<i64> {
        self.lifetime_budget.as_deref().and_then(|s| s.parse().ok())
    }
}

fn parse_count(value: Option<&str>) -> i64 {
    value.and_then(|s| s.parse().ok()).unwrap_or(0)
}
