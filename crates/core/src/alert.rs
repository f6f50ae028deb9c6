//! Alert types shared by the rule engine and the persistence layer.

use serde::{Deserialize, Serialize};

use crate::types::{Cents, DbId};

/// Severity of a generated alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    /// Canonical database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(AlertSeverity::Low),
            "MEDIUM" => Some(AlertSeverity::Medium),
            "HIGH" => Some(AlertSeverity::High),
            _ => None,
        }
    }
}

/// User-facing lifecycle status of an alert.
///
/// The rule engine regenerates the full alert set on every run, so this
/// status is carried forward by identity key rather than stored state
/// surviving in place (see [`crate::staging`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    New,
    Read,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::New => "NEW",
            AlertStatus::Read => "READ",
            AlertStatus::Resolved => "RESOLVED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(AlertStatus::New),
            "READ" => Some(AlertStatus::Read),
            "RESOLVED" => Some(AlertStatus::Resolved),
            _ => None,
        }
    }
}

/// An alert produced by one rule-engine run, not yet persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AlertDraft {
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    /// Primary client of the ad account the alert is attributed to, if any.
    pub client_id: Option<DbId>,
    pub ad_account_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    pub title: String,
    pub message: String,
    /// Structured details (triggering numbers, provider ids).
    pub payload: serde_json::Value,
}

impl AlertDraft {
    /// Identity key used for intra-run dedup and prior-status lookup.
    pub fn key(&self) -> AlertKey {
        AlertKey {
            campaign_id: self.campaign_id,
            ad_account_id: self.ad_account_id,
            title: self.title.clone(),
            message: self.message.clone(),
        }
    }
}

/// Composite identity of a logical alert.
///
/// Two alerts with the same key are the same alert across runs: the
/// second occurrence within a run is discarded, and a stored alert from
/// the previous run donates its status to the regenerated one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub campaign_id: Option<DbId>,
    pub ad_account_id: Option<DbId>,
    pub title: String,
    pub message: String,
}

/// Scope an alert attaches to when a rule fires for a single campaign.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertScope {
    pub client_id: Option<DbId>,
    pub ad_account_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
}

/// Inputs the budget rule needs beyond the snapshot series.
#[derive(Debug, Clone, Copy)]
pub struct BudgetContext {
    pub daily_budget_cents: Option<Cents>,
    pub threshold_cents: Cents,
}
