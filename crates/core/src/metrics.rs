//! Derived KPI math and lead attribution.
//!
//! Pure helpers shared by the metrics aggregator and the snapshot sync
//! path. All spend values are integer cents.

use crate::types::Cents;

/// Action types that count as a lead, in precedence order.
///
/// Meta insights report results as a list of typed action counters. A
/// row's lead count is the value of the FIRST type in this list that
/// appears among its actions; later types are ignored once one matches.
/// Messaging-reply variants outrank form leads, which outrank generic
/// link clicks. The order is part of the KPI definition -- changing it
/// changes every reported lead number.
pub const LEAD_ACTION_PRECEDENCE: &[&str] = &[
    "onsite_conversion.messaging_conversation_started_7d",
    "onsite_conversion.messaging_first_reply",
    "onsite_conversion.total_messaging_connection",
    "lead",
    "leadgen_grouped",
    "offsite_conversion.fb_pixel_lead",
    "link_click",
];

/// Pick the lead count from a row's action list.
///
/// `actions` pairs an action type with its count. Returns 0 when no
/// known type is present.
pub fn leads_from_actions(actions: &[(String, i64)]) -> i64 {
    for wanted in LEAD_ACTION_PRECEDENCE {
        if let Some((_, value)) = actions.iter().find(|(ty, _)| ty == wanted) {
            return *value;
        }
    }
    0
}

/// Aggregate cost per lead: `round(spend / leads)`, 0 when there are no
/// leads.
pub fn cost_per_lead_cents(spend_cents: Cents, leads: i64) -> Cents {
    if leads <= 0 {
        return 0;
    }
    (spend_cents as f64 / leads as f64).round() as Cents
}

/// Snapshot-level cost per lead: like [`cost_per_lead_cents`] but absent
/// (not zero) when the snapshot recorded no leads.
pub fn snapshot_cost_per_lead(spend_cents: Cents, leads: i64) -> Option<Cents> {
    if leads <= 0 {
        None
    } else {
        Some(cost_per_lead_cents(spend_cents, leads))
    }
}

/// Response rate as a percentage of clicks that became leads, rounded to
/// one decimal. 0 when there are no clicks.
pub fn response_rate_pct(leads: i64, clicks: i64) -> f64 {
    if clicks <= 0 {
        return 0.0;
    }
    let raw = leads as f64 / clicks as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
