//! Delivery-state classification from provider status text.
//!
//! Meta reports campaign health across three free-text fields (status,
//! effective status, issue info) with an uncontrolled vocabulary, so
//! classification is substring matching over the lowercased concatenation
//! of all three. The tables below are a deliberate heuristic; when the
//! provider grows new vocabulary, extend the tables here without touching
//! rule logic.
//!
//! Pure logic, no I/O.

/// Substrings that indicate a payment or billing problem.
///
/// Includes Portuguese variants (`pagamento`, `fatur...`) because agency
/// accounts frequently run with pt-BR locale settings.
pub const PAYMENT_ERROR_MARKERS: &[&str] = &[
    "payment",
    "billing",
    "pagamento",
    "fatur",
    "hold",
    "risk",
    "erro",
    "error",
    "issue_payment",
    "issue_billing",
];

/// Substring that indicates the provider flagged delivery issues.
pub const ISSUES_MARKER: &str = "with issues";

/// Substrings that indicate the campaign is not running.
pub const PAUSED_MARKERS: &[&str] = &["paused", "inactive", "stopped"];

/// Substrings that indicate the campaign is actively delivering.
pub const DELIVERING_MARKERS: &[&str] = &["active", "delivery", "delivering", "eligible", "running"];

/// Classified delivery state of a campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySignal {
    pub has_payment_error: bool,
    pub has_issues: bool,
    pub is_paused: bool,
    pub is_delivering: bool,
}

/// Classify a campaign's delivery state from its raw provider status text.
///
/// `status` and `effective_status` come from the campaign record (stored
/// or freshly fetched); `issues_info` is the provider's issue description
/// when present.
pub fn classify(status: &str, effective_status: &str, issues_info: Option<&str>) -> DeliverySignal {
    let text = format!(
        "{} {} {}",
        status,
        effective_status,
        issues_info.unwrap_or_default()
    )
    .to_lowercase();

    let has_payment_error = PAYMENT_ERROR_MARKERS.iter().any(|m| text.contains(m));
    let has_issues = text.contains(ISSUES_MARKER);

    let is_paused =
        PAUSED_MARKERS.iter().any(|m| text.contains(m)) || has_payment_error || has_issues;

    let is_delivering = !is_paused && DELIVERING_MARKERS.iter().any(|m| text.contains(m));

    DeliverySignal {
        has_payment_error,
        has_issues,
        is_paused,
        is_delivering,
    }
}

/// Whether persisted status text already suggests an unhealthy or
/// inactive campaign.
///
/// Used by the rule engine to order its per-campaign loop: campaigns that
/// look troubled are evaluated first so a mid-run rate-limit cutoff
/// cannot starve them of live detail calls.
pub fn looks_troubled(status: &str, effective_status: &str) -> bool {
    let signal = classify(status, effective_status, None);
    signal.has_payment_error || signal.has_issues || signal.is_paused || !signal.is_delivering
}
