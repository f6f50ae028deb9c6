//! Alert staging: intra-run dedup and cross-run status carry-forward.
//!
//! Each rule-engine run produces a full replacement alert set. Within the
//! run, the first draft staged for a given [`AlertKey`] wins and later
//! duplicates are discarded. Across runs, a stored alert whose key
//! matches a regenerated draft donates its user-facing status, so marking
//! an alert READ survives a re-run with unchanged data.

use std::collections::{HashMap, HashSet};

use crate::alert::{AlertDraft, AlertKey, AlertStatus};

/// Accumulates the alert set for one rule-engine run.
#[derive(Debug, Default)]
pub struct AlertStaging {
    staged: Vec<AlertDraft>,
    seen: HashSet<AlertKey>,
    prior_status: HashMap<AlertKey, AlertStatus>,
}

impl AlertStaging {
    /// Start staging, seeding prior statuses from the currently stored
    /// alert set.
    pub fn with_prior<I>(prior: I) -> Self
    where
        I: IntoIterator<Item = (AlertKey, AlertStatus)>,
    {
        Self {
            staged: Vec::new(),
            seen: HashSet::new(),
            prior_status: prior.into_iter().collect(),
        }
    }

    /// Stage a draft. Duplicate keys within the run are silently dropped;
    /// a matching prior alert's status overrides the draft's default.
    pub fn push(&mut self, mut draft: AlertDraft) {
        let key = draft.key();
        if !self.seen.insert(key.clone()) {
            return;
        }
        if let Some(status) = self.prior_status.get(&key) {
            draft.status = *status;
        }
        self.staged.push(draft);
    }

    pub fn extend<I: IntoIterator<Item = AlertDraft>>(&mut self, drafts: I) {
        for draft in drafts {
            self.push(draft);
        }
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Finish the run and take the staged set.
    pub fn into_drafts(self) -> Vec<AlertDraft> {
        self.staged
    }
}

/// Mutable state threaded through the engine's per-campaign loop.
///
/// Replaces any notion of a global flag: the loop owns exactly one of
/// these and passes it by reference.
#[derive(Debug, Default)]
pub struct RunState {
    /// Live detail calls issued so far this run.
    pub detail_calls_used: usize,
    /// Set once the provider signals rate limiting; no further live
    /// calls are issued for the remainder of the run.
    pub rate_limited: bool,
}

impl RunState {
    /// Whether the engine may issue another live detail call.
    pub fn may_call(&self, budget: usize) -> bool {
        !self.rate_limited && self.detail_calls_used < budget
    }
}
