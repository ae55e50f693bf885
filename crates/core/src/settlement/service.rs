//! Settlement service.
//!
//! Runs validation, the balance calculator and the optimizer as one step,
//! applying a validation policy.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::balance::compute_balances;
use super::error::SettlementError;
use super::optimizer::compute_transfers;
use super::summary::SettlementSummary;
use super::types::{Balance, Expense, Member, Transfer};
use super::validation::{collect_issues, validate_conservation};

/// How to treat a snapshot that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementPolicy {
    /// Reject the snapshot with the first problem found.
    #[default]
    Strict,
    /// Log every problem and settle the raw numbers anyway.
    Lenient,
}

impl SettlementPolicy {
    /// Maps a `strict` flag to a policy.
    #[must_use]
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

/// Result of settling a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// One balance per member, in member order.
    pub balances: Vec<Balance>,
    /// Suggested transfers, largest exposures first.
    pub transfers: Vec<Transfer>,
    /// Statistics about the plan.
    pub summary: SettlementSummary,
}

impl Settlement {
    /// Returns true if nobody owes anything.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// Settlement service.
///
/// Stateless apart from its policy; safe to share across threads and call
/// concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementService {
    policy: SettlementPolicy,
}

impl SettlementService {
    /// Creates a service with the given policy.
    #[must_use]
    pub const fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// Computes balances and transfers for a snapshot.
    ///
    /// # Errors
    ///
    /// Under [`SettlementPolicy::Strict`], returns the first validation
    /// problem. Under [`SettlementPolicy::Lenient`], fails only when totals
    /// overflow `i64` ([`SettlementError::BalanceOverflow`]).
    pub fn settle(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> Result<Settlement, SettlementError> {
        let issues = collect_issues(members, expenses);

        if let Some(first) = issues.first() {
            match self.policy {
                SettlementPolicy::Strict => {
                    warn!(
                        code = first.error_code(),
                        issues = issues.len(),
                        "Rejecting settlement snapshot: {first}"
                    );
                    return Err(first.clone());
                }
                SettlementPolicy::Lenient => {
                    for issue in &issues {
                        warn!(code = issue.error_code(), "Settlement input issue: {issue}");
                    }
                    if let Some(fatal) = issues.iter().find(|issue| issue.is_fatal()) {
                        warn!(code = fatal.error_code(), "Rejecting settlement snapshot: {fatal}");
                        return Err(fatal.clone());
                    }
                }
            }
        }

        let balances = compute_balances(members, expenses);
        if let Err(err) = validate_conservation(&balances) {
            warn!(code = err.error_code(), "Settling unbalanced snapshot: {err}");
        }

        let transfers = compute_transfers(&balances);
        let summary = SettlementSummary::build(expenses, &balances, &transfers);

        debug!(
            members = members.len(),
            expenses = expenses.len(),
            transfers = summary.transfer_count,
            saved = summary.transfers_saved,
            "Settlement computed"
        );

        Ok(Settlement {
            balances,
            transfers,
            summary,
        })
    }
}
