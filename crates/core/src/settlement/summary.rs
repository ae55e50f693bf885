//! Settlement statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tripsplit_shared::types::MemberId;

use super::optimizer::transfer_bound;
use super::types::{Balance, Expense, Transfer};

/// Summary of a computed settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettlementSummary {
    /// Number of balance entries (members plus any unknown references).
    pub participant_count: usize,
    /// Members who are owed money.
    pub creditor_count: usize,
    /// Members who owe money.
    pub debtor_count: usize,
    /// Members already settled.
    pub settled_count: usize,
    /// Transfers in the plan.
    pub transfer_count: usize,
    /// Sum of all transfer amounts, saturating at `i64::MAX`.
    pub total_volume: i64,
    /// `creditors + debtors - 1`, or 0 if either side is empty.
    pub transfer_bound: usize,
    /// Transfers needed if every sharer paid every payer directly.
    pub naive_transfer_count: usize,
    /// `naive_transfer_count - transfer_count`, floored at 0.
    pub transfers_saved: usize,
}

impl SettlementSummary {
    /// Builds the summary for a computed settlement.
    #[must_use]
    pub fn build(expenses: &[Expense], balances: &[Balance], transfers: &[Transfer]) -> Self {
        let creditor_count = balances.iter().filter(|b| b.is_creditor()).count();
        let debtor_count = balances.iter().filter(|b| b.is_debtor()).count();
        let naive = naive_transfer_count(expenses);

        Self {
            participant_count: balances.len(),
            creditor_count,
            debtor_count,
            settled_count: balances.len() - creditor_count - debtor_count,
            transfer_count: transfers.len(),
            total_volume: transfers
                .iter()
                .fold(0_i64, |acc, t| acc.saturating_add(t.amount)),
            transfer_bound: transfer_bound(creditor_count, debtor_count),
            naive_transfer_count: naive,
            transfers_saved: naive.saturating_sub(transfers.len()),
        }
    }
}

/// Counts distinct `(sharer, payer)` pairs with a positive share.
///
/// This is the number of payments needed without any netting: everyone pays
/// each person who covered them, once per pair.
#[must_use]
pub fn naive_transfer_count(expenses: &[Expense]) -> usize {
    let pairs: BTreeSet<(MemberId, MemberId)> = expenses
        .iter()
        .flat_map(|expense| {
            expense
                .shares
                .iter()
                .filter(move |(member_id, share)| **share > 0 && **member_id != expense.paid_by)
                .map(move |(member_id, _)| (*member_id, expense.paid_by))
        })
        .collect();
    pairs.len()
}
