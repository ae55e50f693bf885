//! Balance calculator.
//!
//! Reduces a trip's expenses into one net balance per member.

use std::collections::HashMap;
use tripsplit_shared::types::MemberId;

use super::types::{Balance, Expense, Member};

/// Computes each member's total paid, total owed and net balance.
///
/// The result holds one entry per member, in the order of `members`.
/// Payers or share keys that are not in `members` are still counted: each
/// unknown ID gets its own trailing entry, in order of first appearance, so
/// no amount silently disappears. Referential integrity is checked by
/// [`super::validation`], not here.
///
/// Totals are accumulated in `i128` and saturate at the `i64` bounds, so this
/// never panics. Net balances saturate at `±i64::MAX` so every debt can be
/// negated. Validation reports snapshots that hit a bound as
/// [`super::SettlementError::BalanceOverflow`].
#[must_use]
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Vec<Balance> {
    accumulate(members, expenses)
        .into_iter()
        .map(|totals| Balance {
            member_id: totals.member_id,
            total_paid: saturate(totals.paid),
            total_owed: saturate(totals.owed),
            net: saturate(totals.net().max(-i128::from(i64::MAX))),
        })
        .collect()
}

/// Exact running totals for one balance entry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawTotals {
    pub(crate) member_id: MemberId,
    pub(crate) paid: i128,
    pub(crate) owed: i128,
}

impl RawTotals {
    pub(crate) const fn net(&self) -> i128 {
        self.paid - self.owed
    }

    /// Returns true if paid, owed and net all fit in `i64` with a negatable net.
    pub(crate) fn fits(&self) -> bool {
        let range = -i128::from(i64::MAX)..=i128::from(i64::MAX);
        i64::try_from(self.paid).is_ok()
            && i64::try_from(self.owed).is_ok()
            && range.contains(&self.net())
    }
}

/// Sums every expense into per-entry totals without rounding or overflow.
pub(crate) fn accumulate(members: &[Member], expenses: &[Expense]) -> Vec<RawTotals> {
    let mut totals: Vec<RawTotals> = Vec::with_capacity(members.len());
    let mut slots: HashMap<MemberId, usize> = HashMap::with_capacity(members.len());

    for member in members {
        slot_for(&mut totals, &mut slots, member.id);
    }

    for expense in expenses {
        let payer = slot_for(&mut totals, &mut slots, expense.paid_by);
        totals[payer].paid += i128::from(expense.amount);

        for (&member_id, &share) in &expense.shares {
            let slot = slot_for(&mut totals, &mut slots, member_id);
            totals[slot].owed += i128::from(share);
        }
    }

    totals
}

/// Returns the index of `member_id`'s totals, appending an empty entry if needed.
fn slot_for(
    totals: &mut Vec<RawTotals>,
    slots: &mut HashMap<MemberId, usize>,
    member_id: MemberId,
) -> usize {
    *slots.entry(member_id).or_insert_with(|| {
        totals.push(RawTotals {
            member_id,
            paid: 0,
            owed: 0,
        });
        totals.len() - 1
    })
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
