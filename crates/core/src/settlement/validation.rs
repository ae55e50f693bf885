//! Snapshot validation for settlement input.
//!
//! The calculator accepts anything; this module decides whether a snapshot is
//! trustworthy. Checks run members first, then expense IDs, then each expense
//! in input order: amount, payer, each share (sign, membership), share total.
//! Last, every balance entry's totals must fit in `i64`.

use std::collections::HashSet;
use tripsplit_shared::types::MemberId;

use super::balance::accumulate;
use super::error::SettlementError;
use super::types::{Balance, Expense, Member};

/// Validates a `(members, expenses)` snapshot.
///
/// # Errors
///
/// Returns the first problem found, in the order described in the module docs.
pub fn validate_snapshot(members: &[Member], expenses: &[Expense]) -> Result<(), SettlementError> {
    match collect_issues(members, expenses).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Returns every problem in a snapshot, in check order.
#[must_use]
pub fn collect_issues(members: &[Member], expenses: &[Expense]) -> Vec<SettlementError> {
    let mut issues = Vec::new();

    let mut known: HashSet<MemberId> = HashSet::with_capacity(members.len());
    for member in members {
        if !known.insert(member.id) {
            issues.push(SettlementError::DuplicateMember(member.id));
        }
    }

    let mut seen_expenses = HashSet::with_capacity(expenses.len());
    for expense in expenses {
        if !seen_expenses.insert(expense.id) {
            issues.push(SettlementError::DuplicateExpense(expense.id));
        }
    }

    for expense in expenses {
        check_expense(expense, &known, &mut issues);
    }

    issues.extend(
        accumulate(members, expenses)
            .iter()
            .filter(|totals| !totals.fits())
            .map(|totals| SettlementError::BalanceOverflow(totals.member_id)),
    );

    issues
}

fn check_expense(expense: &Expense, known: &HashSet<MemberId>, issues: &mut Vec<SettlementError>) {
    if expense.amount < 0 {
        issues.push(SettlementError::NegativeAmount {
            expense_id: expense.id,
            amount: expense.amount,
        });
    }

    if !known.contains(&expense.paid_by) {
        issues.push(SettlementError::UnknownPayer {
            expense_id: expense.id,
            member_id: expense.paid_by,
        });
    }

    for (&member_id, &share) in &expense.shares {
        if share < 0 {
            issues.push(SettlementError::NegativeShare {
                expense_id: expense.id,
                member_id,
                share,
            });
        }
        if !known.contains(&member_id) {
            issues.push(SettlementError::UnknownShareMember {
                expense_id: expense.id,
                member_id,
            });
        }
    }

    match expense.shares_total() {
        None => issues.push(SettlementError::AmountOverflow(expense.id)),
        Some(total) if total != expense.amount => issues.push(SettlementError::ShareSumMismatch {
            expense_id: expense.id,
            amount: expense.amount,
            shares_total: total,
        }),
        Some(_) => {}
    }
}

/// Checks that net balances sum to exactly zero.
///
/// # Errors
///
/// Returns `SettlementError::Unbalanced` with the residual otherwise.
pub fn validate_conservation(balances: &[Balance]) -> Result<(), SettlementError> {
    let residual: i128 = balances.iter().map(|b| i128::from(b.net)).sum();
    if residual == 0 {
        Ok(())
    } else {
        Err(SettlementError::Unbalanced { residual })
    }
}
