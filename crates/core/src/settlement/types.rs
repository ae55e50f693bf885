//! Settlement domain types.
//!
//! All amounts are `i64` counts of the smallest currency unit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tripsplit_shared::types::{ExpenseId, MemberId, TransferId};

/// Amount each member owes for one expense, keyed by member.
///
/// A member absent from the map owes nothing for that expense.
pub type ShareMap = BTreeMap<MemberId, i64>;

/// A participant in a shared trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member ID.
    pub id: MemberId,
    /// Display name.
    pub name: String,
}

impl Member {
    /// Creates a new member.
    #[must_use]
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A shared expense paid by one member and split among several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Free-form description (e.g. "Dinner in Hoi An").
    #[serde(default)]
    pub description: String,
    /// Total amount in minor units.
    pub amount: i64,
    /// Member who paid.
    pub paid_by: MemberId,
    /// How much each member owes for this expense.
    #[serde(default)]
    pub shares: ShareMap,
}

impl Expense {
    /// Creates a new expense.
    #[must_use]
    pub fn new(id: ExpenseId, amount: i64, paid_by: MemberId, shares: ShareMap) -> Self {
        Self {
            id,
            description: String::new(),
            amount,
            paid_by,
            shares,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns what `member` owes for this expense (0 if absent).
    #[must_use]
    pub fn share_of(&self, member: MemberId) -> i64 {
        self.shares.get(&member).copied().unwrap_or(0)
    }

    /// Returns the sum of all shares, or `None` on overflow.
    #[must_use]
    pub fn shares_total(&self) -> Option<i64> {
        self.shares
            .values()
            .try_fold(0_i64, |acc, share| acc.checked_add(*share))
    }
}

/// Net position of one member across all expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The member ID.
    pub member_id: MemberId,
    /// Sum of expense amounts this member paid.
    pub total_paid: i64,
    /// Sum of this member's shares across all expenses.
    pub total_owed: i64,
    /// `total_paid - total_owed`. Positive means the member is owed money.
    pub net: i64,
}

impl Balance {
    /// Creates a balance and derives `net`, saturating at the `i64` bounds.
    #[must_use]
    pub const fn new(member_id: MemberId, total_paid: i64, total_owed: i64) -> Self {
        Self {
            member_id,
            total_paid,
            total_owed,
            net: total_paid.saturating_sub(total_owed),
        }
    }

    /// Creates an empty balance.
    #[must_use]
    pub const fn zero(member_id: MemberId) -> Self {
        Self::new(member_id, 0, 0)
    }

    /// Returns true if the member is owed money.
    #[must_use]
    pub const fn is_creditor(&self) -> bool {
        self.net > 0
    }

    /// Returns true if the member owes money.
    #[must_use]
    pub const fn is_debtor(&self) -> bool {
        self.net < 0
    }

    /// Returns true if the member is fully settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.net == 0
    }
}

/// Lifecycle of a suggested transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Suggested, not yet confirmed as paid.
    Pending,
    /// Confirmed as paid by the caller.
    Completed,
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// One suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Transfer ID, stable for identical input.
    pub id: TransferId,
    /// Debtor paying.
    pub from: MemberId,
    /// Creditor receiving.
    pub to: MemberId,
    /// Amount in minor units, always positive.
    pub amount: i64,
    /// Current status.
    pub status: TransferStatus,
}

impl Transfer {
    /// Creates a pending transfer.
    #[must_use]
    pub const fn pending(id: TransferId, from: MemberId, to: MemberId, amount: i64) -> Self {
        Self {
            id,
            from,
            to,
            amount,
            status: TransferStatus::Pending,
        }
    }

    /// Returns a copy marked as completed.
    ///
    /// Recording payments is up to the caller; the optimizer never emits
    /// completed transfers.
    #[must_use]
    pub const fn mark_completed(self) -> Self {
        Self {
            status: TransferStatus::Completed,
            ..self
        }
    }

    /// Returns true if the transfer has not been confirmed yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, TransferStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_of_absent_member_is_zero() {
        let a = MemberId::new();
        let b = MemberId::new();
        let expense = Expense::new(ExpenseId::new(), 100, a, ShareMap::from([(a, 100)]));

        assert_eq!(expense.share_of(a), 100);
        assert_eq!(expense.share_of(b), 0);
    }

    #[test]
    fn test_shares_total_overflow() {
        let a = MemberId::new();
        let b = MemberId::new();
        let expense = Expense::new(
            ExpenseId::new(),
            0,
            a,
            ShareMap::from([(a, i64::MAX), (b, 1)]),
        );
        assert_eq!(expense.shares_total(), None);
    }

    #[test]
    fn test_balance_sign_helpers() {
        let id = MemberId::new();
        assert!(Balance::new(id, 300, 150).is_creditor());
        assert!(Balance::new(id, 0, 150).is_debtor());
        assert!(Balance::new(id, 150, 150).is_settled());
        assert_eq!(Balance::new(id, 0, 150).net, -150);
    }

    #[test]
    fn test_mark_completed() {
        let transfer = Transfer::pending(TransferId::new(), MemberId::new(), MemberId::new(), 50);
        assert!(transfer.is_pending());

        let done = transfer.mark_completed();
        assert_eq!(done.status, TransferStatus::Completed);
        assert_eq!(done.amount, 50);
        assert!(!done.is_pending());
    }

    #[test]
    fn test_transfer_status_serde() {
        assert_eq!(
            serde_json::to_string(&TransferStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(TransferStatus::Completed.to_string(), "completed");
    }
}
