//! Settlement error types.
//!
//! The calculator and optimizer never fail; these errors come from the
//! validation layer that guards their input.

use thiserror::Error;
use tripsplit_shared::types::{ExpenseId, MemberId};

/// Problems found in a settlement snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    // ========== Snapshot Errors ==========
    /// Two members share an ID.
    #[error("Duplicate member: {0}")]
    DuplicateMember(MemberId),

    /// Two expenses share an ID.
    #[error("Duplicate expense: {0}")]
    DuplicateExpense(ExpenseId),

    // ========== Expense Errors ==========
    /// Expense amount is negative.
    #[error("Expense {expense_id} has negative amount {amount}")]
    NegativeAmount {
        /// The expense.
        expense_id: ExpenseId,
        /// The offending amount.
        amount: i64,
    },

    /// Payer is not a trip member.
    #[error("Expense {expense_id} is paid by unknown member {member_id}")]
    UnknownPayer {
        /// The expense.
        expense_id: ExpenseId,
        /// The unknown payer.
        member_id: MemberId,
    },

    /// A share is negative.
    #[error("Expense {expense_id} assigns negative share {share} to {member_id}")]
    NegativeShare {
        /// The expense.
        expense_id: ExpenseId,
        /// The member holding the share.
        member_id: MemberId,
        /// The offending share.
        share: i64,
    },

    /// A share is assigned to someone who is not a trip member.
    #[error("Expense {expense_id} assigns a share to unknown member {member_id}")]
    UnknownShareMember {
        /// The expense.
        expense_id: ExpenseId,
        /// The unknown member.
        member_id: MemberId,
    },

    /// Shares do not add up to the expense amount.
    #[error("Expense {expense_id} shares total {shares_total}, expected {amount}")]
    ShareSumMismatch {
        /// The expense.
        expense_id: ExpenseId,
        /// The expense amount.
        amount: i64,
        /// Sum of its shares.
        shares_total: i64,
    },

    /// Shares are too large to add up.
    #[error("Expense {0} shares overflow")]
    AmountOverflow(ExpenseId),

    // ========== Balance Errors ==========
    /// A member's totals or net balance do not fit in `i64`.
    #[error("Totals for member {0} overflow")]
    BalanceOverflow(MemberId),

    /// Net balances do not sum to zero.
    #[error("Balances do not sum to zero (residual {residual})")]
    Unbalanced {
        /// Sum of all net balances.
        residual: i128,
    },
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateMember(_) => "DUPLICATE_MEMBER",
            Self::DuplicateExpense(_) => "DUPLICATE_EXPENSE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::UnknownPayer { .. } => "UNKNOWN_PAYER",
            Self::NegativeShare { .. } => "NEGATIVE_SHARE",
            Self::UnknownShareMember { .. } => "UNKNOWN_SHARE_MEMBER",
            Self::ShareSumMismatch { .. } => "SHARE_SUM_MISMATCH",
            Self::AmountOverflow(_) => "AMOUNT_OVERFLOW",
            Self::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            Self::Unbalanced { .. } => "UNBALANCED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::BalanceOverflow(_) | Self::Unbalanced { .. } => 422,
            _ => 400,
        }
    }

    /// Returns true if no policy may settle a snapshot with this problem.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::BalanceOverflow(_))
    }

    /// Returns true if the error is a reference to a non-member.
    #[must_use]
    pub const fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownPayer { .. } | Self::UnknownShareMember { .. }
        )
    }
}
