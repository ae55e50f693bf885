//! Share splitting.
//!
//! Builds an expense's share map from a split rule so shares always add up
//! exactly to the amount:
//! - `Equal` among participants
//! - `Weighted` by integer weights (e.g. nights stayed)
//! - `Exact` amounts given by the caller

pub mod allocation;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tripsplit_shared::types::{ExpenseId, MemberId};

use crate::settlement::{Expense, ShareMap};

pub use allocation::AllocationUtil;

/// Errors raised while splitting an expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Amount to split is negative.
    #[error("Cannot split negative amount {0}")]
    NegativeAmount(i64),

    /// Rule names no participants.
    #[error("Split must have at least one participant")]
    NoParticipants,

    /// All weights are zero.
    #[error("Split weights must not all be zero")]
    ZeroTotalWeight,

    /// An exact share is negative.
    #[error("Share for {member_id} is negative: {share}")]
    NegativeShare {
        /// The member.
        member_id: MemberId,
        /// The offending share.
        share: i64,
    },

    /// Exact shares do not add up to the amount.
    #[error("Shares total {shares_total}, expected {amount}")]
    ExactMismatch {
        /// Amount being split.
        amount: i64,
        /// Exact sum of the given shares.
        shares_total: i128,
    },
}

impl SplitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::ZeroTotalWeight => "ZERO_TOTAL_WEIGHT",
            Self::NegativeShare { .. } => "NEGATIVE_SHARE",
            Self::ExactMismatch { .. } => "EXACT_SHARES_MISMATCH",
        }
    }
}

/// One participant's weight in a weighted split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weight {
    /// The member.
    pub member_id: MemberId,
    /// Relative weight; zero means the member owes nothing.
    pub weight: u64,
}

/// How an expense is divided among members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitRule {
    /// Everyone pays the same; leftover units go to the first participants.
    Equal {
        /// Participants in order. Repeats are ignored.
        participants: Vec<MemberId>,
    },
    /// Proportional to weights. Repeated members have their weights added.
    Weighted {
        /// Weights in order.
        weights: Vec<Weight>,
    },
    /// Shares given verbatim.
    Exact {
        /// The shares; must sum to the amount.
        shares: ShareMap,
    },
}

impl SplitRule {
    /// Splits `amount` into a share map.
    ///
    /// # Errors
    ///
    /// Returns a `SplitError` if the amount is negative, the rule is empty,
    /// the weights are all zero, or exact shares do not sum to `amount`.
    pub fn shares(&self, amount: i64) -> Result<ShareMap, SplitError> {
        if amount < 0 {
            return Err(SplitError::NegativeAmount(amount));
        }

        match self {
            Self::Equal { participants } => {
                let participants = dedup(participants.iter().copied());
                if participants.is_empty() {
                    return Err(SplitError::NoParticipants);
                }
                let amounts = AllocationUtil::allocate_equal(amount, participants.len());
                Ok(participants.into_iter().zip(amounts).collect())
            }
            Self::Weighted { weights } => {
                let merged = merge_weights(weights);
                if merged.is_empty() {
                    return Err(SplitError::NoParticipants);
                }
                if merged.iter().all(|(_, w)| *w == 0) {
                    return Err(SplitError::ZeroTotalWeight);
                }
                let raw: Vec<u64> = merged.iter().map(|(_, w)| *w).collect();
                let amounts = AllocationUtil::allocate_by_weights(amount, &raw);
                Ok(merged.into_iter().map(|(id, _)| id).zip(amounts).collect())
            }
            Self::Exact { shares } => {
                if shares.is_empty() {
                    return Err(SplitError::NoParticipants);
                }
                if let Some((&member_id, &share)) = shares.iter().find(|(_, s)| **s < 0) {
                    return Err(SplitError::NegativeShare { member_id, share });
                }
                let shares_total: i128 = shares.values().map(|s| i128::from(*s)).sum();
                if shares_total != i128::from(amount) {
                    return Err(SplitError::ExactMismatch {
                        amount,
                        shares_total,
                    });
                }
                Ok(shares.clone())
            }
        }
    }
}

/// Builds an expense whose shares come from `rule`.
///
/// # Errors
///
/// Propagates the rule's `SplitError`.
pub fn split_expense(
    id: ExpenseId,
    amount: i64,
    paid_by: MemberId,
    rule: &SplitRule,
) -> Result<Expense, SplitError> {
    Ok(Expense::new(id, amount, paid_by, rule.shares(amount)?))
}

fn dedup(ids: impl Iterator<Item = MemberId>) -> Vec<MemberId> {
    let mut out: Vec<MemberId> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn merge_weights(weights: &[Weight]) -> Vec<(MemberId, u64)> {
    let mut out: Vec<(MemberId, u64)> = Vec::new();
    for w in weights {
        match out.iter_mut().find(|(id, _)| *id == w.member_id) {
            Some((_, total)) => *total = total.saturating_add(w.weight),
            None => out.push((w.member_id, w.weight)),
        }
    }
    out
}
