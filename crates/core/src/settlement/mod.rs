//! Expense settlement engine.
//!
//! Two pure steps turn a trip snapshot into a payment plan:
//! - `balance` - net balance per member from expenses and their shares
//! - `optimizer` - minimal debtor -> creditor transfers that zero all balances
//!
//! Around them:
//! - `validation` - snapshot checks (share totals, unknown members, ...)
//! - `service` - validation policy plus both steps in one call
//! - `summary` - statistics about a computed plan
//!
//! Everything here is free of I/O and shared state, so independent calls may
//! run concurrently.

pub mod balance;
pub mod error;
pub mod optimizer;
pub mod service;
pub mod summary;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod optimizer_props;

pub use balance::compute_balances;
pub use error::SettlementError;
pub use optimizer::{compute_transfers, transfer_bound};
pub use service::{Settlement, SettlementPolicy, SettlementService};
pub use summary::{SettlementSummary, naive_transfer_count};
pub use types::{Balance, Expense, Member, ShareMap, Transfer, TransferStatus};
pub use validation::{collect_issues, validate_conservation, validate_snapshot};
