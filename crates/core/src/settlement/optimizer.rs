//! Settlement optimizer.
//!
//! Turns net balances into a short list of debtor -> creditor transfers using
//! greedy largest-first matching (the classic min-cash-flow heuristic).
//!
//! Creditors are ordered by amount owed to them, debtors by amount they owe,
//! both largest first. Two cursors walk the lists; each step moves
//! `min(creditor.remaining, debtor.remaining)` and retires whichever side
//! reaches zero. Every step retires at least one member, which bounds the
//! plan at `creditors + debtors - 1` transfers.

use tripsplit_shared::types::{MemberId, TransferId};

use super::types::{Balance, Transfer};

/// Working copy of a member's outstanding amount.
#[derive(Debug, Clone, Copy)]
struct Position {
    member_id: MemberId,
    remaining: i64,
}

/// Computes the transfers that settle every balance.
///
/// Members with a zero net balance never appear. If there are no creditors or
/// no debtors the result is empty. Sorting is stable, so members with equal
/// balances keep their input order and identical input always yields an
/// identical plan.
///
/// `balances` is only read; remainders are tracked on local copies.
#[must_use]
pub fn compute_transfers(balances: &[Balance]) -> Vec<Transfer> {
    let (mut creditors, mut debtors) = partition(balances);
    let mut transfers = Vec::with_capacity(transfer_bound(creditors.len(), debtors.len()));

    let mut ci = 0;
    let mut di = 0;
    while ci < creditors.len() && di < debtors.len() {
        let creditor = &mut creditors[ci];
        let debtor = &mut debtors[di];

        let amount = creditor.remaining.min(debtor.remaining);
        if amount > 0 {
            let id = TransferId::derive(debtor.member_id, creditor.member_id, transfers.len());
            transfers.push(Transfer::pending(
                id,
                debtor.member_id,
                creditor.member_id,
                amount,
            ));
        }

        creditor.remaining -= amount;
        debtor.remaining -= amount;

        if creditor.remaining == 0 {
            ci += 1;
        }
        if debtor.remaining == 0 {
            di += 1;
        }
    }

    transfers
}

/// Upper bound on the number of transfers for the given side sizes.
#[must_use]
pub const fn transfer_bound(creditors: usize, debtors: usize) -> usize {
    if creditors == 0 || debtors == 0 {
        0
    } else {
        creditors + debtors - 1
    }
}

/// Splits balances into creditors and debtors, each sorted largest first.
fn partition(balances: &[Balance]) -> (Vec<Position>, Vec<Position>) {
    let mut creditors: Vec<Position> = balances
        .iter()
        .filter(|b| b.is_creditor())
        .map(|b| Position {
            member_id: b.member_id,
            remaining: b.net,
        })
        .collect();
    let mut debtors: Vec<Position> = balances
        .iter()
        .filter(|b| b.is_debtor())
        .map(|b| Position {
            member_id: b.member_id,
            remaining: b.net.saturating_neg(),
        })
        .collect();

    // `sort_by` is stable: ties keep input order.
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    (creditors, debtors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::types::TransferStatus;
    use uuid::Uuid;

    fn id(n: u128) -> MemberId {
        MemberId::from_uuid(Uuid::from_u128(n))
    }

    fn balance(n: u128, net: i64) -> Balance {
        if net >= 0 {
            Balance::new(id(n), net, 0)
        } else {
            Balance::new(id(n), 0, -net)
        }
    }

    fn legs(transfers: &[Transfer]) -> Vec<(MemberId, MemberId, i64)> {
        transfers.iter().map(|t| (t.from, t.to, t.amount)).collect()
    }

    #[test]
    fn test_single_pair_equal_magnitude() {
        let balances = vec![balance(1, 150), balance(2, 0), balance(3, -150)];

        let transfers = compute_transfers(&balances);

        assert_eq!(legs(&transfers), vec![(id(3), id(1), 150)]);
        assert_eq!(transfers[0].status, TransferStatus::Pending);
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        let balances = vec![balance(1, 200), balance(2, -120), balance(3, -80)];

        let transfers = compute_transfers(&balances);

        assert_eq!(
            legs(&transfers),
            vec![(id(2), id(1), 120), (id(3), id(1), 80)]
        );
        assert_eq!(transfers.len(), transfer_bound(1, 2));
    }

    #[test]
    fn test_largest_exposures_settle_first() {
        let balances = vec![
            balance(1, 50),
            balance(2, 100),
            balance(3, -30),
            balance(4, -120),
        ];

        let transfers = compute_transfers(&balances);

        assert_eq!(
            legs(&transfers),
            vec![(id(4), id(2), 100), (id(4), id(1), 20), (id(3), id(1), 30)]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let balances = vec![
            balance(7, -40),
            balance(5, 40),
            balance(6, -40),
            balance(4, 40),
        ];

        let transfers = compute_transfers(&balances);

        assert_eq!(
            legs(&transfers),
            vec![(id(7), id(5), 40), (id(6), id(4), 40)]
        );
    }

    #[test]
    fn test_all_settled_gives_no_transfers() {
        let balances = vec![balance(1, 0), balance(2, 0)];
        assert!(compute_transfers(&balances).is_empty());
        assert!(compute_transfers(&[]).is_empty());
    }

    #[test]
    fn test_one_sided_balances_give_no_transfers() {
        assert!(compute_transfers(&[balance(1, 10), balance(2, 5)]).is_empty());
        assert!(compute_transfers(&[balance(1, -10)]).is_empty());
    }

    #[test]
    fn test_unbalanced_input_leaves_remainder_unmatched() {
        // Creditors hold 100, debtors only 70.
        let balances = vec![balance(1, 100), balance(2, -70)];

        let transfers = compute_transfers(&balances);

        assert_eq!(legs(&transfers), vec![(id(2), id(1), 70)]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let balances = vec![balance(1, 200), balance(2, -120), balance(3, -80)];
        let before = balances.clone();

        let _ = compute_transfers(&balances);

        assert_eq!(balances, before);
    }

    #[test]
    fn test_transfer_ids_are_stable() {
        let balances = vec![balance(1, 200), balance(2, -120), balance(3, -80)];
        assert_eq!(compute_transfers(&balances), compute_transfers(&balances));
    }

    #[test]
    fn test_transfer_bound() {
        assert_eq!(transfer_bound(0, 5), 0);
        assert_eq!(transfer_bound(3, 0), 0);
        assert_eq!(transfer_bound(1, 1), 1);
        assert_eq!(transfer_bound(3, 4), 6);
    }
}
