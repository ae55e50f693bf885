//! Property-based tests for the settlement optimizer.
//!
//! Feature: settlement, Property 2: Transfer Conservation
//! Feature: settlement, Property 4: Minimality Bound

use proptest::prelude::*;
use std::collections::HashMap;
use tripsplit_shared::types::MemberId;
use uuid::Uuid;

use super::optimizer::{compute_transfers, transfer_bound};
use super::types::{Balance, TransferStatus};

/// Builds balances from nets, appending one member that absorbs the residual
/// so the set sums to zero.
fn zero_sum_balances(nets: &[i64]) -> Vec<Balance> {
    let residual: i64 = nets.iter().sum();
    nets.iter()
        .copied()
        .chain(std::iter::once(-residual))
        .enumerate()
        .map(|(i, net)| {
            let id = MemberId::from_uuid(Uuid::from_u128(i as u128 + 1));
            if net >= 0 {
                Balance::new(id, net, 0)
            } else {
                Balance::new(id, 0, -net)
            }
        })
        .collect()
}

fn nets_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(
        prop_oneof![Just(0i64), -1_000_000i64..1_000_000],
        0..12,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Property 2.1: Transfers reproduce every net balance**
    ///
    /// *For any* zero-sum balances, the amount each debtor pays SHALL equal
    /// its |net| and the amount each creditor receives SHALL equal its net.
    #[test]
    fn prop_transfers_conserve_balances(nets in nets_strategy()) {
        let balances = zero_sum_balances(&nets);

        let transfers = compute_transfers(&balances);

        let mut flow: HashMap<MemberId, i64> = HashMap::new();
        for transfer in &transfers {
            *flow.entry(transfer.from).or_default() -= transfer.amount;
            *flow.entry(transfer.to).or_default() += transfer.amount;
        }
        for balance in &balances {
            prop_assert_eq!(
                flow.get(&balance.member_id).copied().unwrap_or(0),
                balance.net,
                "member {} not settled", balance.member_id
            );
        }
    }

    /// **Property 2.2: Transfers are positive, pending and flow debtor -> creditor**
    #[test]
    fn prop_transfers_well_formed(nets in nets_strategy()) {
        let balances = zero_sum_balances(&nets);
        let net_of: HashMap<MemberId, i64> =
            balances.iter().map(|b| (b.member_id, b.net)).collect();

        for transfer in compute_transfers(&balances) {
            prop_assert!(transfer.amount > 0);
            prop_assert_eq!(transfer.status, TransferStatus::Pending);
            prop_assert_ne!(transfer.from, transfer.to);
            prop_assert!(net_of[&transfer.from] < 0);
            prop_assert!(net_of[&transfer.to] > 0);
        }
    }

    /// **Property 4.1: Transfer count never exceeds creditors + debtors - 1**
    #[test]
    fn prop_transfer_count_bounded(nets in nets_strategy()) {
        let balances = zero_sum_balances(&nets);
        let creditors = balances.iter().filter(|b| b.net > 0).count();
        let debtors = balances.iter().filter(|b| b.net < 0).count();

        let transfers = compute_transfers(&balances);

        prop_assert!(transfers.len() <= transfer_bound(creditors, debtors));
        if creditors == 0 || debtors == 0 {
            prop_assert!(transfers.is_empty());
        }
    }

    /// **Property 3.2: Optimizer is deterministic**
    #[test]
    fn prop_transfers_deterministic(nets in nets_strategy()) {
        let balances = zero_sum_balances(&nets);
        prop_assert_eq!(compute_transfers(&balances), compute_transfers(&balances));
    }

    /// **Property 5.1: Settled balances produce no transfers**
    #[test]
    fn prop_all_zero_is_noop(count in 0usize..12) {
        let balances = zero_sum_balances(&vec![0; count]);
        prop_assert!(compute_transfers(&balances).is_empty());
    }
}
