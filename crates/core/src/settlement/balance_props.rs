//! Property-based tests for the balance calculator.
//!
//! Feature: settlement, Property 1: Balance Conservation
//! Feature: settlement, Property 3: Determinism

use proptest::prelude::*;
use tripsplit_shared::types::{ExpenseId, MemberId};
use uuid::Uuid;

use super::balance::compute_balances;
use super::types::{Expense, Member};
use crate::split::{SplitRule, split_expense};

/// Raw expense: payer index, amount, participant mask.
type RawExpense = (usize, i64, u16);

fn make_members(count: usize) -> Vec<Member> {
    (0..count)
        .map(|i| {
            Member::new(
                MemberId::from_uuid(Uuid::from_u128(i as u128 + 1)),
                format!("Member {i}"),
            )
        })
        .collect()
}

/// Turns raw tuples into expenses whose shares sum exactly to the amount.
fn make_expenses(members: &[Member], raw: &[RawExpense]) -> Vec<Expense> {
    raw.iter()
        .enumerate()
        .map(|(n, (payer, amount, mask))| {
            let mut participants: Vec<MemberId> = members
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, m)| m.id)
                .collect();
            if participants.is_empty() {
                participants.push(members[payer % members.len()].id);
            }
            split_expense(
                ExpenseId::from_uuid(Uuid::from_u128(1_000 + n as u128)),
                *amount,
                members[payer % members.len()].id,
                &SplitRule::Equal { participants },
            )
            .unwrap()
        })
        .collect()
}

/// Strategy for a trip: member count plus raw expenses.
fn trip_strategy() -> impl Strategy<Value = (usize, Vec<RawExpense>)> {
    (2usize..8).prop_flat_map(|count| {
        (
            Just(count),
            prop::collection::vec((0usize..count, 0i64..10_000_000, any::<u16>()), 0..20),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1.1: Net balances sum to zero**
    ///
    /// *For any* expenses whose shares sum exactly to their amounts, the
    /// net balances of all members SHALL sum to zero.
    #[test]
    fn prop_balances_sum_to_zero((count, raw) in trip_strategy()) {
        let members = make_members(count);
        let expenses = make_expenses(&members, &raw);

        let balances = compute_balances(&members, &expenses);

        prop_assert_eq!(balances.iter().map(|b| b.net).sum::<i64>(), 0);
    }

    /// **Property 1.2: Totals match the expense list**
    ///
    /// *For any* trip, total paid SHALL equal the sum of expense amounts,
    /// and so SHALL total owed.
    #[test]
    fn prop_totals_match_expenses((count, raw) in trip_strategy()) {
        let members = make_members(count);
        let expenses = make_expenses(&members, &raw);
        let expected: i64 = expenses.iter().map(|e| e.amount).sum();

        let balances = compute_balances(&members, &expenses);

        prop_assert_eq!(balances.iter().map(|b| b.total_paid).sum::<i64>(), expected);
        prop_assert_eq!(balances.iter().map(|b| b.total_owed).sum::<i64>(), expected);
        for balance in &balances {
            prop_assert_eq!(balance.net, balance.total_paid - balance.total_owed);
        }
    }

    /// **Property 1.3: One balance per member, in member order**
    #[test]
    fn prop_one_balance_per_member((count, raw) in trip_strategy()) {
        let members = make_members(count);
        let expenses = make_expenses(&members, &raw);

        let balances = compute_balances(&members, &expenses);

        let ids: Vec<MemberId> = balances.iter().map(|b| b.member_id).collect();
        let expected: Vec<MemberId> = members.iter().map(|m| m.id).collect();
        prop_assert_eq!(ids, expected);
    }

    /// **Property 3.1: Balance calculation is deterministic**
    #[test]
    fn prop_balances_deterministic((count, raw) in trip_strategy()) {
        let members = make_members(count);
        let expenses = make_expenses(&members, &raw);

        prop_assert_eq!(
            compute_balances(&members, &expenses),
            compute_balances(&members, &expenses)
        );
    }
}
