//! Amount allocation utilities using Largest Remainder Method.
//!
//! This module provides functions for allocating amounts fairly while
//! ensuring the sum exactly equals the original total (no units lost).
//!
//! Works in integer minor units:
//! 1. Calculate each floor allocation
//! 2. Calculate the leftover (total - sum of floors)
//! 3. Give one unit each to the items with the largest remainders

/// Allocation utility for distributing amounts.
///
/// Guarantees that the sum of allocations EXACTLY equals the total.
pub struct AllocationUtil;

impl AllocationUtil {
    /// Allocate `total` equally across `count` recipients.
    ///
    /// The first `total % count` recipients receive one extra unit.
    ///
    /// # Example
    ///
    /// ```
    /// use tripsplit_core::split::AllocationUtil;
    ///
    /// // 100 / 3 = [34, 33, 33]
    /// assert_eq!(AllocationUtil::allocate_equal(100, 3), vec![34, 33, 33]);
    /// ```
    #[must_use]
    pub fn allocate_equal(total: i64, count: usize) -> Vec<i64> {
        if count == 0 {
            return vec![];
        }

        let count_i64 = i64::try_from(count).unwrap_or(i64::MAX);
        let base = total.div_euclid(count_i64);
        let extra = usize::try_from(total.rem_euclid(count_i64)).unwrap_or(0);

        (0..count)
            .map(|i| if i < extra { base + 1 } else { base })
            .collect()
    }

    /// Allocate `total` proportionally to `weights`.
    ///
    /// Leftover units go to the largest fractional remainders; equal
    /// remainders favor the earlier recipient. Returns all zeros when the
    /// weights sum to zero.
    ///
    /// # Example
    ///
    /// ```
    /// use tripsplit_core::split::AllocationUtil;
    ///
    /// // 100 split 2:1 -> [67, 33]
    /// assert_eq!(AllocationUtil::allocate_by_weights(100, &[2, 1]), vec![67, 33]);
    /// ```
    #[must_use]
    pub fn allocate_by_weights(total: i64, weights: &[u64]) -> Vec<i64> {
        let total_weight: i128 = weights.iter().map(|w| i128::from(*w)).sum();
        if total_weight == 0 {
            return vec![0; weights.len()];
        }

        let total_wide = i128::from(total);

        // (floor, remainder) per recipient
        let exact: Vec<(i128, i128)> = weights
            .iter()
            .map(|w| {
                let scaled = total_wide * i128::from(*w);
                (scaled.div_euclid(total_weight), scaled.rem_euclid(total_weight))
            })
            .collect();

        let mut allocated: Vec<i128> = exact.iter().map(|(floor, _)| *floor).collect();
        let leftover = total_wide - allocated.iter().sum::<i128>();
        let units_to_distribute = usize::try_from(leftover).unwrap_or(0);

        if units_to_distribute > 0 {
            let mut order: Vec<usize> = (0..weights.len()).collect();
            // Stable sort keeps earlier recipients first on equal remainders.
            order.sort_by(|a, b| exact[*b].1.cmp(&exact[*a].1));

            for idx in order.into_iter().take(units_to_distribute) {
                allocated[idx] += 1;
            }
        }

        // Each allocation lies between 0 and `total`, so it fits in i64.
        allocated
            .into_iter()
            .map(|a| i64::try_from(a).unwrap_or(i64::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    // =========================================================================
    // allocate_equal tests
    // =========================================================================

    #[test]
    fn test_allocate_equal_empty() {
        assert!(AllocationUtil::allocate_equal(100, 0).is_empty());
    }

    #[rstest]
    #[case(100, 1, vec![100])]
    #[case(100, 3, vec![34, 33, 33])]
    #[case(300, 3, vec![100, 100, 100])]
    #[case(2, 3, vec![1, 1, 0])]
    #[case(0, 2, vec![0, 0])]
    fn test_allocate_equal(#[case] total: i64, #[case] count: usize, #[case] expected: Vec<i64>) {
        assert_eq!(AllocationUtil::allocate_equal(total, count), expected);
    }

    // =========================================================================
    // allocate_by_weights tests
    // =========================================================================

    #[rstest]
    #[case(100, vec![2, 1], vec![67, 33])]
    #[case(100, vec![1, 1, 1], vec![34, 33, 33])]
    #[case(100, vec![50, 30, 20], vec![50, 30, 20])]
    #[case(10, vec![0, 1], vec![0, 10])]
    #[case(7, vec![1, 2, 4], vec![1, 2, 4])]
    #[case(5, vec![1, 1, 2], vec![1, 1, 3])]
    fn test_allocate_by_weights(
        #[case] total: i64,
        #[case] weights: Vec<u64>,
        #[case] expected: Vec<i64>,
    ) {
        assert_eq!(AllocationUtil::allocate_by_weights(total, &weights), expected);
    }

    #[test]
    fn test_allocate_by_weights_zero_weights() {
        assert_eq!(AllocationUtil::allocate_by_weights(100, &[0, 0]), vec![0, 0]);
        assert!(AllocationUtil::allocate_by_weights(100, &[]).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Equal allocation always sums to the total and differs by at most one unit.
        #[test]
        fn prop_equal_sums_to_total(total in 0i64..10_000_000, count in 1usize..20) {
            let result = AllocationUtil::allocate_equal(total, count);

            prop_assert_eq!(result.len(), count);
            prop_assert_eq!(result.iter().sum::<i64>(), total);
            let max = *result.iter().max().unwrap();
            let min = *result.iter().min().unwrap();
            prop_assert!(max - min <= 1);
        }

        /// Weighted allocation always sums to the total.
        #[test]
        fn prop_weighted_sums_to_total(
            total in 0i64..10_000_000,
            weights in prop::collection::vec(0u64..1_000, 1..10),
        ) {
            prop_assume!(weights.iter().any(|w| *w > 0));

            let result = AllocationUtil::allocate_by_weights(total, &weights);

            prop_assert_eq!(result.len(), weights.len());
            prop_assert_eq!(result.iter().sum::<i64>(), total);
            for (share, weight) in result.iter().zip(&weights) {
                if *weight == 0 {
                    prop_assert_eq!(*share, 0);
                }
            }
        }
    }
}
