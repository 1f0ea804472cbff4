//! Property-based tests for expense allocation.

use foodcost_shared::types::RevenueGroupId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::split::{AllocationUtil, allocate_expense};

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Shares always add back up to the amount.
    #[test]
    fn prop_shares_sum_to_amount(total in amount(), count in 1usize..12) {
        let shares = AllocationUtil::allocate_equal(total, count, 2);
        prop_assert_eq!(shares.len(), count);
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), total);
    }

    /// No two shares differ by more than one cent.
    #[test]
    fn prop_shares_are_fair(total in amount(), count in 1usize..12) {
        let shares = AllocationUtil::allocate_equal(total, count, 2);
        let max = shares.iter().copied().max().unwrap_or_default();
        let min = shares.iter().copied().min().unwrap_or_default();
        prop_assert!(max - min <= Decimal::new(1, 2));
    }

    /// Expense shares cover every distinct group once.
    #[test]
    fn prop_expense_shares_cover_groups(total in amount(), count in 1usize..6) {
        let groups: Vec<RevenueGroupId> = (0..count).map(|_| RevenueGroupId::new()).collect();
        let shares = allocate_expense(total, &groups);
        prop_assert_eq!(shares.len(), count);
        prop_assert_eq!(shares.iter().map(|s| s.amount).sum::<Decimal>(), total);
    }
}
