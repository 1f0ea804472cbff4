//! Expense splitting with the Largest Remainder Method.
//!
//! An expense charged against N revenue groups is divided into N shares that
//! sum to the expense amount exactly; the leftover cents go to the first
//! groups in selection order.

use foodcost_shared::types::RevenueGroupId;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Decimal places of an expense share.
pub const SHARE_DECIMAL_PLACES: u32 = 2;

/// Amount allocation utility.
pub struct AllocationUtil;

impl AllocationUtil {
    /// Allocates `total` equally across `count` recipients.
    ///
    /// The sum of the result equals `total` rounded to `decimal_places`.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use foodcost_core::allocation::AllocationUtil;
    ///
    /// let shares = AllocationUtil::allocate_equal(dec!(100), 3, 2);
    /// assert_eq!(shares, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    /// ```
    #[must_use]
    pub fn allocate_equal(total: Decimal, count: usize, decimal_places: u32) -> Vec<Decimal> {
        let total_rounded =
            total.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
        match count {
            0 => return vec![],
            1 => return vec![total_rounded],
            _ => {}
        }

        let count_dec = Decimal::from(count);
        let unit = Decimal::new(1, decimal_places);
        let base = (total_rounded / count_dec)
            .round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero);
        let remainder = total_rounded - base * count_dec;

        let extra = (remainder / unit)
            .trunc()
            .to_usize()
            .unwrap_or(0);

        (0..count)
            .map(|i| if i < extra { base + unit } else { base })
            .collect()
    }
}

/// One revenue group's share of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShare {
    /// Revenue group charged.
    pub revenue_group_id: RevenueGroupId,
    /// Amount charged to it.
    pub amount: Decimal,
}

/// Splits `amount` across the distinct groups in `revenue_group_ids`.
///
/// Empty input yields no shares; validation happens before storage, not here.
#[must_use]
pub fn allocate_expense(amount: Decimal, revenue_group_ids: &[RevenueGroupId]) -> Vec<ExpenseShare> {
    let mut groups: Vec<RevenueGroupId> = Vec::with_capacity(revenue_group_ids.len());
    for id in revenue_group_ids {
        if !groups.contains(id) {
            groups.push(*id);
        }
    }

    let amounts = AllocationUtil::allocate_equal(amount, groups.len(), SHARE_DECIMAL_PLACES);
    groups
        .into_iter()
        .zip(amounts)
        .map(|(revenue_group_id, amount)| ExpenseShare {
            revenue_group_id,
            amount,
        })
        .collect()
}
