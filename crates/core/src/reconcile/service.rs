//! Reconciliation planning and usage entry construction.

use chrono::NaiveDate;
use foodcost_shared::types::{ItemId, MonthKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReconcileError;
use crate::stock::{OperationKind, StockEntry};

/// What a reconciliation would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconciliationPlan {
    /// Ledger already matches the declared quantity.
    Balanced,
    /// The declared quantity is higher; the user must add stock instead.
    RedirectToAddStock {
        /// Quantity to pre-fill on the add-stock form.
        quantity: Decimal,
    },
    /// The declared quantity is lower; the difference is recorded as usage.
    RecordUsage {
        /// Quantity to remove.
        quantity: Decimal,
    },
}

/// The item data a usage row is priced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageItem {
    /// Item.
    pub item_id: ItemId,
    /// Current gross unit cost of the item.
    pub unit_cost: Decimal,
    /// Current tax rate of the item, zero when it has none.
    pub tax_rate_percentage: Decimal,
}

/// A confirmed usage row ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Item.
    pub item_id: ItemId,
    /// Quantity removed.
    pub quantity: Decimal,
    /// Gross unit cost.
    pub unit_cost: Decimal,
    /// `unit_cost * quantity`.
    pub total_cost: Decimal,
    /// Tax rate at write time.
    pub tax_rate_percentage: Decimal,
    /// Row date, always inside the reconciled month.
    pub date: NaiveDate,
}

impl UsageEntry {
    /// Ledger view of this row.
    #[must_use]
    pub fn to_stock_entry(&self) -> StockEntry {
        StockEntry {
            item_id: self.item_id,
            kind: OperationKind::RemoveStock,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            tax_rate_percentage: self.tax_rate_percentage,
            month: MonthKey::from_date(self.date),
        }
    }
}

/// Pre-filled add-stock form returned when a reconciliation is redirected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStockPrefill {
    /// Item.
    pub item_id: ItemId,
    /// Missing quantity.
    pub quantity: Decimal,
    /// Current gross unit cost of the item.
    pub unit_cost: Decimal,
    /// Suggested date inside the reconciled month.
    pub date: NaiveDate,
}

/// Reconciliation service.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Plans a reconciliation after checking the declared quantity.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::NegativeDeclaredQuantity` for a declared
    /// quantity below zero.
    pub fn plan(
        current_ending_qty: Decimal,
        declared_remaining_qty: Decimal,
    ) -> Result<ReconciliationPlan, ReconcileError> {
        if declared_remaining_qty < Decimal::ZERO {
            return Err(ReconcileError::NegativeDeclaredQuantity(declared_remaining_qty));
        }
        Ok(reconcile_ending_inventory(
            current_ending_qty,
            declared_remaining_qty,
        ))
    }

    /// Date for a row written while reconciling `month`.
    ///
    /// Today when it falls in `month`, otherwise the month boundary nearest to
    /// today: the last day for past months, the first day for future ones.
    #[must_use]
    pub fn entry_date(month: MonthKey, today: NaiveDate) -> NaiveDate {
        let current = MonthKey::from_date(today);
        match current.cmp(&month) {
            std::cmp::Ordering::Equal => today,
            std::cmp::Ordering::Greater => month.last_day(),
            std::cmp::Ordering::Less => month.first_day(),
        }
    }

    /// Builds the single "Stock Usage" row of a confirmed plan.
    ///
    /// Returns `Ok(None)` for a balanced plan.
    ///
    /// # Errors
    ///
    /// - `DirectAdditionNotAllowed` for a redirect plan
    /// - `ConfirmationRequired` when usage is not confirmed
    pub fn usage_entry(
        plan: ReconciliationPlan,
        confirmed: bool,
        item: &UsageItem,
        month: MonthKey,
        today: NaiveDate,
    ) -> Result<Option<UsageEntry>, ReconcileError> {
        match plan {
            ReconciliationPlan::Balanced => Ok(None),
            ReconciliationPlan::RedirectToAddStock { quantity } => {
                Err(ReconcileError::DirectAdditionNotAllowed { quantity })
            }
            ReconciliationPlan::RecordUsage { quantity } if !confirmed => {
                Err(ReconcileError::ConfirmationRequired { quantity })
            }
            ReconciliationPlan::RecordUsage { quantity } => Ok(Some(UsageEntry {
                item_id: item.item_id,
                quantity,
                unit_cost: item.unit_cost,
                total_cost: item.unit_cost.saturating_mul(quantity),
                tax_rate_percentage: item.tax_rate_percentage,
                date: Self::entry_date(month, today),
            })),
        }
    }

    /// Add-stock form contents for a redirect plan, `None` otherwise.
    #[must_use]
    pub fn add_stock_prefill(
        plan: ReconciliationPlan,
        item: &UsageItem,
        month: MonthKey,
        today: NaiveDate,
    ) -> Option<AddStockPrefill> {
        match plan {
            ReconciliationPlan::RedirectToAddStock { quantity } => Some(AddStockPrefill {
                item_id: item.item_id,
                quantity,
                unit_cost: item.unit_cost,
                date: Self::entry_date(month, today),
            }),
            _ => None,
        }
    }
}

/// `declared - current` turned into a plan.
#[must_use]
pub fn reconcile_ending_inventory(
    current_ending_qty: Decimal,
    declared_remaining_qty: Decimal,
) -> ReconciliationPlan {
    let delta = declared_remaining_qty - current_ending_qty;
    match delta.cmp(&Decimal::ZERO) {
        std::cmp::Ordering::Greater => ReconciliationPlan::RedirectToAddStock { quantity: delta },
        std::cmp::Ordering::Less => ReconciliationPlan::RecordUsage { quantity: -delta },
        std::cmp::Ordering::Equal => ReconciliationPlan::Balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::StockLedger;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn item() -> UsageItem {
        UsageItem {
            item_id: ItemId::new(),
            unit_cost: dec!(100),
            tax_rate_percentage: Decimal::ZERO,
        }
    }

    #[rstest]
    #[case(dec!(10), dec!(15), ReconciliationPlan::RedirectToAddStock { quantity: dec!(5) })]
    #[case(dec!(10), dec!(6), ReconciliationPlan::RecordUsage { quantity: dec!(4) })]
    #[case(dec!(10), dec!(10), ReconciliationPlan::Balanced)]
    #[case(dec!(0), dec!(0), ReconciliationPlan::Balanced)]
    fn test_plans(
        #[case] current: Decimal,
        #[case] declared: Decimal,
        #[case] expected: ReconciliationPlan,
    ) {
        assert_eq!(reconcile_ending_inventory(current, declared), expected);
    }

    #[test]
    fn test_negative_declared_quantity() {
        assert_eq!(
            ReconciliationService::plan(dec!(3), dec!(-1)),
            Err(ReconcileError::NegativeDeclaredQuantity(dec!(-1)))
        );
    }

    #[test]
    fn test_redirect_never_produces_a_row() {
        let plan = reconcile_ending_inventory(dec!(10), dec!(15));
        let result =
            ReconciliationService::usage_entry(plan, true, &item(), month(2024, 3), date(2024, 3, 9));
        assert_eq!(
            result,
            Err(ReconcileError::DirectAdditionNotAllowed { quantity: dec!(5) })
        );

        let prefill = ReconciliationService::add_stock_prefill(
            plan,
            &item(),
            month(2024, 3),
            date(2024, 3, 9),
        )
        .unwrap();
        assert_eq!(prefill.quantity, dec!(5));
        assert_eq!(prefill.unit_cost, dec!(100));
    }

    #[test]
    fn test_unconfirmed_usage_is_rejected() {
        let plan = reconcile_ending_inventory(dec!(10), dec!(6));
        let result =
            ReconciliationService::usage_entry(plan, false, &item(), month(2024, 3), date(2024, 3, 9));
        assert_eq!(
            result,
            Err(ReconcileError::ConfirmationRequired { quantity: dec!(4) })
        );
    }

    #[test]
    fn test_confirmed_usage_then_balanced() {
        let usage_item = item();
        let m = month(2024, 3);
        let existing = vec![StockEntry {
            item_id: usage_item.item_id,
            kind: OperationKind::AddStock,
            quantity: dec!(10),
            unit_cost: dec!(100),
            tax_rate_percentage: Decimal::ZERO,
            month: m,
        }];

        let current = StockLedger::for_item(&existing, usage_item.item_id).ending_qty(m);
        let plan = reconcile_ending_inventory(current, dec!(6));
        let row = ReconciliationService::usage_entry(plan, true, &usage_item, m, date(2024, 3, 9))
            .unwrap()
            .unwrap();
        assert_eq!(row.quantity, dec!(4));
        assert_eq!(row.total_cost, dec!(400));

        let mut after = existing.clone();
        after.push(row.to_stock_entry());
        let current = StockLedger::for_item(&after, usage_item.item_id).ending_qty(m);
        assert_eq!(
            reconcile_ending_inventory(current, dec!(6)),
            ReconciliationPlan::Balanced
        );
    }

    #[rstest]
    #[case(month(2024, 3), date(2024, 3, 9), date(2024, 3, 9))]
    #[case(month(2024, 2), date(2024, 3, 9), date(2024, 2, 29))]
    #[case(month(2024, 4), date(2024, 3, 9), date(2024, 4, 1))]
    fn test_entry_date_stays_in_month(
        #[case] m: MonthKey,
        #[case] today: NaiveDate,
        #[case] expected: NaiveDate,
    ) {
        let dated = ReconciliationService::entry_date(m, today);
        assert_eq!(dated, expected);
        assert!(m.contains(dated));
    }

    #[test]
    fn test_plan_serializes_with_action_tag() {
        let json =
            serde_json::to_value(ReconciliationPlan::RedirectToAddStock { quantity: dec!(5) })
                .unwrap();
        assert_eq!(json["action"], "redirect_to_add_stock");
    }
}
