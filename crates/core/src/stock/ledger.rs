//! Month-bucketed stock ledger.
//!
//! `ending_qty(M)` is the signed sum of every entry dated in or before `M`.
//! The sum is commutative, so entry order never changes a result, and the
//! recurrence `ending(M) = ending(M-1) + added(M) - removed(M)` holds for
//! every month including those before the first entry.

use foodcost_shared::types::{ItemId, MonthKey};
use rust_decimal::Decimal;

use super::types::{LedgerRollup, OperationKind, StockEntry};
use crate::validation::{ValidationError, require_positive};

/// Read-only view over one item's ledger entries.
#[derive(Debug, Clone)]
pub struct StockLedger<'a> {
    item_id: ItemId,
    entries: Vec<&'a StockEntry>,
}

impl<'a> StockLedger<'a> {
    /// Builds the ledger of `item_id` from a mixed list of entries.
    #[must_use]
    pub fn for_item(entries: &'a [StockEntry], item_id: ItemId) -> Self {
        Self {
            item_id,
            entries: entries.iter().filter(|e| e.item_id == item_id).collect(),
        }
    }

    /// The item this ledger belongs to.
    #[must_use]
    pub const fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Entries that count towards `ending_qty(month)`.
    pub fn contributing(&self, month: MonthKey) -> impl Iterator<Item = &'a StockEntry> + '_ {
        self.entries.iter().copied().filter(move |e| e.month <= month)
    }

    /// Entries dated inside `month`.
    pub fn in_month(&self, month: MonthKey) -> impl Iterator<Item = &'a StockEntry> + '_ {
        self.entries.iter().copied().filter(move |e| e.month == month)
    }

    fn month_sum(&self, month: MonthKey, kind: OperationKind) -> Decimal {
        self.in_month(month)
            .filter(|e| e.kind == kind)
            .map(|e| e.quantity)
            .sum()
    }

    /// Quantity added during `month`.
    #[must_use]
    pub fn added_qty(&self, month: MonthKey) -> Decimal {
        self.month_sum(month, OperationKind::AddStock)
    }

    /// Quantity removed during `month`.
    #[must_use]
    pub fn removed_qty(&self, month: MonthKey) -> Decimal {
        self.month_sum(month, OperationKind::RemoveStock)
    }

    /// On-hand quantity at the close of `month`.
    #[must_use]
    pub fn ending_qty(&self, month: MonthKey) -> Decimal {
        self.contributing(month).map(StockEntry::signed_quantity).sum()
    }

    /// Quantity figures for `month`.
    #[must_use]
    pub fn rollup(&self, month: MonthKey) -> LedgerRollup {
        LedgerRollup {
            item_id: self.item_id,
            month,
            previous_ending_qty: self.ending_qty(month.previous()),
            added_qty: self.added_qty(month),
            removed_qty: self.removed_qty(month),
            ending_qty: self.ending_qty(month),
        }
    }

    /// Rollups for every month from `from` through `to`, inclusive.
    #[must_use]
    pub fn history(&self, from: MonthKey, to: MonthKey) -> Vec<(MonthKey, LedgerRollup)> {
        from.through(to)
            .into_iter()
            .map(|month| (month, self.rollup(month)))
            .collect()
    }
}

/// Rollup of `item_id` for `month`. See [`StockLedger::rollup`].
#[must_use]
pub fn ledger_rollup(entries: &[StockEntry], item_id: ItemId, month: MonthKey) -> LedgerRollup {
    StockLedger::for_item(entries, item_id).rollup(month)
}

/// Month series of `item_id`. See [`StockLedger::history`].
#[must_use]
pub fn history(
    entries: &[StockEntry],
    item_id: ItemId,
    from: MonthKey,
    to: MonthKey,
) -> Vec<(MonthKey, LedgerRollup)> {
    StockLedger::for_item(entries, item_id).history(from, to)
}

/// Checks the quantity of a new or edited ledger row.
///
/// # Errors
///
/// Returns `ValidationError::NotPositive` when `quantity <= 0`.
pub fn validate_adjustment(quantity: Decimal) -> Result<Decimal, ValidationError> {
    require_positive("adjustment_qty", quantity)
}
