//! Stock ledger types.

use std::str::FromStr;

use foodcost_shared::types::{ItemId, MonthKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cost::CostService;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Increases on-hand quantity.
    AddStock,
    /// Decreases on-hand quantity.
    RemoveStock,
}

impl OperationKind {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddStock => "add_stock",
            Self::RemoveStock => "remove_stock",
        }
    }

    /// Applies the direction to an unsigned amount.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::AddStock => amount,
            Self::RemoveStock => -amount,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add_stock" => Ok(Self::AddStock),
            "remove_stock" => Ok(Self::RemoveStock),
            other => Err(format!("Unknown operation kind: {other}")),
        }
    }
}

/// One ledger row reduced to what the rollups need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Item the row belongs to.
    pub item_id: ItemId,
    /// Add or remove.
    pub kind: OperationKind,
    /// Unsigned quantity, always positive.
    pub quantity: Decimal,
    /// Gross unit cost.
    pub unit_cost: Decimal,
    /// Resolved tax rate in percent.
    pub tax_rate_percentage: Decimal,
    /// Month the row was dated in.
    pub month: MonthKey,
}

impl StockEntry {
    /// Gross line cost, unsigned.
    #[must_use]
    pub fn line_gross(&self) -> Decimal {
        CostService::line_total(self.unit_cost, self.quantity)
    }

    /// Quantity with the direction applied.
    #[must_use]
    pub fn signed_quantity(&self) -> Decimal {
        self.kind.signed(self.quantity)
    }
}

/// Quantity figures of one item for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRollup {
    /// Item.
    pub item_id: ItemId,
    /// Month.
    pub month: MonthKey,
    /// Ending quantity of the previous month.
    pub previous_ending_qty: Decimal,
    /// Quantity added during the month.
    pub added_qty: Decimal,
    /// Quantity removed during the month.
    pub removed_qty: Decimal,
    /// `previous_ending_qty + added_qty - removed_qty`.
    pub ending_qty: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_operation_kind_round_trip_names() {
        assert_eq!("add_stock".parse::<OperationKind>(), Ok(OperationKind::AddStock));
        assert_eq!(OperationKind::RemoveStock.to_string(), "remove_stock");
        assert!("transfer".parse::<OperationKind>().is_err());
    }

    #[test]
    fn test_signed_values() {
        assert_eq!(OperationKind::AddStock.signed(dec!(4)), dec!(4));
        assert_eq!(OperationKind::RemoveStock.signed(dec!(4)), dec!(-4));
    }
}
