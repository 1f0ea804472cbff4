//! Report input and output types.

use std::ops::Add;

use foodcost_shared::types::{CategoryId, ItemId, MonthKey, RevenueGroupId};
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use crate::stock::{LedgerRollup, StockEntry};
use crate::tax::TaxSplit;

/// Item master data needed by the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProfile {
    /// Item ID.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// Primary unit abbreviation.
    pub uom_abbrev: String,
    /// Secondary unit abbreviation.
    pub uom_abbrev_per_piece: Option<String>,
    /// Secondary units per primary unit.
    pub qty_per_piece: Option<Decimal>,
    /// Current gross unit cost.
    pub unit_cost: Decimal,
    /// Threshold for the low-stock flag; zero disables it.
    pub low_stock_level: Decimal,
}

/// Category master data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
}

/// Revenue group with its linked categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueGroupProfile {
    /// Revenue group ID.
    pub revenue_group_id: RevenueGroupId,
    /// Group name.
    pub name: String,
    /// Linked categories.
    pub category_ids: Vec<CategoryId>,
}

/// Revenue of one group for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueFigure {
    /// Revenue group.
    pub revenue_group_id: RevenueGroupId,
    /// Month.
    pub month: MonthKey,
    /// Amount.
    pub amount: Decimal,
}

/// An expense amount for one month and the groups it is charged against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCharge {
    /// Display name.
    pub name: String,
    /// Month.
    pub month: MonthKey,
    /// Amount.
    pub amount: Decimal,
    /// Revenue groups charged.
    pub revenue_group_ids: Vec<RevenueGroupId>,
}

/// Everything one report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostReportInput {
    /// Report month.
    pub month: MonthKey,
    /// Items.
    pub items: Vec<ItemProfile>,
    /// Categories.
    pub categories: Vec<CategoryProfile>,
    /// Revenue groups.
    pub revenue_groups: Vec<RevenueGroupProfile>,
    /// Revenues; rows outside the report month are ignored.
    pub revenues: Vec<RevenueFigure>,
    /// Ledger entries of every item.
    pub entries: Vec<StockEntry>,
    /// Expense charges; rows outside the report month are ignored.
    pub expenses: Vec<ExpenseCharge>,
}

/// Gross, net, and tax totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostFigures {
    /// Tax-inclusive.
    pub gross: Decimal,
    /// Tax-exclusive.
    pub net: Decimal,
    /// Tax.
    pub tax: Decimal,
}

impl CostFigures {
    /// Rounds every figure with Banker's Rounding.
    #[must_use]
    pub fn round_dp(self, dp: u32) -> Self {
        let round = |v: Decimal| v.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
        Self {
            gross: round(self.gross),
            net: round(self.net),
            tax: round(self.tax),
        }
    }
}

impl From<TaxSplit> for CostFigures {
    fn from(split: TaxSplit) -> Self {
        Self {
            gross: split.gross,
            net: split.net,
            tax: split.tax,
        }
    }
}

impl Add for CostFigures {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            gross: self.gross + rhs.gross,
            net: self.net + rhs.net,
            tax: self.tax + rhs.tax,
        }
    }
}

impl std::iter::Sum for CostFigures {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Monthly figures of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCostRollup {
    /// Item ID.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// Quantity figures.
    pub ledger: LedgerRollup,
    /// Signed cost of every row up to and including the month.
    pub grand_total: CostFigures,
    /// Cost added during the month.
    pub added_cost: CostFigures,
    /// Cost removed during the month.
    pub removed_cost: CostFigures,
    /// `grand_total.net / ending_qty`, 4 dp.
    pub avg_unit_cost: Decimal,
    /// Revenue of the groups linked to the item's category.
    pub revenue_amount: Decimal,
    /// `removed_cost.net / revenue_amount * 100`, 2 dp.
    pub cost_percentage: Decimal,
    /// Ending quantity at or below the low-stock level.
    pub low_stock: bool,
    /// Ending quantity in the secondary unit.
    pub ending_qty_per_piece: Option<Decimal>,
}

/// Monthly figures of one category, summed over its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCostRollup {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Number of items in the category.
    pub item_count: usize,
    /// Summed previous ending quantity.
    pub previous_ending_qty: Decimal,
    /// Summed added quantity.
    pub added_qty: Decimal,
    /// Summed removed quantity.
    pub removed_qty: Decimal,
    /// Summed ending quantity.
    pub ending_qty: Decimal,
    /// Summed grand total.
    pub grand_total: CostFigures,
    /// Summed added cost.
    pub added_cost: CostFigures,
    /// Summed removed cost.
    pub removed_cost: CostFigures,
    /// Recomputed from the sums, 4 dp.
    pub avg_unit_cost: Decimal,
    /// Revenue of the linked groups.
    pub revenue_amount: Decimal,
    /// Recomputed from the sums, 2 dp.
    pub cost_percentage: Decimal,
}

/// Monthly figures of one revenue group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueGroupRollup {
    /// Revenue group ID.
    pub revenue_group_id: RevenueGroupId,
    /// Group name.
    pub name: String,
    /// Revenue for the month.
    pub revenue_amount: Decimal,
    /// Net removed-stock cost of the linked categories.
    pub category_cost: Decimal,
    /// Expense shares charged to the group.
    pub expense_amount: Decimal,
    /// `category_cost + expense_amount`.
    pub total_cost: Decimal,
    /// `category_cost / revenue_amount * 100`.
    pub category_cost_percentage: Decimal,
    /// `expense_amount / revenue_amount * 100`.
    pub expense_percentage: Decimal,
    /// `total_cost / revenue_amount * 100`.
    pub total_cost_percentage: Decimal,
}

/// A complete monthly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostReport {
    /// Report month.
    pub month: MonthKey,
    /// Items sorted by name then ID.
    pub items: Vec<ItemCostRollup>,
    /// Categories sorted by name then ID.
    pub categories: Vec<CategoryCostRollup>,
    /// Revenue groups sorted by name then ID.
    pub revenue_groups: Vec<RevenueGroupRollup>,
}

impl CostReport {
    /// Rounds money totals for display. Averages and percentages keep their
    /// own precision.
    #[must_use]
    pub fn round_money(mut self, dp: u32) -> Self {
        let round = |v: Decimal| v.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
        for item in &mut self.items {
            item.grand_total = item.grand_total.round_dp(dp);
            item.added_cost = item.added_cost.round_dp(dp);
            item.removed_cost = item.removed_cost.round_dp(dp);
        }
        for category in &mut self.categories {
            category.grand_total = category.grand_total.round_dp(dp);
            category.added_cost = category.added_cost.round_dp(dp);
            category.removed_cost = category.removed_cost.round_dp(dp);
        }
        for group in &mut self.revenue_groups {
            group.category_cost = round(group.category_cost);
            group.expense_amount = round(group.expense_amount);
            group.total_cost = round(group.total_cost);
        }
        self
    }
}
