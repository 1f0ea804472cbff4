//! Cost aggregation service.
//!
//! Every figure is a pure function of the report input. Revenue is attached
//! to items and categories through the revenue groups linked to the category;
//! an item in a category linked to two groups is measured against the revenue
//! of both.

use std::collections::HashMap;

use foodcost_shared::types::{CategoryId, MonthKey, RevenueGroupId};
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{
    CategoryCostRollup, CategoryProfile, CostFigures, CostReport, CostReportInput, ExpenseCharge,
    ItemCostRollup, ItemProfile, RevenueFigure, RevenueGroupProfile, RevenueGroupRollup,
};
use crate::allocation::allocate_expense;
use crate::math::{guarded_div, percentage};
use crate::stock::{OperationKind, StockEntry, StockLedger};
use crate::tax::split_tax;

/// Decimal places of average unit costs.
pub const AVG_COST_DECIMAL_PLACES: u32 = 4;

/// Cost aggregation service.
pub struct CostAggregationService;

impl CostAggregationService {
    /// Signed split of one row: add rows count positive, remove rows negative.
    #[must_use]
    pub fn signed_cost(entry: &StockEntry) -> CostFigures {
        let split = split_tax(entry.line_gross(), entry.tax_rate_percentage);
        match entry.kind {
            OperationKind::AddStock => split.into(),
            OperationKind::RemoveStock => split.negated().into(),
        }
    }

    fn unsigned_cost(entry: &StockEntry) -> CostFigures {
        split_tax(entry.line_gross(), entry.tax_rate_percentage).into()
    }

    /// `net / qty` at 4 dp; zero when `qty` is zero.
    #[must_use]
    pub fn average_unit_cost(net: Decimal, qty: Decimal) -> Decimal {
        guarded_div(net, qty)
            .round_dp_with_strategy(AVG_COST_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
    }

    /// Total revenue per group for `month`.
    #[must_use]
    pub fn revenue_by_group(
        revenues: &[RevenueFigure],
        month: MonthKey,
    ) -> HashMap<RevenueGroupId, Decimal> {
        let mut totals = HashMap::new();
        for revenue in revenues.iter().filter(|r| r.month == month) {
            *totals.entry(revenue.revenue_group_id).or_insert(Decimal::ZERO) += revenue.amount;
        }
        totals
    }

    /// Revenue attached to each category through its linked groups.
    #[must_use]
    pub fn revenue_by_category(
        groups: &[RevenueGroupProfile],
        group_revenue: &HashMap<RevenueGroupId, Decimal>,
    ) -> HashMap<CategoryId, Decimal> {
        let mut totals = HashMap::new();
        for group in groups {
            let amount = group_revenue
                .get(&group.revenue_group_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let mut seen: Vec<CategoryId> = Vec::with_capacity(group.category_ids.len());
            for category_id in &group.category_ids {
                if seen.contains(category_id) {
                    continue;
                }
                seen.push(*category_id);
                *totals.entry(*category_id).or_insert(Decimal::ZERO) += amount;
            }
        }
        totals
    }

    /// Monthly figures of one item.
    #[must_use]
    pub fn item_rollup(
        item: &ItemProfile,
        entries: &[StockEntry],
        month: MonthKey,
        revenue_amount: Decimal,
    ) -> ItemCostRollup {
        let ledger = StockLedger::for_item(entries, item.item_id);
        let rollup = ledger.rollup(month);

        let grand_total: CostFigures = ledger.contributing(month).map(Self::signed_cost).sum();
        let added_cost: CostFigures = ledger
            .in_month(month)
            .filter(|e| e.kind == OperationKind::AddStock)
            .map(Self::unsigned_cost)
            .sum();
        let removed_cost: CostFigures = ledger
            .in_month(month)
            .filter(|e| e.kind == OperationKind::RemoveStock)
            .map(Self::unsigned_cost)
            .sum();

        let low_stock =
            item.low_stock_level > Decimal::ZERO && rollup.ending_qty <= item.low_stock_level;

        ItemCostRollup {
            item_id: item.item_id,
            name: item.name.clone(),
            category_id: item.category_id,
            ledger: rollup,
            grand_total,
            added_cost,
            removed_cost,
            avg_unit_cost: Self::average_unit_cost(grand_total.net, rollup.ending_qty),
            revenue_amount,
            cost_percentage: percentage(removed_cost.net, revenue_amount),
            low_stock,
            ending_qty_per_piece: item
                .qty_per_piece
                .map(|per_piece| rollup.ending_qty.saturating_mul(per_piece)),
        }
    }

    /// Sums the item rollups of one category and recomputes the ratios.
    #[must_use]
    pub fn category_rollup(
        category: &CategoryProfile,
        items: &[ItemCostRollup],
        revenue_amount: Decimal,
    ) -> CategoryCostRollup {
        let members: Vec<&ItemCostRollup> = items
            .iter()
            .filter(|i| i.category_id == category.category_id)
            .collect();

        let ending_qty: Decimal = members.iter().map(|i| i.ledger.ending_qty).sum();
        let grand_total: CostFigures = members.iter().map(|i| i.grand_total).sum();
        let removed_cost: CostFigures = members.iter().map(|i| i.removed_cost).sum();

        CategoryCostRollup {
            category_id: category.category_id,
            name: category.name.clone(),
            item_count: members.len(),
            previous_ending_qty: members.iter().map(|i| i.ledger.previous_ending_qty).sum(),
            added_qty: members.iter().map(|i| i.ledger.added_qty).sum(),
            removed_qty: members.iter().map(|i| i.ledger.removed_qty).sum(),
            ending_qty,
            grand_total,
            added_cost: members.iter().map(|i| i.added_cost).sum(),
            removed_cost,
            avg_unit_cost: Self::average_unit_cost(grand_total.net, ending_qty),
            revenue_amount,
            cost_percentage: percentage(removed_cost.net, revenue_amount),
        }
    }

    /// Expense shares per group for `month`.
    #[must_use]
    pub fn expense_by_group(
        expenses: &[ExpenseCharge],
        month: MonthKey,
    ) -> HashMap<RevenueGroupId, Decimal> {
        let mut totals = HashMap::new();
        for expense in expenses.iter().filter(|e| e.month == month) {
            for share in allocate_expense(expense.amount, &expense.revenue_group_ids) {
                *totals.entry(share.revenue_group_id).or_insert(Decimal::ZERO) += share.amount;
            }
        }
        totals
    }

    /// Monthly figures of one revenue group.
    #[must_use]
    pub fn revenue_group_rollup(
        group: &RevenueGroupProfile,
        categories: &[CategoryCostRollup],
        revenue_amount: Decimal,
        expense_amount: Decimal,
    ) -> RevenueGroupRollup {
        let category_cost: Decimal = categories
            .iter()
            .filter(|c| group.category_ids.contains(&c.category_id))
            .map(|c| c.removed_cost.net)
            .sum();
        let total_cost = category_cost + expense_amount;

        RevenueGroupRollup {
            revenue_group_id: group.revenue_group_id,
            name: group.name.clone(),
            revenue_amount,
            category_cost,
            expense_amount,
            total_cost,
            category_cost_percentage: percentage(category_cost, revenue_amount),
            expense_percentage: percentage(expense_amount, revenue_amount),
            total_cost_percentage: percentage(total_cost, revenue_amount),
        }
    }

    /// Builds the full report for `input.month`.
    #[must_use]
    pub fn report(input: &CostReportInput) -> CostReport {
        let month = input.month;
        let group_revenue = Self::revenue_by_group(&input.revenues, month);
        let category_revenue = Self::revenue_by_category(&input.revenue_groups, &group_revenue);
        let category_revenue_of = |id: &CategoryId| {
            category_revenue.get(id).copied().unwrap_or(Decimal::ZERO)
        };

        let mut items: Vec<ItemCostRollup> = input
            .items
            .iter()
            .map(|item| {
                Self::item_rollup(
                    item,
                    &input.entries,
                    month,
                    category_revenue_of(&item.category_id),
                )
            })
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.item_id.cmp(&b.item_id)));

        let mut categories: Vec<CategoryCostRollup> = input
            .categories
            .iter()
            .map(|category| {
                Self::category_rollup(category, &items, category_revenue_of(&category.category_id))
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.category_id.cmp(&b.category_id)));

        let group_expense = Self::expense_by_group(&input.expenses, month);
        let mut revenue_groups: Vec<RevenueGroupRollup> = input
            .revenue_groups
            .iter()
            .map(|group| {
                let id = group.revenue_group_id;
                Self::revenue_group_rollup(
                    group,
                    &categories,
                    group_revenue.get(&id).copied().unwrap_or(Decimal::ZERO),
                    group_expense.get(&id).copied().unwrap_or(Decimal::ZERO),
                )
            })
            .collect();
        revenue_groups.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then(a.revenue_group_id.cmp(&b.revenue_group_id))
        });

        CostReport {
            month,
            items,
            categories,
            revenue_groups,
        }
    }
}

/// Builds the monthly cost report. See [`CostAggregationService::report`].
#[must_use]
pub fn aggregate_cost_report(input: &CostReportInput) -> CostReport {
    CostAggregationService::report(input)
}
