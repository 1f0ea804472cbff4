//! Cost report loading.
//!
//! Reads everything the report for one month needs and hands it to the
//! aggregation in `foodcost-core`. No figures are computed here.

use foodcost_core::aggregation::{
    CategoryProfile, CostReport, CostReportInput, ExpenseCharge, ItemProfile, RevenueFigure,
    RevenueGroupProfile, aggregate_cost_report,
};
use foodcost_core::allocation::DeductionOwner;
use foodcost_shared::types::{
    CategoryId, ExpenseId, ItemId, MonthKey, MonthlyExpenseId, RevenueGroupId,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use tracing::{info, instrument};

use super::deduction::all_deductions;
use super::error::RepositoryError;
use super::inventory_log::stock_entries;
use super::month::{from_columns, in_month};
use super::revenue_group::category_links;
use crate::entities::{
    StoredDecimal, categories, expenses, items, monthly_expense_entries, monthly_expenses, revenue_groups,
    revenues,
};

/// Report repository.
#[derive(Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the aggregation input for `month` from one consistent snapshot.
    #[instrument(skip(self))]
    pub async fn cost_report_input(
        &self,
        month: MonthKey,
    ) -> Result<CostReportInput, RepositoryError> {
        let txn = self.db.begin().await?;

        let items = items::Entity::find()
            .all(&txn)
            .await?
            .into_iter()
            .map(|item| ItemProfile {
                item_id: ItemId::from_uuid(item.id),
                name: item.name,
                category_id: CategoryId::from_uuid(item.category_id),
                uom_abbrev: item.uom_abbrev,
                uom_abbrev_per_piece: item.uom_abbrev_per_piece,
                qty_per_piece: item.qty_per_piece.map(StoredDecimal::get),
                unit_cost: item.unit_cost.get(),
                low_stock_level: item.low_stock_level.get(),
            })
            .collect();

        let categories = categories::Entity::find()
            .all(&txn)
            .await?
            .into_iter()
            .map(|category| CategoryProfile {
                category_id: CategoryId::from_uuid(category.id),
                name: category.name,
            })
            .collect();

        let mut links = category_links(&txn).await?;
        let revenue_groups = revenue_groups::Entity::find()
            .all(&txn)
            .await?
            .into_iter()
            .map(|group| RevenueGroupProfile {
                revenue_group_id: RevenueGroupId::from_uuid(group.id),
                category_ids: links.remove(&group.id).unwrap_or_default(),
                name: group.name,
            })
            .collect();

        let revenues = revenues::Entity::find()
            .filter(in_month(
                revenues::Column::RevenueYear,
                revenues::Column::RevenueMonth,
                month,
            ))
            .all(&txn)
            .await?
            .into_iter()
            .map(|row| {
                Ok(RevenueFigure {
                    revenue_group_id: RevenueGroupId::from_uuid(row.revenue_group_id),
                    month: from_columns("revenue", row.revenue_year, row.revenue_month)?,
                    amount: row.amount.get(),
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        let entries = stock_entries(&txn, None, month).await?;

        let mut deductions = all_deductions(&txn).await?;
        let mut charges = Vec::new();
        for expense in expenses::Entity::find()
            .filter(in_month(
                expenses::Column::ExpenseYear,
                expenses::Column::ExpenseMonth,
                month,
            ))
            .all(&txn)
            .await?
        {
            let owner = DeductionOwner::Expense(ExpenseId::from_uuid(expense.id));
            charges.push(ExpenseCharge {
                name: expense.name,
                month: from_columns("expense", expense.expense_year, expense.expense_month)?,
                amount: expense.amount.get(),
                revenue_group_ids: deductions.remove(&owner).unwrap_or_default(),
            });
        }
        for (entry, parent) in monthly_expense_entries::Entity::find()
            .find_also_related(monthly_expenses::Entity)
            .filter(in_month(
                monthly_expense_entries::Column::EntryYear,
                monthly_expense_entries::Column::EntryMonth,
                month,
            ))
            .all(&txn)
            .await?
        {
            let parent = parent.ok_or_else(|| RepositoryError::CorruptRow {
                entity: "monthly_expense_entry",
                reason: format!("entry {} has no monthly expense", entry.id),
            })?;
            let owner = DeductionOwner::MonthlyExpense(MonthlyExpenseId::from_uuid(parent.id));
            charges.push(ExpenseCharge {
                name: parent.name,
                month: from_columns("monthly_expense_entry", entry.entry_year, entry.entry_month)?,
                amount: entry.amount.get(),
                revenue_group_ids: deductions.get(&owner).cloned().unwrap_or_default(),
            });
        }

        txn.commit().await?;

        Ok(CostReportInput {
            month,
            items,
            categories,
            revenue_groups,
            revenues,
            entries,
            expenses: charges,
        })
    }

    /// Builds the cost report for `month`.
    pub async fn cost_report(&self, month: MonthKey) -> Result<CostReport, RepositoryError> {
        let input = self.cost_report_input(month).await?;
        let report = aggregate_cost_report(&input);
        info!(
            %month,
            items = report.items.len(),
            categories = report.categories.len(),
            revenue_groups = report.revenue_groups.len(),
            "Cost report built"
        );
        Ok(report)
    }
}
