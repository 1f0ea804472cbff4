//! Recurring monthly expense repository.
//!
//! A monthly expense is a named charge that recurs every month. Its amount is
//! recorded per month as an entry; a month without an entry charges nothing.

use foodcost_core::allocation::{DeductionOwner, validate_revenue_groups};
use foodcost_core::validation::{require_non_negative, require_text, require_unique_name};
use foodcost_shared::types::{ExpenseGroupId, MonthKey, MonthlyExpenseId, RevenueGroupId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::deduction::{
    all_deductions, delete_deductions, ensure_revenue_groups_exist, load_deductions,
    replace_deductions,
};
use super::error::RepositoryError;
use super::expense_group::ensure_expense_group;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use super::month::{in_month, to_columns};
use crate::entities::{monthly_expense_entries, monthly_expenses};

/// Input for creating a monthly expense.
#[derive(Debug, Clone)]
pub struct CreateMonthlyExpenseInput {
    /// Owning expense group.
    pub expense_group_id: ExpenseGroupId,
    /// Name, unique within the group.
    pub name: String,
    /// Revenue groups charged.
    pub revenue_group_ids: Vec<RevenueGroupId>,
}

/// Input for editing a monthly expense.
#[derive(Debug, Clone)]
pub struct UpdateMonthlyExpenseInput {
    /// Name.
    pub name: String,
    /// Revenue groups charged; replaces the previous set.
    pub revenue_group_ids: Vec<RevenueGroupId>,
}

/// A monthly expense with the revenue groups it is charged against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyExpenseWithGroups {
    /// Stored monthly expense.
    pub monthly_expense: monthly_expenses::Model,
    /// Charged revenue groups.
    pub revenue_group_ids: Vec<RevenueGroupId>,
}

async fn ensure_unique_name<C: ConnectionTrait>(
    conn: &C,
    expense_group_id: Uuid,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let mut query = monthly_expenses::Entity::find()
        .filter(monthly_expenses::Column::ExpenseGroupId.eq(expense_group_id))
        .filter(monthly_expenses::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(monthly_expenses::Column::Id.ne(id));
    }
    let clashes = query.all(conn).await?;
    require_unique_name(name, clashes.iter().map(|e| e.name.as_str()))?;
    Ok(())
}

async fn find_monthly_expense<C: ConnectionTrait>(
    conn: &C,
    id: MonthlyExpenseId,
) -> Result<monthly_expenses::Model, RepositoryError> {
    monthly_expenses::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("monthly_expense", id))
}

/// Monthly expense repository.
#[derive(Clone)]
pub struct MonthlyExpenseRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl MonthlyExpenseRepository {
    /// Creates a new monthly expense repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new monthly expense repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Creates a monthly expense with its deductions.
    pub async fn create(
        &self,
        input: CreateMonthlyExpenseInput,
    ) -> Result<MonthlyExpenseWithGroups, RepositoryError> {
        let revenue_group_ids = validate_revenue_groups(&input.revenue_group_ids)?;
        let name = require_text("name", &input.name)?;
        ensure_within_limit(self.limits.as_ref(), LimitedResource::MonthlyExpenses)?;

        let txn = self.db.begin().await?;
        let group = ensure_expense_group(&txn, input.expense_group_id).await?;
        ensure_revenue_groups_exist(&txn, &revenue_group_ids).await?;
        ensure_unique_name(&txn, group.id, &name, None).await?;

        let monthly_expense = monthly_expenses::ActiveModel {
            id: Set(MonthlyExpenseId::new().into_inner()),
            expense_group_id: Set(group.id),
            name: Set(name),
        }
        .insert(&txn)
        .await?;
        let owner =
            DeductionOwner::MonthlyExpense(MonthlyExpenseId::from_uuid(monthly_expense.id));
        replace_deductions(&txn, owner, &revenue_group_ids).await?;
        txn.commit().await?;

        info!(monthly_expense_id = %monthly_expense.id, "Monthly expense created");
        Ok(MonthlyExpenseWithGroups {
            monthly_expense,
            revenue_group_ids,
        })
    }

    /// Renames a monthly expense and replaces its deductions.
    pub async fn update(
        &self,
        id: MonthlyExpenseId,
        input: UpdateMonthlyExpenseInput,
    ) -> Result<MonthlyExpenseWithGroups, RepositoryError> {
        let revenue_group_ids = validate_revenue_groups(&input.revenue_group_ids)?;
        let name = require_text("name", &input.name)?;

        let txn = self.db.begin().await?;
        let existing = find_monthly_expense(&txn, id).await?;
        ensure_revenue_groups_exist(&txn, &revenue_group_ids).await?;
        ensure_unique_name(&txn, existing.expense_group_id, &name, Some(existing.id)).await?;

        let mut monthly_expense: monthly_expenses::ActiveModel = existing.into();
        monthly_expense.name = Set(name);
        let monthly_expense = monthly_expense.update(&txn).await?;
        replace_deductions(&txn, DeductionOwner::MonthlyExpense(id), &revenue_group_ids).await?;
        txn.commit().await?;

        info!(monthly_expense_id = %monthly_expense.id, "Monthly expense updated");
        Ok(MonthlyExpenseWithGroups {
            monthly_expense,
            revenue_group_ids,
        })
    }

    /// Deletes a monthly expense with its entries and deductions.
    pub async fn delete(&self, id: MonthlyExpenseId) -> Result<(), RepositoryError> {
        let uuid = id.into_inner();
        let txn = self.db.begin().await?;
        delete_deductions(&txn, DeductionOwner::MonthlyExpense(id)).await?;
        monthly_expense_entries::Entity::delete_many()
            .filter(monthly_expense_entries::Column::MonthlyExpenseId.eq(uuid))
            .exec(&txn)
            .await?;
        let result = monthly_expenses::Entity::delete_by_id(uuid)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("monthly_expense", id));
        }
        txn.commit().await?;

        info!(monthly_expense_id = %uuid, "Monthly expense deleted");
        Ok(())
    }

    /// Records the amount of a monthly expense for one month, inserting or
    /// updating the entry.
    pub async fn set_amount(
        &self,
        id: MonthlyExpenseId,
        month: MonthKey,
        amount: Decimal,
    ) -> Result<monthly_expense_entries::Model, RepositoryError> {
        let amount = require_non_negative("amount", amount)?;

        let txn = self.db.begin().await?;
        let parent = find_monthly_expense(&txn, id).await?;
        let existing = monthly_expense_entries::Entity::find()
            .filter(monthly_expense_entries::Column::MonthlyExpenseId.eq(parent.id))
            .filter(in_month(
                monthly_expense_entries::Column::EntryYear,
                monthly_expense_entries::Column::EntryMonth,
                month,
            ))
            .one(&txn)
            .await?;

        let entry = if let Some(existing) = existing {
            let mut entry: monthly_expense_entries::ActiveModel = existing.into();
            entry.amount = Set(amount.into());
            entry.update(&txn).await?
        } else {
            let (year, month_column) = to_columns(month);
            monthly_expense_entries::ActiveModel {
                id: Set(Uuid::now_v7()),
                monthly_expense_id: Set(parent.id),
                entry_year: Set(year),
                entry_month: Set(month_column),
                amount: Set(amount.into()),
            }
            .insert(&txn)
            .await?
        };
        txn.commit().await?;

        info!(monthly_expense_id = %parent.id, %month, amount = %entry.amount, "Monthly expense amount set");
        Ok(entry)
    }

    /// Entries of a monthly expense, oldest month first.
    pub async fn entries(
        &self,
        id: MonthlyExpenseId,
    ) -> Result<Vec<monthly_expense_entries::Model>, RepositoryError> {
        Ok(monthly_expense_entries::Entity::find()
            .filter(monthly_expense_entries::Column::MonthlyExpenseId.eq(id.into_inner()))
            .order_by_asc(monthly_expense_entries::Column::EntryYear)
            .order_by_asc(monthly_expense_entries::Column::EntryMonth)
            .all(&self.db)
            .await?)
    }

    /// Finds a monthly expense with its deductions.
    pub async fn find_by_id(
        &self,
        id: MonthlyExpenseId,
    ) -> Result<Option<MonthlyExpenseWithGroups>, RepositoryError> {
        let Some(monthly_expense) = monthly_expenses::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let revenue_group_ids =
            load_deductions(&self.db, DeductionOwner::MonthlyExpense(id)).await?;
        Ok(Some(MonthlyExpenseWithGroups {
            monthly_expense,
            revenue_group_ids,
        }))
    }

    /// Lists monthly expenses by name, optionally within one expense group.
    pub async fn list(
        &self,
        expense_group_id: Option<ExpenseGroupId>,
    ) -> Result<Vec<MonthlyExpenseWithGroups>, RepositoryError> {
        let mut query = monthly_expenses::Entity::find();
        if let Some(group) = expense_group_id {
            query = query.filter(monthly_expenses::Column::ExpenseGroupId.eq(group.into_inner()));
        }
        let rows = query
            .order_by_asc(monthly_expenses::Column::Name)
            .all(&self.db)
            .await?;
        let mut deductions = all_deductions(&self.db).await?;
        debug!(count = rows.len(), "Listed monthly expenses");
        Ok(rows
            .into_iter()
            .map(|monthly_expense| MonthlyExpenseWithGroups {
                revenue_group_ids: deductions
                    .remove(&DeductionOwner::MonthlyExpense(MonthlyExpenseId::from_uuid(
                        monthly_expense.id,
                    )))
                    .unwrap_or_default(),
                monthly_expense,
            })
            .collect())
    }
}
